// src/synth.rs
//
// Synthesized fallback sounds.
//
// Every sound in the catalog has a SoundKind. When no sample file can be
// loaded for a sound, its kind renders a short procedural buffer instead.

use std::f32::consts::TAU;

use crate::audio_buffer::PlayableBuffer;

// ═══════════════════════════════════════════════════════════════════
// Noise
// ═══════════════════════════════════════════════════════════════════

/// Deterministic noise source for the noisy kinds.
#[derive(Debug)]
pub struct Noise(oorandom::Rand32);

impl Noise {
    /// Pass the same seed to get the same noise back again.
    pub fn new_with_seed(seed: u64) -> Self {
        Self(oorandom::Rand32::new(seed))
    }

    /// Uniform sample in -1.0..1.0.
    #[inline]
    pub fn bipolar(&mut self) -> f32 {
        self.0.rand_float() * 2.0 - 1.0
    }
}

// ═══════════════════════════════════════════════════════════════════
// Sound kinds
// ═══════════════════════════════════════════════════════════════════

/// Synthesis routine tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundKind {
    /// Deep bass drum.
    Tung,
    /// Metallic percussion.
    Tata,
    /// Ghostly wobble with noise.
    Brr,
    /// Cartoony creature.
    Bombardiro,
    /// C-E-G-E melody.
    Tralalero,
    /// Noisy scream with a linear fade.
    Scream,
    /// Beep boop alarm.
    Alarm,
    /// Crowd chaos.
    Chaos,
    /// Plain decaying 440 Hz tone for unrecognised tags.
    Beep,
}

impl SoundKind {
    pub const ALL: [SoundKind; 9] = [
        SoundKind::Tung,
        SoundKind::Tata,
        SoundKind::Brr,
        SoundKind::Bombardiro,
        SoundKind::Tralalero,
        SoundKind::Scream,
        SoundKind::Alarm,
        SoundKind::Chaos,
        SoundKind::Beep,
    ];

    /// Resolve a type tag. Unknown tags get the plain beep.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "tung" => SoundKind::Tung,
            "tata" => SoundKind::Tata,
            "brr" => SoundKind::Brr,
            "bombardiro" => SoundKind::Bombardiro,
            "tralalero" => SoundKind::Tralalero,
            "scream" => SoundKind::Scream,
            "alarm" => SoundKind::Alarm,
            "chaos" => SoundKind::Chaos,
            _ => SoundKind::Beep,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            SoundKind::Tung => "tung",
            SoundKind::Tata => "tata",
            SoundKind::Brr => "brr",
            SoundKind::Bombardiro => "bombardiro",
            SoundKind::Tralalero => "tralalero",
            SoundKind::Scream => "scream",
            SoundKind::Alarm => "alarm",
            SoundKind::Chaos => "chaos",
            SoundKind::Beep => "beep",
        }
    }

    /// Length of the rendered buffer.
    #[inline]
    pub fn duration_secs(self) -> f32 {
        match self {
            SoundKind::Scream => 2.0,
            _ => 0.8,
        }
    }

    #[inline]
    pub fn duration_ms(self) -> u64 {
        (self.duration_secs() * 1000.0).round() as u64
    }

    /// Render this kind into a mono buffer.
    pub fn render(self, sample_rate: f64, noise: &mut Noise) -> PlayableBuffer {
        let duration = self.duration_secs();
        let frames = (sample_rate as f32 * duration) as usize;
        let sr = sample_rate as f32;

        let mut data = Vec::with_capacity(frames);
        for i in 0..frames {
            let t = i as f32 / sr;
            data.push(self.sample_at(t, duration, noise));
        }

        PlayableBuffer::mono(data, sample_rate)
    }

    #[inline]
    fn sample_at(self, t: f32, duration: f32, noise: &mut Noise) -> f32 {
        match self {
            SoundKind::Tung => {
                let freq = 80.0 * (-t * 8.0).exp();
                (TAU * freq * t).sin() * (-t * 3.0).exp()
            }

            SoundKind::Tata => {
                let f1 = 1200.0 * (-t * 10.0).exp();
                let f2 = 800.0 * (-t * 12.0).exp();
                ((TAU * f1 * t).sin() + (TAU * f2 * t).sin()) * 0.5 * (-t * 4.0).exp()
            }

            SoundKind::Brr => {
                let freq = 200.0 + 100.0 * (20.0 * t).sin();
                let n = noise.bipolar() * 0.3;
                ((TAU * freq * t).sin() * 0.7 + n) * (-t * 2.0).exp()
            }

            SoundKind::Bombardiro => {
                let freq = 300.0 + 200.0 * (30.0 * t).sin();
                (TAU * freq * t).sin() * (-t * 2.5).exp()
            }

            SoundKind::Tralalero => {
                const MELODY: [f32; 4] = [523.0, 659.0, 784.0, 659.0];
                let note = ((t / 0.2) as usize) % MELODY.len();
                let freq = MELODY[note];
                (TAU * freq * t).sin() * (-((t % 0.2) * 5.0)).exp()
            }

            SoundKind::Scream => {
                let freq = 400.0 + 300.0 * (15.0 * t).sin() + 200.0 * (7.0 * t).sin();
                let n = noise.bipolar() * 0.5;
                ((TAU * freq * t).sin() * 0.5 + n) * (1.0 - t / duration)
            }

            SoundKind::Alarm => {
                let freq = if t % 0.4 < 0.2 { 800.0 } else { 1000.0 };
                let gate = ((t / 0.2) as u32 % 2) as f32;
                (TAU * freq * t).sin() * 0.7 * gate
            }

            SoundKind::Chaos => {
                let n = noise.bipolar();
                let modulation = (TAU * 5.0 * t).sin();
                n * 0.4 * (0.5 + 0.5 * modulation) * (1.0 - t / duration)
            }

            SoundKind::Beep => (TAU * 440.0 * t).sin() * (-t).exp(),
        }
    }
}
