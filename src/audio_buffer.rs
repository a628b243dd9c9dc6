// src/audio_buffer.rs

use std::sync::Arc;

/// A decoded, playable sound.
///
/// Samples are interleaved and shared through an Arc so every trigger
/// can hand the same data to the sink without copying.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayableBuffer {
    pub sample_rate: f64,
    pub channels: usize,
    pub frames: usize,
    pub samples: Arc<Vec<f32>>, // interleaved: ch0..chN, frame by frame
}

impl PlayableBuffer {
    /// Wrap interleaved sample data.
    pub fn new(samples: Vec<f32>, channels: usize, sample_rate: f64) -> Self {
        let channels = channels.max(1);
        let frames = samples.len() / channels;
        Self {
            sample_rate,
            channels,
            frames,
            samples: Arc::new(samples),
        }
    }

    /// Single-channel buffer.
    #[inline]
    pub fn mono(samples: Vec<f32>, sample_rate: f64) -> Self {
        Self::new(samples, 1, sample_rate)
    }

    /// Duration in seconds.
    #[inline]
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate <= 0.0 {
            return 0.0;
        }
        self.frames as f64 / self.sample_rate
    }

    /// Duration in milliseconds.
    #[inline]
    pub fn duration_ms(&self) -> f64 {
        if self.sample_rate <= 0.0 {
            return 0.0;
        }
        self.frames as f64 * 1000.0 / self.sample_rate
    }

    /// Samples of one channel, de-interleaved.
    pub fn channel(&self, ch: usize) -> impl Iterator<Item = f32> + '_ {
        self.samples
            .iter()
            .skip(ch)
            .step_by(self.channels)
            .copied()
    }

    /// Direct access to the interleaved sample data.
    #[inline]
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Peak absolute sample value.
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0_f32, |peak, s| peak.max(s.abs()))
    }
}
