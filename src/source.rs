// src/source.rs
//
// Sound source provider.
//
// Resolves a sound id to a playable buffer. Buffers come from sample files
// when a loader can provide them, and from the synthesizer otherwise.

use std::collections::HashMap;

use crate::audio_buffer::PlayableBuffer;
use crate::catalog::{SoundCatalog, SoundDescriptor, SoundDurations};
use crate::synth::Noise;

/// Anything that can hand out decoded sounds by id.
pub trait SoundSource {
    /// Returns None when no buffer exists for the id.
    fn resolve(&self, sound_id: &str) -> Option<&PlayableBuffer>;
}

/// Loads sample files by path.
///
/// Failures are reported as None; the bank falls back to synthesis.
pub trait SampleLoader {
    fn load(&mut self, path: &str) -> Option<PlayableBuffer>;
}

/// Loader that never finds a file, so every sound is synthesized.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFiles;

impl SampleLoader for NoFiles {
    fn load(&mut self, _path: &str) -> Option<PlayableBuffer> {
        None
    }
}

impl<F> SampleLoader for F
where
    F: FnMut(&str) -> Option<PlayableBuffer>,
{
    fn load(&mut self, path: &str) -> Option<PlayableBuffer> {
        self(path)
    }
}

/// Loads WAV files relative to a base directory.
#[cfg(feature = "wav")]
#[derive(Debug, Clone)]
pub struct WavLoader {
    base_dir: std::path::PathBuf,
}

#[cfg(feature = "wav")]
impl WavLoader {
    pub fn new(base_dir: impl Into<std::path::PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn read(&self, path: &str) -> Result<PlayableBuffer, hound::Error> {
        let full_path = self.base_dir.join(path.trim_start_matches('/'));
        let mut reader = hound::WavReader::open(full_path)?;
        let spec = reader.spec();

        let samples = match spec.sample_format {
            hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<Vec<_>, _>>()?,
            hound::SampleFormat::Int => {
                let scale = (1_i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|s| s as f32 / scale))
                    .collect::<Result<Vec<_>, _>>()?
            }
        };

        Ok(PlayableBuffer::new(
            samples,
            spec.channels as usize,
            spec.sample_rate as f64,
        ))
    }
}

#[cfg(feature = "wav")]
impl SampleLoader for WavLoader {
    fn load(&mut self, path: &str) -> Option<PlayableBuffer> {
        match self.read(path) {
            Ok(buffer) => Some(buffer),
            Err(e) => {
                log::error!("Failed to load audio file {}: {}", path, e);
                None
            }
        }
    }
}

/// Decoded buffers for every sound in a catalog.
#[derive(Debug, Clone)]
pub struct SoundBank {
    catalog: SoundCatalog,
    buffers: HashMap<String, PlayableBuffer>,
    sample_rate: f64,
}

impl SoundBank {
    /// Load every sound in the catalog.
    ///
    /// Sounds with an audio file are loaded through `loader`; anything
    /// without a file, or whose file fails to load, is synthesized. The
    /// catalog durations are synced to the resulting buffers.
    pub fn load(
        mut catalog: SoundCatalog,
        sample_rate: f64,
        seed: u64,
        loader: &mut impl SampleLoader,
    ) -> Self {
        let mut noise = Noise::new_with_seed(seed);
        let mut buffers = HashMap::with_capacity(catalog.len());

        let descriptors: Vec<SoundDescriptor> = catalog.iter().cloned().collect();
        for descriptor in descriptors {
            let buffer = Self::load_one(&descriptor, sample_rate, &mut noise, loader);
            let duration_ms = buffer.duration_ms().round() as u64;
            catalog.set_duration_ms(&descriptor.id, duration_ms);
            buffers.insert(descriptor.id, buffer);
        }

        log::debug!("Loaded {} sounds at {} Hz", buffers.len(), sample_rate);

        Self {
            catalog,
            buffers,
            sample_rate,
        }
    }

    /// Synthesize every sound of the catalog.
    pub fn synthesized(catalog: SoundCatalog, sample_rate: f64, seed: u64) -> Self {
        Self::load(catalog, sample_rate, seed, &mut NoFiles)
    }

    fn load_one(
        descriptor: &SoundDescriptor,
        sample_rate: f64,
        noise: &mut Noise,
        loader: &mut impl SampleLoader,
    ) -> PlayableBuffer {
        if let Some(path) = &descriptor.audio_file {
            if let Some(buffer) = loader.load(path).filter(|b| b.frames > 0) {
                return buffer;
            }
            log::info!(
                "Audio file not found for {}, using synthesized sound",
                descriptor.id
            );
        }
        descriptor.kind.render(sample_rate, noise)
    }

    pub fn catalog(&self) -> &SoundCatalog {
        &self.catalog
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }
}

impl SoundSource for SoundBank {
    fn resolve(&self, sound_id: &str) -> Option<&PlayableBuffer> {
        self.buffers.get(sound_id)
    }
}

impl SoundDurations for SoundBank {
    fn duration_ms(&self, sound_id: &str) -> u64 {
        self.catalog.duration_ms(sound_id)
    }

    fn exists(&self, sound_id: &str) -> bool {
        self.buffers.contains_key(sound_id)
    }
}
