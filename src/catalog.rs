// src/catalog.rs
//
// Sound catalog.
//
// Static registry of every sound the soundboard knows about. Each entry
// carries the sound's playable duration (synced from its buffer when the
// sound bank loads) plus presentation metadata for the UI.

use crate::synth::SoundKind;

/// Duration assumed for any sound whose buffer is unavailable.
pub const DEFAULT_DURATION_MS: u64 = 1000;

/// Source of per-sound durations.
///
/// Lookups never fail: unknown ids resolve to a fallback duration so
/// timing math never branches on missing data.
pub trait SoundDurations {
    /// Duration of a sound in milliseconds at normal speed.
    fn duration_ms(&self, sound_id: &str) -> u64;

    /// Whether the id refers to a known sound.
    fn exists(&self, sound_id: &str) -> bool;
}

/// Immutable description of one sound.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundDescriptor {
    /// Unique sound ID.
    pub id: String,

    /// Synthesis routine used when no sample file is available.
    pub kind: SoundKind,

    /// Playable duration in milliseconds (always > 0).
    pub duration_ms: u64,

    /// Button label.
    pub name: String,

    pub emoji: String,

    pub description: String,

    /// Color tag for the button (a UI class name).
    pub color: String,

    /// Optional sample file to load instead of synthesizing.
    pub audio_file: Option<String>,
}

impl SoundDescriptor {
    pub fn new(
        id: impl Into<String>,
        kind: SoundKind,
        name: impl Into<String>,
        emoji: impl Into<String>,
        description: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            duration_ms: kind.duration_ms(),
            name: name.into(),
            emoji: emoji.into(),
            description: description.into(),
            color: color.into(),
            audio_file: None,
        }
    }

    /// Attach a sample file to this descriptor.
    pub fn with_audio_file(mut self, path: impl Into<String>) -> Self {
        self.audio_file = Some(path.into());
        self
    }
}

/// Registry of sound descriptors, in registration order.
#[derive(Debug, Clone)]
pub struct SoundCatalog {
    sounds: Vec<SoundDescriptor>,
    fallback_ms: u64,
}

impl SoundCatalog {
    pub fn new() -> Self {
        Self {
            sounds: Vec::new(),
            fallback_ms: DEFAULT_DURATION_MS,
        }
    }

    /// The built-in soundboard.
    pub fn standard() -> Self {
        let mut catalog = Self::new();
        for descriptor in [
            SoundDescriptor::new("tung", SoundKind::Tung, "TUNG TUNG", "🥁", "Tung Sahur", "bg-neon-pink"),
            SoundDescriptor::new("tata", SoundKind::Tata, "TA TA TA", "🔔", "Ta Ta Sahur", "bg-neon-blue"),
            SoundDescriptor::new("brr", SoundKind::Brr, "BRR BRR", "👻", "Patapim", "bg-neon-green"),
            SoundDescriptor::new(
                "bombardiro",
                SoundKind::Bombardiro,
                "BOMBARDIRO",
                "🐊",
                "Crocodilo",
                "bg-neon-yellow",
            ),
            SoundDescriptor::new(
                "tralalero",
                SoundKind::Tralalero,
                "TRALALERO",
                "🎵",
                "Tralala",
                "bg-pastel-pink",
            ),
            SoundDescriptor::new("scream", SoundKind::Scream, "SCREAM", "😱", "DJ Rest DWI", "bg-pastel-purple"),
            SoundDescriptor::new("alarm", SoundKind::Alarm, "BEEP BOOP", "⏰", "Alarm", "bg-pastel-blue"),
            SoundDescriptor::new("chaos", SoundKind::Chaos, "CHAOS", "🤪", "Crowd Chaos", "bg-red-400"),
        ] {
            catalog.register(descriptor);
        }
        catalog
    }

    /// Set the duration reported for unknown sounds.
    pub fn with_fallback_ms(mut self, fallback_ms: u64) -> Self {
        self.fallback_ms = fallback_ms.max(1);
        self
    }

    /// Add a descriptor. A descriptor with an existing id replaces the old one.
    pub fn register(&mut self, descriptor: SoundDescriptor) {
        match self.sounds.iter_mut().find(|d| d.id == descriptor.id) {
            Some(existing) => *existing = descriptor,
            None => self.sounds.push(descriptor),
        }
    }

    pub fn get(&self, sound_id: &str) -> Option<&SoundDescriptor> {
        self.sounds.iter().find(|d| d.id == sound_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SoundDescriptor> {
        self.sounds.iter()
    }

    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }

    pub fn fallback_ms(&self) -> u64 {
        self.fallback_ms
    }

    /// Sync a descriptor's duration with its loaded buffer.
    pub(crate) fn set_duration_ms(&mut self, sound_id: &str, duration_ms: u64) {
        if let Some(descriptor) = self.sounds.iter_mut().find(|d| d.id == sound_id) {
            descriptor.duration_ms = duration_ms.max(1);
        }
    }
}

impl Default for SoundCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl SoundDurations for SoundCatalog {
    fn duration_ms(&self, sound_id: &str) -> u64 {
        self.get(sound_id)
            .map(|d| d.duration_ms)
            .unwrap_or(self.fallback_ms)
    }

    fn exists(&self, sound_id: &str) -> bool {
        self.get(sound_id).is_some()
    }
}
