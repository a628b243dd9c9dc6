// src/state/tape.rs
//
// The tape: the authoritative mix state.
//
// A tape is an ordered list of sound events plus the settings that shape
// how it plays back. All delay bookkeeping is delegated to the scheduler.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use super::{MixRecord, Preset};
use crate::catalog::SoundDurations;
use crate::scheduler;

/// Name used when sharing a mix that was never named.
pub const UNTITLED_MIX: &str = "Untitled Mix";

// ═══════════════════════════════════════════════════════════════════════════
// Sequence events
// ═══════════════════════════════════════════════════════════════════════════

/// One sound placed on the tape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceEvent {
    /// Catalog id of the sound.
    pub sound_id: String,

    /// Absolute offset from the start of playback (not a relative gap).
    #[serde(alias = "delay", deserialize_with = "deserialize_delay")]
    pub delay_ms: u64,

    /// Gain (0.0 - 1.0).
    #[serde(default = "full_volume", deserialize_with = "deserialize_volume")]
    pub volume: f32,
}

impl SequenceEvent {
    pub fn new(sound_id: impl Into<String>, delay_ms: u64, volume: f32) -> Self {
        Self {
            sound_id: sound_id.into(),
            delay_ms,
            volume: clamp_volume(volume),
        }
    }
}

/// Ordered list of events. List order is display order.
pub type Sequence = Vec<SequenceEvent>;

fn full_volume() -> f32 {
    1.0
}

#[inline]
pub(crate) fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        return 1.0;
    }
    volume.clamp(0.0, 1.0)
}

/// Volumes outside 0..=1 are clamped rather than rejected.
fn deserialize_volume<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    f32::deserialize(deserializer).map(clamp_volume)
}

/// Accepts integer or fractional millisecond offsets; older links stored
/// floats. Integers are taken as-is so large offsets survive a round trip.
fn deserialize_delay<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(DelayVisitor)
}

struct DelayVisitor;

impl Visitor<'_> for DelayVisitor {
    type Value = u64;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a non-negative number of milliseconds")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<u64, E> {
        Ok(value)
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<u64, E> {
        u64::try_from(value)
            .map_err(|_| E::custom(format!("delay must not be negative, got {}", value)))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<u64, E> {
        let rounded = value.round();
        // 2^64 as f64; anything at or above it does not fit.
        if !rounded.is_finite() || rounded < 0.0 || rounded >= 18_446_744_073_709_551_616.0 {
            return Err(E::custom(format!(
                "delay must be a non-negative number of milliseconds, got {}",
                value
            )));
        }
        Ok(rounded as u64)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Mode flags
// ═══════════════════════════════════════════════════════════════════════════

/// Spacing rule between consecutive events.
///
/// Layered mode only widens the gap; it never overlaps sounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GapPolicy {
    #[default]
    Sequential,
    Layered,
}

impl GapPolicy {
    pub fn from_layer_mode(layer_mode: bool) -> Self {
        if layer_mode {
            GapPolicy::Layered
        } else {
            GapPolicy::Sequential
        }
    }

    pub fn is_layered(self) -> bool {
        self == GapPolicy::Layered
    }

    /// Gap in milliseconds under the default spacing.
    pub fn gap_ms(self) -> u64 {
        Spacing::default().gap_ms(self)
    }
}

/// Gap constants for each policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spacing {
    pub sequential_ms: u64,
    pub layered_ms: u64,
}

impl Spacing {
    pub fn gap_ms(&self, policy: GapPolicy) -> u64 {
        match policy {
            GapPolicy::Sequential => self.sequential_ms,
            GapPolicy::Layered => self.layered_ms,
        }
    }
}

impl Default for Spacing {
    fn default() -> Self {
        Self {
            sequential_ms: 200,
            layered_ms: 300,
        }
    }
}

/// A speed outside the supported set.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("unsupported playback speed {0} (expected 0.75, 1, 1.25 or 1.5)")]
pub struct InvalidSpeed(pub f64);

/// Playback speed multiplier.
///
/// Divides sound durations at trigger time and is passed to the sink as
/// the playback rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub enum PlaybackSpeed {
    Slow,
    #[default]
    Normal,
    Fast,
    Faster,
}

impl PlaybackSpeed {
    pub const ALL: [PlaybackSpeed; 4] = [
        PlaybackSpeed::Slow,
        PlaybackSpeed::Normal,
        PlaybackSpeed::Fast,
        PlaybackSpeed::Faster,
    ];

    #[inline]
    pub fn factor(self) -> f64 {
        match self {
            PlaybackSpeed::Slow => 0.75,
            PlaybackSpeed::Normal => 1.0,
            PlaybackSpeed::Fast => 1.25,
            PlaybackSpeed::Faster => 1.5,
        }
    }

    /// Duration of a sound at this speed.
    #[inline]
    pub fn effective_ms(self, duration_ms: f64) -> f64 {
        duration_ms / self.factor()
    }
}

impl TryFrom<f64> for PlaybackSpeed {
    type Error = InvalidSpeed;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        PlaybackSpeed::ALL
            .into_iter()
            .find(|speed| (speed.factor() - value).abs() < 1e-9)
            .ok_or(InvalidSpeed(value))
    }
}

impl From<PlaybackSpeed> for f64 {
    fn from(speed: PlaybackSpeed) -> Self {
        speed.factor()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tape
// ═══════════════════════════════════════════════════════════════════════════

/// Complete mix state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tape {
    /// Mix name (may be empty until the user names it).
    pub name: String,

    events: Sequence,
    speed: PlaybackSpeed,
    gap_policy: GapPolicy,
    spacing: Spacing,
}

impl Tape {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty tape using custom gap constants.
    pub fn with_spacing(spacing: Spacing) -> Self {
        Self {
            spacing,
            ..Self::default()
        }
    }

    // -------------------------------
    // MARK: Accessors
    // -------------------------------

    pub fn events(&self) -> &[SequenceEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn speed(&self) -> PlaybackSpeed {
        self.speed
    }

    pub fn gap_policy(&self) -> GapPolicy {
        self.gap_policy
    }

    pub fn layer_mode(&self) -> bool {
        self.gap_policy.is_layered()
    }

    pub fn spacing(&self) -> Spacing {
        self.spacing
    }

    /// Current gap in milliseconds.
    pub fn gap_ms(&self) -> u64 {
        self.spacing.gap_ms(self.gap_policy)
    }

    // -------------------------------
    // MARK: Sequence mutations
    // -------------------------------

    /// Append a sound at full volume. Unknown sounds are skipped.
    pub fn append(&mut self, sound_id: &str, durations: &impl SoundDurations) -> Option<usize> {
        if !durations.exists(sound_id) {
            log::debug!("Ignoring unknown sound {}", sound_id);
            return None;
        }
        let gap = self.gap_ms();
        Some(scheduler::append_event(
            &mut self.events,
            sound_id,
            1.0,
            durations,
            gap,
        ))
    }

    /// Remove an event and recompute every delay.
    pub fn remove(&mut self, index: usize, durations: &impl SoundDurations) -> Option<SequenceEvent> {
        let gap = self.gap_ms();
        scheduler::remove(&mut self.events, index, durations, gap)
    }

    /// Move an event and recompute every delay.
    pub fn reorder(&mut self, from: usize, to: usize, durations: &impl SoundDurations) -> bool {
        let gap = self.gap_ms();
        scheduler::reorder(&mut self.events, from, to, durations, gap)
    }

    /// Recompute every delay from list order under the current gap.
    pub fn recompute(&mut self, durations: &impl SoundDurations) {
        let gap = self.gap_ms();
        scheduler::recompute_delays(&mut self.events, durations, gap);
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    // -------------------------------
    // MARK: Settings
    // -------------------------------

    /// Existing delays are kept; speed only applies at trigger time.
    pub fn set_speed(&mut self, speed: PlaybackSpeed) {
        self.speed = speed;
    }

    /// Existing delays are kept; the new gap applies to later edits.
    pub fn set_layer_mode(&mut self, enabled: bool) {
        self.gap_policy = GapPolicy::from_layer_mode(enabled);
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    // -------------------------------
    // MARK: Presets & sharing
    // -------------------------------

    /// Replace the sequence and name with a preset's.
    ///
    /// Preset delays are authored offsets and are kept verbatim.
    pub fn load_preset(&mut self, preset: &Preset) {
        self.name = preset.name.clone();
        self.events = preset.sequence.clone();
    }

    /// Snapshot for the share link.
    pub fn to_mix(&self) -> MixRecord {
        let name = if self.name.is_empty() {
            UNTITLED_MIX.to_string()
        } else {
            self.name.clone()
        };

        MixRecord {
            name,
            sequence: self.events.clone(),
            speed: self.speed,
            layer_mode: self.layer_mode(),
        }
    }

    /// Rebuild a tape from a decoded mix.
    ///
    /// Sounds missing from the catalog are kept; they fall back to the
    /// default duration and are skipped at playback.
    pub fn from_mix(mix: MixRecord, spacing: Spacing) -> Self {
        let events = mix
            .sequence
            .into_iter()
            .map(|e| SequenceEvent::new(e.sound_id, e.delay_ms, e.volume))
            .collect();

        Self {
            name: mix.name,
            events,
            speed: mix.speed,
            gap_policy: GapPolicy::from_layer_mode(mix.layer_mode),
            spacing,
        }
    }
}
