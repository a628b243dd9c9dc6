// src/event.rs

/// ===============================
/// Clock-side timers
/// ===============================

/// Work scheduled on the clock by the playback engine.
///
/// Timers:
/// - carry a snapshot of what to play, so later tape edits
///   never change a run that is already scheduled
/// - are tagged with the run generation they belong to
/// - are handled by the engine exactly once
#[derive(Debug, Clone, PartialEq)]
pub enum Timer {
    /// Start one sound of a sequence run.
    Trigger(PendingTrigger),

    /// The estimated end of a sequence run.
    Finish { generation: u64 },
}

/// A sequence event waiting for its start time.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingTrigger {
    pub generation: u64,
    pub sound_id: String,
    pub volume: f32,
    pub playback_rate: f64,
    /// Clock time the instance is meant to start at.
    pub start_at_ms: f64,
}

/// ===============================
/// Sink-side triggers
/// ===============================

/// Parameters handed to the trigger sink with each sound instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerParams {
    /// Clock time the instance should start at.
    pub start_at_ms: f64,

    /// Gain (0.0 - 1.0).
    pub volume: f32,

    /// Playback-rate multiplier (the mix speed).
    pub playback_rate: f64,
}
