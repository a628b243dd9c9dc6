// Commands from UI to the mixtape controller.
//
// Commands are the ONLY way the UI mutates the tape or drives playback.

use super::{MixRecord, PlaybackSpeed};

/// A command from the UI.
#[derive(Debug, Clone)]
pub enum Command {
    // ═══════════════════════════════════════════
    // Tape edits
    // ═══════════════════════════════════════════
    /// Append a sound to the end of the tape.
    AddSound { sound_id: String },

    /// Remove the event at an index.
    RemoveSound { index: usize },

    /// Move an event to a new position (delays are recomputed).
    Reorder { from: usize, to: usize },

    /// Remove every event.
    ClearTape,

    // ═══════════════════════════════════════════
    // Settings
    // ═══════════════════════════════════════════
    SetSpeed { speed: PlaybackSpeed },

    SetLayerMode { enabled: bool },

    SetName { name: String },

    // ═══════════════════════════════════════════
    // Loading
    // ═══════════════════════════════════════════
    /// Replace the tape with a built-in preset.
    LoadPreset { preset_id: String },

    /// Replace the tape with a decoded mix.
    LoadMix { mix: MixRecord },

    // ═══════════════════════════════════════════
    // Playback
    // ═══════════════════════════════════════════
    /// Play the whole tape.
    PlayTape,

    /// Cancel the running tape playback.
    StopTape,

    /// Play one sound right now.
    PlaySound { sound_id: String },
}

/// Outcome of applying a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandResult {
    /// Command applied.
    Ok,

    /// A sound was appended at this index.
    Added { index: usize },

    /// Command was a no-op (unknown id, bad index, already playing...).
    Ignored,
}
