// src/state/mix.rs
//
// Mix record: the transport-only form of a tape.

use serde::{Deserialize, Serialize};

use super::{PlaybackSpeed, Sequence};

/// A named mix as it travels inside a share link.
///
/// Serialized as `{ name, sequence: [{soundId, delayMs, volume}], speed, layerMode }`.
/// Missing fields fall back to an empty, untitled, normal-speed mix.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MixRecord {
    pub name: String,
    pub sequence: Sequence,
    pub speed: PlaybackSpeed,
    pub layer_mode: bool,
}
