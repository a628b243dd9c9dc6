// src/state/mod.rs
//
// Declarative state layer for UI interaction.
//
// This module contains the structures that represent the mix the user is
// building. The UI manipulates them through Commands, and the playback
// engine only ever reads a snapshot of them.
//
// Key principles:
// - Delays are absolute offsets and always consistent with the gap policy
// - Transport types (MixRecord) are serializable
// - Mutations happen through Commands

mod command;
mod mix;
mod preset;
mod tape;

pub use command::*;
pub use mix::*;
pub use preset::*;
pub use tape::*;
