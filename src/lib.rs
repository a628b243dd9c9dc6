// src/lib.rs
//
// Library entry point for the native demo, the web binding and tests.

mod audio_buffer;
mod catalog;
mod clock;
mod codec;
mod config;
mod event;
mod mixtape;
mod playback;
pub mod scheduler;
mod sink;
mod source;
mod state;
mod synth;

#[cfg(feature = "web")]
pub mod wasm;

// Re-export key types for Rust consumers
pub use audio_buffer::PlayableBuffer;
pub use catalog::{DEFAULT_DURATION_MS, SoundCatalog, SoundDescriptor, SoundDurations};
pub use clock::{Clock, ManualClock, SystemClock, TimerQueue};
pub use codec::{
    CodecError, MIX_PARAM, decode_mix, encode_mix, load_mix_from_query, read_mix_param, share_url,
};
pub use config::{ConfigError, MixtapeConfig};
pub use event::{PendingTrigger, Timer, TriggerParams};
pub use mixtape::{MixStats, Mixtape};
pub use playback::{PlaybackEngine, PlaybackState, PlaybackTiming};
pub use sink::{FiredTrigger, LogSink, TriggerQueue, TriggerSink};
#[cfg(feature = "wav")]
pub use source::WavLoader;
pub use source::{NoFiles, SampleLoader, SoundBank, SoundSource};
pub use state::{
    Command, CommandResult, GapPolicy, InvalidSpeed, MixRecord, PlaybackSpeed, Preset, Sequence,
    SequenceEvent, Spacing, Tape, UNTITLED_MIX, find_preset, standard_presets,
};
pub use synth::{Noise, SoundKind};
