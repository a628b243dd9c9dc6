// src/mixtape.rs
//
// Mixtape controller.
//
// Owns the tape, the sound bank and the playback engine, and applies UI
// commands to them. This is the single entry point the UI layer (native
// demo or web binding) talks to.

use crate::catalog::SoundCatalog;
use crate::clock::Clock;
use crate::codec;
use crate::config::MixtapeConfig;
use crate::playback::{PlaybackEngine, PlaybackTiming};
use crate::sink::TriggerSink;
use crate::source::SoundBank;
use crate::state::{
    Command, CommandResult, PlaybackSpeed, Preset, Spacing, Tape, find_preset, standard_presets,
};

/// Summary shown in the stats panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixStats {
    pub sounds: usize,
    pub speed: PlaybackSpeed,
    pub layer_mode: bool,
    pub playing: bool,
}

/// Controller that applies UI commands to the tape and engine.
pub struct Mixtape<C, K>
where
    C: Clock,
    K: TriggerSink,
{
    /// The mix being edited.
    tape: Tape,

    /// Suggested mixes.
    presets: Vec<Preset>,

    /// Gap constants for tapes loaded from presets or links.
    spacing: Spacing,

    /// Playback engine (owns the sound bank).
    engine: PlaybackEngine<C, SoundBank, K>,
}

impl<C, K> Mixtape<C, K>
where
    C: Clock,
    K: TriggerSink,
{
    /// Create a controller with every standard sound synthesized.
    pub fn new(config: &MixtapeConfig, clock: C, sink: K) -> Self {
        let catalog = SoundCatalog::standard().with_fallback_ms(config.default_duration_ms);
        let bank = SoundBank::synthesized(catalog, config.sample_rate, config.synth_seed);
        Self::with_bank(bank, config, clock, sink)
    }

    /// Create a controller around an already loaded sound bank.
    pub fn with_bank(bank: SoundBank, config: &MixtapeConfig, clock: C, sink: K) -> Self {
        let spacing = config.spacing();
        Self {
            tape: Tape::with_spacing(spacing),
            presets: standard_presets(),
            spacing,
            engine: PlaybackEngine::new(clock, bank, sink, PlaybackTiming::from_config(config)),
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Commands
    // ═══════════════════════════════════════════════════════════════════

    /// Apply a single command.
    pub fn apply(&mut self, command: Command) -> CommandResult {
        match command {
            Command::AddSound { sound_id } => {
                match self.tape.append(&sound_id, self.engine.source()) {
                    Some(index) => CommandResult::Added { index },
                    None => CommandResult::Ignored,
                }
            }

            Command::RemoveSound { index } => {
                match self.tape.remove(index, self.engine.source()) {
                    Some(_) => CommandResult::Ok,
                    None => CommandResult::Ignored,
                }
            }

            Command::Reorder { from, to } => {
                if self.tape.reorder(from, to, self.engine.source()) {
                    CommandResult::Ok
                } else {
                    CommandResult::Ignored
                }
            }

            Command::ClearTape => {
                self.tape.clear();
                CommandResult::Ok
            }

            Command::SetSpeed { speed } => {
                self.tape.set_speed(speed);
                CommandResult::Ok
            }

            Command::SetLayerMode { enabled } => {
                self.tape.set_layer_mode(enabled);
                CommandResult::Ok
            }

            Command::SetName { name } => {
                self.tape.set_name(name);
                CommandResult::Ok
            }

            Command::LoadPreset { preset_id } => match find_preset(&self.presets, &preset_id) {
                Some(preset) => {
                    self.tape.load_preset(preset);
                    CommandResult::Ok
                }
                None => {
                    log::debug!("Unknown preset {}", preset_id);
                    CommandResult::Ignored
                }
            },

            Command::LoadMix { mix } => {
                self.tape = Tape::from_mix(mix, self.spacing);
                CommandResult::Ok
            }

            Command::PlayTape => {
                if self.engine.play(&self.tape) {
                    CommandResult::Ok
                } else {
                    CommandResult::Ignored
                }
            }

            Command::StopTape => {
                self.engine.stop();
                CommandResult::Ok
            }

            Command::PlaySound { sound_id } => {
                if self.engine.play_sound(&sound_id, 1.0, self.tape.speed()) {
                    CommandResult::Ok
                } else {
                    CommandResult::Ignored
                }
            }
        }
    }

    /// Fire due timers. Call this from the host loop.
    pub fn tick(&mut self) -> usize {
        self.engine.tick()
    }

    // ═══════════════════════════════════════════════════════════════════
    // Sharing
    // ═══════════════════════════════════════════════════════════════════

    /// Share link for the current tape. None when the tape is empty.
    pub fn share_url(&self, base_url: &str) -> Option<String> {
        if self.tape.is_empty() {
            return None;
        }
        codec::share_url(base_url, &self.tape.to_mix())
    }

    /// Load the mix embedded in a page's query string, if any.
    ///
    /// A missing or broken mix leaves the tape untouched.
    pub fn load_from_query(&mut self, query: &str) -> bool {
        match codec::load_mix_from_query(query) {
            Some(mix) => {
                log::info!("Loaded mix \"{}\" ({} sounds)", mix.name, mix.sequence.len());
                self.apply(Command::LoadMix { mix });
                true
            }
            None => false,
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Accessors
    // ═══════════════════════════════════════════════════════════════════

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn catalog(&self) -> &SoundCatalog {
        self.engine.source().catalog()
    }

    pub fn bank(&self) -> &SoundBank {
        self.engine.source()
    }

    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    pub fn engine(&self) -> &PlaybackEngine<C, SoundBank, K> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut PlaybackEngine<C, SoundBank, K> {
        &mut self.engine
    }

    pub fn is_playing(&self) -> bool {
        self.engine.is_playing()
    }

    pub fn stats(&self) -> MixStats {
        MixStats {
            sounds: self.tape.len(),
            speed: self.tape.speed(),
            layer_mode: self.tape.layer_mode(),
            playing: self.engine.is_playing(),
        }
    }
}
