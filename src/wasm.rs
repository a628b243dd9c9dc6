//! WebAssembly bindings via wasm-bindgen for browser integration.
//!
//! This module is only compiled when the `web` feature is enabled.
//!
//! # Usage
//!
//! Build with wasm-pack:
//! ```bash
//! wasm-pack build --target web --features web
//! ```
//!
//! # JavaScript Example
//!
//! ```javascript
//! import init, { mixtape_init, MixtapeApp } from './mixtape.js';
//!
//! await init();
//! mixtape_init();
//!
//! const app = new MixtapeApp(BigInt(Date.now()));
//! app.load_from_query(window.location.search);
//! app.add_sound("tung");
//! app.play(performance.now());
//!
//! // Drive timers and hand triggers to Web Audio
//! function frame(now) {
//!     app.tick(now);
//!     for (const t of JSON.parse(app.take_triggers_json())) {
//!         playBuffer(t.soundId, t.volume, t.playbackRate);
//!     }
//!     requestAnimationFrame(frame);
//! }
//! requestAnimationFrame(frame);
//! ```

use wasm_bindgen::prelude::*;

use crate::clock::ManualClock;
use crate::config::MixtapeConfig;
use crate::mixtape::Mixtape;
use crate::sink::TriggerQueue;
use crate::source::SoundSource;
use crate::state::{Command, CommandResult, PlaybackSpeed};

// ═══════════════════════════════════════════════════════════════════════════
// Initialization
// ═══════════════════════════════════════════════════════════════════════════

/// Initialize the wasm module. Call this once before using any other functions.
/// Sets up panic hooks and console logging.
#[wasm_bindgen]
pub fn mixtape_init() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Debug).ok();
}

// ═══════════════════════════════════════════════════════════════════════════
// App
// ═══════════════════════════════════════════════════════════════════════════

/// Soundboard + tape, driven by timestamps from JS.
#[wasm_bindgen]
pub struct MixtapeApp {
    inner: Mixtape<ManualClock, TriggerQueue>,
}

#[wasm_bindgen]
impl MixtapeApp {
    /// Create an app with every sound synthesized.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> MixtapeApp {
        Self::new_with_sample_rate(seed, MixtapeConfig::default().sample_rate)
    }

    /// Create an app rendering sounds at the AudioContext's sample rate.
    pub fn new_with_sample_rate(seed: u64, sample_rate: f64) -> MixtapeApp {
        let config = MixtapeConfig {
            sample_rate,
            synth_seed: seed,
            ..MixtapeConfig::default()
        };
        MixtapeApp {
            inner: Mixtape::new(&config, ManualClock::new(), TriggerQueue::new()),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Tape edits
    // ─────────────────────────────────────────────────────────────────────────

    /// Append a sound. Returns its index, or -1 for unknown sounds.
    pub fn add_sound(&mut self, sound_id: &str) -> i32 {
        match self.inner.apply(Command::AddSound {
            sound_id: sound_id.to_string(),
        }) {
            CommandResult::Added { index } => index as i32,
            _ => -1,
        }
    }

    pub fn remove_sound(&mut self, index: u32) -> bool {
        self.apply(Command::RemoveSound {
            index: index as usize,
        })
    }

    pub fn reorder(&mut self, from: u32, to: u32) -> bool {
        self.apply(Command::Reorder {
            from: from as usize,
            to: to as usize,
        })
    }

    pub fn clear(&mut self) {
        self.apply(Command::ClearTape);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Settings
    // ─────────────────────────────────────────────────────────────────────────

    /// Set the speed (0.75, 1, 1.25 or 1.5). Other values are ignored.
    pub fn set_speed(&mut self, speed: f64) -> bool {
        match PlaybackSpeed::try_from(speed) {
            Ok(speed) => self.apply(Command::SetSpeed { speed }),
            Err(e) => {
                log::warn!("{}", e);
                false
            }
        }
    }

    pub fn set_layer_mode(&mut self, enabled: bool) {
        self.apply(Command::SetLayerMode { enabled });
    }

    pub fn set_name(&mut self, name: &str) {
        self.apply(Command::SetName {
            name: name.to_string(),
        });
    }

    pub fn load_preset(&mut self, preset_id: &str) -> bool {
        self.apply(Command::LoadPreset {
            preset_id: preset_id.to_string(),
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Playback
    // ─────────────────────────────────────────────────────────────────────────

    /// Play the whole tape starting at `now_ms`.
    pub fn play(&mut self, now_ms: f64) -> bool {
        self.advance_to(now_ms);
        self.apply(Command::PlayTape)
    }

    pub fn stop(&mut self) {
        self.apply(Command::StopTape);
    }

    /// Play one sound immediately.
    pub fn play_sound(&mut self, sound_id: &str, now_ms: f64) -> bool {
        self.advance_to(now_ms);
        self.apply(Command::PlaySound {
            sound_id: sound_id.to_string(),
        })
    }

    /// Fire every timer due at `now_ms`. Returns the number of triggers.
    pub fn tick(&mut self, now_ms: f64) -> u32 {
        self.advance_to(now_ms);
        self.inner.tick() as u32
    }

    /// Triggers fired since the last call, as a JSON array.
    pub fn take_triggers_json(&mut self) -> String {
        let fired = self.inner.engine_mut().sink_mut().drain();
        serde_json::to_string(&fired).unwrap_or_else(|_| "[]".to_string())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Readback
    // ─────────────────────────────────────────────────────────────────────────

    pub fn is_playing(&self) -> bool {
        self.inner.is_playing()
    }

    /// Whether the screen-shake pulse is up at `now_ms`.
    pub fn impact_active(&mut self, now_ms: f64) -> bool {
        self.advance_to(now_ms);
        self.inner.engine().impact_active()
    }

    /// The tape's events as a JSON array.
    pub fn sequence_json(&self) -> String {
        serde_json::to_string(self.inner.tape().events()).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn sound_count(&self) -> u32 {
        self.inner.tape().len() as u32
    }

    /// Mono samples of a sound, for building an AudioBuffer.
    pub fn render_sound(&self, sound_id: &str) -> Vec<f32> {
        self.inner
            .bank()
            .resolve(sound_id)
            .map(|b| b.channel(0).collect())
            .unwrap_or_default()
    }

    pub fn sample_rate(&self) -> f64 {
        self.inner.bank().sample_rate()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Sharing
    // ─────────────────────────────────────────────────────────────────────────

    /// Share link for the tape, or undefined when the tape is empty.
    pub fn share_url(&self, base_url: &str) -> Option<String> {
        self.inner.share_url(base_url)
    }

    /// Load a mix from `window.location.search`.
    pub fn load_from_query(&mut self, query: &str) -> bool {
        self.inner.load_from_query(query)
    }
}

impl MixtapeApp {
    fn apply(&mut self, command: Command) -> bool {
        self.inner.apply(command) != CommandResult::Ignored
    }

    fn advance_to(&mut self, now_ms: f64) {
        self.inner.engine_mut().clock_mut().set_now(now_ms);
    }
}
