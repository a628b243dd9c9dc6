// src/playback.rs
//
// Playback engine.
//
// Turns a tape into trigger timers on a shared clock and tracks whether a
// full-tape run is in progress. The "playing" flag is a timer-based
// estimate: it drops back to Idle once the last sound's offset plus its
// effective duration plus a short tail has elapsed, whether or not the
// audio output has actually finished.

use crate::clock::Clock;
use crate::config::MixtapeConfig;
use crate::event::{PendingTrigger, Timer, TriggerParams};
use crate::sink::TriggerSink;
use crate::source::SoundSource;
use crate::state::{PlaybackSpeed, SequenceEvent, Tape};

/// Timing constants used by the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackTiming {
    /// Duration assumed for sounds that cannot be resolved (ms).
    pub default_duration_ms: f64,

    /// Buffer after the last sound before the run counts as finished (ms).
    pub tail_ms: f64,

    /// Lifetime of the impact pulse after each trigger (ms).
    pub impact_decay_ms: f64,
}

impl Default for PlaybackTiming {
    fn default() -> Self {
        Self::from_config(&MixtapeConfig::default())
    }
}

impl PlaybackTiming {
    pub fn from_config(config: &MixtapeConfig) -> Self {
        Self {
            default_duration_ms: config.default_duration_ms as f64,
            tail_ms: config.tail_ms as f64,
            impact_decay_ms: config.impact_decay_ms as f64,
        }
    }
}

/// Full-tape playback state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,

    Playing {
        /// Clock time the run started.
        started_at_ms: f64,
        /// Clock time the run is estimated to end.
        ends_at_ms: f64,
    },
}

/// Schedules and fires sound triggers against a clock.
pub struct PlaybackEngine<C, S, K>
where
    C: Clock,
    S: SoundSource,
    K: TriggerSink,
{
    clock: C,
    source: S,
    sink: K,
    timing: PlaybackTiming,

    state: PlaybackState,

    /// Generation of the most recent run.
    generation: u64,

    /// Runs up to and including this generation were stopped.
    cancelled_through: u64,

    /// Clock time the impact pulse expires.
    impact_until_ms: Option<f64>,

    impact_pulses: u64,
}

impl<C, S, K> PlaybackEngine<C, S, K>
where
    C: Clock,
    S: SoundSource,
    K: TriggerSink,
{
    pub fn new(clock: C, source: S, sink: K, timing: PlaybackTiming) -> Self {
        Self {
            clock,
            source,
            sink,
            timing,
            state: PlaybackState::Idle,
            generation: 0,
            cancelled_through: 0,
            impact_until_ms: None,
            impact_pulses: 0,
        }
    }

    // -------------------------------
    // MARK: Full-tape playback
    // -------------------------------

    /// Schedule every event of the tape.
    ///
    /// Rejected when the tape is empty or a run is already in progress.
    pub fn play(&mut self, tape: &Tape) -> bool {
        if tape.is_empty() {
            log::debug!("play: tape is empty");
            return false;
        }
        if self.is_playing() {
            log::debug!("play: already playing");
            return false;
        }

        let Some(total_ms) = self.estimate_total_ms(tape.events(), tape.speed()) else {
            return false;
        };

        self.generation += 1;
        let generation = self.generation;
        let rate = tape.speed().factor();
        let now = self.clock.now_ms();

        for event in tape.events() {
            let start_at_ms = now + event.delay_ms as f64;
            self.clock.schedule_at(
                start_at_ms,
                Timer::Trigger(PendingTrigger {
                    generation,
                    sound_id: event.sound_id.clone(),
                    volume: event.volume,
                    playback_rate: rate,
                    start_at_ms,
                }),
            );
        }

        let ends_at_ms = now + total_ms;
        self.clock.schedule_at(ends_at_ms, Timer::Finish { generation });
        self.state = PlaybackState::Playing {
            started_at_ms: now,
            ends_at_ms,
        };

        log::info!(
            "Playing {} sounds at {}x (~{:.0}ms)",
            tape.len(),
            rate,
            total_ms
        );
        true
    }

    /// Cancel the current run.
    ///
    /// Its pending triggers are dropped when they come due. Single sounds
    /// already started are not affected.
    pub fn stop(&mut self) {
        self.cancelled_through = self.generation;
        if self.is_playing() {
            log::debug!("Stopped run {}", self.generation);
        }
        self.state = PlaybackState::Idle;
    }

    /// Fire every timer that is due.
    ///
    /// Returns the number of sounds triggered.
    pub fn tick(&mut self) -> usize {
        let mut fired = 0;
        while let Some(timer) = self.clock.pop_due() {
            match timer {
                Timer::Trigger(pending) => {
                    if pending.generation <= self.cancelled_through {
                        continue;
                    }
                    if self.fire(
                        &pending.sound_id,
                        pending.volume,
                        pending.playback_rate,
                        pending.start_at_ms,
                    ) {
                        fired += 1;
                    }
                }

                Timer::Finish { generation } => {
                    if generation == self.generation && self.is_playing() {
                        self.state = PlaybackState::Idle;
                        log::debug!("Run {} finished", generation);
                    }
                }
            }
        }
        fired
    }

    // -------------------------------
    // MARK: Single sounds
    // -------------------------------

    /// Play one sound right now, independent of the run state.
    pub fn play_sound(&mut self, sound_id: &str, volume: f32, speed: PlaybackSpeed) -> bool {
        let now = self.clock.now_ms();
        self.fire(sound_id, volume, speed.factor(), now)
    }

    fn fire(&mut self, sound_id: &str, volume: f32, playback_rate: f64, start_at_ms: f64) -> bool {
        let Some(buffer) = self.source.resolve(sound_id) else {
            log::debug!("No buffer for {}, skipping", sound_id);
            return false;
        };

        self.sink.trigger(
            sound_id,
            buffer,
            TriggerParams {
                start_at_ms,
                volume,
                playback_rate,
            },
        );

        self.impact_until_ms = Some(self.clock.now_ms() + self.timing.impact_decay_ms);
        self.impact_pulses += 1;
        true
    }

    // -------------------------------
    // MARK: Timing
    // -------------------------------

    /// Duration of a sound at the given speed (ms).
    pub fn effective_duration_ms(&self, sound_id: &str, speed: PlaybackSpeed) -> f64 {
        let duration = self
            .source
            .resolve(sound_id)
            .map(|b| b.duration_ms())
            .unwrap_or(self.timing.default_duration_ms);
        speed.effective_ms(duration)
    }

    /// Estimated run length: last event's offset, plus its effective
    /// duration, plus the tail.
    pub fn estimate_total_ms(&self, events: &[SequenceEvent], speed: PlaybackSpeed) -> Option<f64> {
        let last = events.last()?;
        Some(
            last.delay_ms as f64
                + self.effective_duration_ms(&last.sound_id, speed)
                + self.timing.tail_ms,
        )
    }

    // -------------------------------
    // MARK: Accessors
    // -------------------------------

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.state, PlaybackState::Playing { .. })
    }

    /// Whether a trigger happened within the impact window.
    pub fn impact_active(&self) -> bool {
        self.impact_until_ms
            .is_some_and(|until| self.clock.now_ms() < until)
    }

    /// Number of times the impact pulse was armed.
    pub fn impact_pulses(&self) -> u64 {
        self.impact_pulses
    }

    pub fn timing(&self) -> PlaybackTiming {
        self.timing
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut K {
        &mut self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{SoundCatalog, SoundDescriptor};
    use crate::clock::ManualClock;
    use crate::sink::TriggerQueue;
    use crate::source::SoundBank;
    use crate::synth::SoundKind;

    type TestEngine = PlaybackEngine<ManualClock, SoundBank, TriggerQueue>;

    // Sample rate of 1 kHz keeps buffer durations exact in ms.
    fn engine() -> TestEngine {
        let bank = SoundBank::synthesized(SoundCatalog::standard(), 1_000.0, 1);
        PlaybackEngine::new(
            ManualClock::new(),
            bank,
            TriggerQueue::new(),
            PlaybackTiming::default(),
        )
    }

    fn tape(sounds: &[&str]) -> Tape {
        let catalog = SoundCatalog::standard();
        let mut tape = Tape::new();
        for id in sounds {
            tape.append(id, &catalog);
        }
        tape
    }

    fn advance(engine: &mut TestEngine, ms: f64) -> usize {
        engine.clock_mut().advance(ms);
        engine.tick()
    }

    #[test]
    fn test_triggers_fire_at_offsets() {
        let mut engine = engine();
        let tape = tape(&["tung", "tata", "brr"]); // 0, 1000, 2000

        assert!(engine.play(&tape));
        assert_eq!(engine.tick(), 1);
        assert_eq!(advance(&mut engine, 999.0), 0);
        assert_eq!(advance(&mut engine, 1.0), 1);
        assert_eq!(advance(&mut engine, 1000.0), 1);

        let fired = engine.sink_mut().drain();
        let starts: Vec<_> = fired.iter().map(|f| f.start_at_ms).collect();
        assert_eq!(starts, vec![0.0, 1000.0, 2000.0]);
        assert!(fired.iter().all(|f| f.playback_rate == 1.0 && f.volume == 1.0));
    }

    #[test]
    fn test_second_play_rejected_until_estimate_elapses() {
        let mut engine = engine();
        let tape = tape(&["tung", "scream"]); // scream at 1000, 2000ms long

        assert!(engine.play(&tape));
        assert!(engine.is_playing());
        assert!(!engine.play(&tape));

        // 1000 + 2000 + 500
        assert_eq!(
            engine.state(),
            PlaybackState::Playing {
                started_at_ms: 0.0,
                ends_at_ms: 3500.0
            }
        );

        advance(&mut engine, 3499.0);
        assert!(engine.is_playing());
        advance(&mut engine, 1.0);
        assert!(!engine.is_playing());

        assert!(engine.play(&tape));
    }

    #[test]
    fn test_speed_scales_estimate_and_rate() {
        let mut engine = engine();
        let mut tape = tape(&["tung"]);
        tape.set_speed(PlaybackSpeed::Faster);

        // 0 + 800 / 1.5 + 500
        let total = engine.estimate_total_ms(tape.events(), tape.speed()).unwrap();
        assert!((total - (800.0 / 1.5 + 500.0)).abs() < 1e-9);

        engine.play(&tape);
        engine.tick();
        assert_eq!(engine.sink().fired()[0].playback_rate, 1.5);
    }

    #[test]
    fn test_empty_tape_is_rejected() {
        let mut engine = engine();
        assert!(!engine.play(&Tape::new()));
        assert_eq!(engine.state(), PlaybackState::Idle);
        assert_eq!(engine.clock().pending(), 0);
    }

    #[test]
    fn test_missing_sound_is_skipped() {
        let mut engine = engine();
        let mut catalog = SoundCatalog::standard();
        catalog.register(SoundDescriptor::new("ghost", SoundKind::Beep, "", "", "", ""));

        // "ghost" is known to this catalog but not to the engine's bank.
        let mut tape = Tape::new();
        tape.append("tung", &catalog);
        tape.append("ghost", &catalog);
        tape.append("tata", &catalog);

        assert!(engine.play(&tape));
        advance(&mut engine, 10_000.0);

        let ids: Vec<_> = engine.sink().fired().iter().map(|f| f.sound_id.clone()).collect();
        assert_eq!(ids, vec!["tung", "tata"]);
    }

    #[test]
    fn test_unknown_last_sound_uses_default_duration() {
        let engine = engine();
        let events = vec![SequenceEvent::new("ghost", 100, 1.0)];
        assert_eq!(
            engine.estimate_total_ms(&events, PlaybackSpeed::Normal),
            Some(100.0 + 1000.0 + 500.0)
        );
    }

    #[test]
    fn test_play_sound_is_independent_of_run_state() {
        let mut engine = engine();
        let tape = tape(&["tung", "tata"]);

        assert!(engine.play_sound("chaos", 0.5, PlaybackSpeed::Slow));
        assert!(!engine.is_playing());

        engine.play(&tape);
        assert!(engine.play_sound("alarm", 1.0, PlaybackSpeed::Normal));
        assert!(engine.is_playing());
        assert!(!engine.play_sound("nope", 1.0, PlaybackSpeed::Normal));

        let first = &engine.sink().fired()[0];
        assert_eq!(first.sound_id, "chaos");
        assert_eq!(first.volume, 0.5);
        assert_eq!(first.playback_rate, 0.75);
    }

    #[test]
    fn test_impact_pulse_rearms() {
        let mut engine = engine();
        assert!(!engine.impact_active());

        engine.play_sound("tung", 1.0, PlaybackSpeed::Normal);
        assert!(engine.impact_active());

        advance(&mut engine, 200.0);
        engine.play_sound("tung", 1.0, PlaybackSpeed::Normal);
        advance(&mut engine, 200.0);
        assert!(engine.impact_active());

        advance(&mut engine, 100.0);
        assert!(!engine.impact_active());
        assert_eq!(engine.impact_pulses(), 2);
    }

    #[test]
    fn test_stop_cancels_pending_triggers() {
        let mut engine = engine();
        let tape = tape(&["tung", "tata", "brr"]);

        engine.play(&tape);
        engine.tick();
        engine.stop();
        assert!(!engine.is_playing());

        advance(&mut engine, 10_000.0);
        assert_eq!(engine.sink().len(), 1);

        // A fresh run plays in full.
        assert!(engine.play(&tape));
        advance(&mut engine, 10_000.0);
        assert_eq!(engine.sink().len(), 4);
    }

    #[test]
    fn test_run_snapshot_ignores_later_edits() {
        let mut engine = engine();
        let catalog = SoundCatalog::standard();
        let mut tape = tape(&["tung", "tata"]);

        engine.play(&tape);
        tape.clear();
        tape.append("scream", &catalog);

        advance(&mut engine, 10_000.0);
        let ids: Vec<_> = engine.sink().fired().iter().map(|f| f.sound_id.clone()).collect();
        assert_eq!(ids, vec!["tung", "tata"]);
    }

    #[test]
    fn test_straggler_from_finished_run_still_plays() {
        let mut engine = engine();
        // Out-of-order authored delays: the last event is not the latest.
        let mix = crate::state::MixRecord {
            name: String::new(),
            sequence: vec![
                SequenceEvent::new("tung", 3000, 1.0),
                SequenceEvent::new("tata", 0, 1.0),
            ],
            speed: PlaybackSpeed::Normal,
            layer_mode: false,
        };
        let tape = Tape::from_mix(mix, Default::default());

        engine.play(&tape);
        advance(&mut engine, 1300.0); // 0 + 800 + 500
        assert!(!engine.is_playing());

        assert!(engine.play(&tape));
        advance(&mut engine, 1700.0);
        let ids: Vec<_> = engine.sink().fired().iter().map(|f| f.sound_id.clone()).collect();
        assert_eq!(ids, vec!["tata", "tata", "tung"]);
    }
}
