// src/sink.rs
//
// Trigger sinks: where started sound instances go.
//
// The engine hands every instance to a sink and forgets about it. The sink
// is append-only from the engine's point of view: no completion callbacks,
// no locking per trigger.

use serde::Serialize;

use crate::audio_buffer::PlayableBuffer;
use crate::event::TriggerParams;

/// Output for started sound instances.
pub trait TriggerSink {
    /// Start one independent instance of `buffer`.
    fn trigger(&mut self, sound_id: &str, buffer: &PlayableBuffer, params: TriggerParams);
}

/// A trigger as recorded by [`TriggerQueue`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FiredTrigger {
    pub sound_id: String,
    pub start_at_ms: f64,
    pub volume: f32,
    pub playback_rate: f64,
    /// Buffer duration at normal speed.
    pub duration_ms: f64,
}

/// Sink that buffers triggers until the host drains them.
#[derive(Debug, Default)]
pub struct TriggerQueue {
    fired: Vec<FiredTrigger>,
}

impl TriggerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every trigger fired since the last drain.
    pub fn drain(&mut self) -> Vec<FiredTrigger> {
        std::mem::take(&mut self.fired)
    }

    pub fn fired(&self) -> &[FiredTrigger] {
        &self.fired
    }

    pub fn len(&self) -> usize {
        self.fired.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fired.is_empty()
    }
}

impl TriggerSink for TriggerQueue {
    fn trigger(&mut self, sound_id: &str, buffer: &PlayableBuffer, params: TriggerParams) {
        self.fired.push(FiredTrigger {
            sound_id: sound_id.to_string(),
            start_at_ms: params.start_at_ms,
            volume: params.volume,
            playback_rate: params.playback_rate,
            duration_ms: buffer.duration_ms(),
        });
    }
}

/// Sink that only logs what would play.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl TriggerSink for LogSink {
    fn trigger(&mut self, sound_id: &str, buffer: &PlayableBuffer, params: TriggerParams) {
        log::info!(
            "▶ {} @ {:.0}ms (vol {:.2}, rate {}x, {:.0}ms)",
            sound_id,
            params.start_at_ms,
            params.volume,
            params.playback_rate,
            buffer.duration_ms() / params.playback_rate
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_drains() {
        let mut queue = TriggerQueue::new();
        let buffer = PlayableBuffer::mono(vec![0.0; 800], 1_000.0);
        let params = TriggerParams {
            start_at_ms: 25.0,
            volume: 0.5,
            playback_rate: 1.5,
        };

        queue.trigger("tung", &buffer, params);
        queue.trigger("tata", &buffer, params);
        assert_eq!(queue.len(), 2);

        let fired = queue.drain();
        assert_eq!(fired[0].sound_id, "tung");
        assert_eq!(fired[1].duration_ms, 800.0);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_fired_trigger_json() {
        let fired = FiredTrigger {
            sound_id: "brr".into(),
            start_at_ms: 10.0,
            volume: 1.0,
            playback_rate: 1.0,
            duration_ms: 800.0,
        };
        let json = serde_json::to_value(&fired).unwrap();
        assert_eq!(json["soundId"], "brr");
        assert_eq!(json["startAtMs"], 10.0);
        assert_eq!(json["playbackRate"], 1.0);
    }
}
