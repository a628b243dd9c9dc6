// src/scheduler.rs
//
// Delay scheduler.
//
// Pure functions that compute each event's absolute start offset from the
// durations of the events before it and a single gap constant. Every
// mutation of a sequence goes through here so no delay is ever stale
// relative to its position.

use crate::catalog::SoundDurations;
use crate::state::SequenceEvent;

/// Delay for a new event appended after `events`.
///
/// Sum of every prior duration, plus one gap per prior event. The first
/// event of a sequence has no leading gap. Never earlier than any existing
/// delay, even when `events` holds authored offsets or was laid out under
/// a wider gap.
pub fn next_delay(events: &[SequenceEvent], durations: &impl SoundDurations, gap_ms: u64) -> u64 {
    let formula: u64 = events
        .iter()
        .map(|e| durations.duration_ms(&e.sound_id) + gap_ms)
        .sum();
    let latest = events.iter().map(|e| e.delay_ms).max().unwrap_or(0);
    formula.max(latest)
}

/// Append a sound, computing its delay. Returns the new event's index.
pub fn append_event(
    events: &mut Vec<SequenceEvent>,
    sound_id: &str,
    volume: f32,
    durations: &impl SoundDurations,
    gap_ms: u64,
) -> usize {
    let delay_ms = next_delay(events, durations, gap_ms);
    events.push(SequenceEvent::new(sound_id, delay_ms, volume));
    events.len() - 1
}

/// Recompute every delay from list order.
///
/// `events[0]` starts at 0; each later event starts one duration plus one
/// gap after its predecessor.
pub fn recompute_delays(
    events: &mut [SequenceEvent],
    durations: &impl SoundDurations,
    gap_ms: u64,
) {
    let mut cursor = 0u64;
    for event in events.iter_mut() {
        event.delay_ms = cursor;
        cursor += durations.duration_ms(&event.sound_id) + gap_ms;
    }
}

/// Move the event at `from` to `to`, then recompute all delays.
///
/// `to` is clamped to the last index. Returns false (and leaves the
/// sequence untouched) when `from` is out of range or the move is a no-op.
pub fn reorder(
    events: &mut Vec<SequenceEvent>,
    from: usize,
    to: usize,
    durations: &impl SoundDurations,
    gap_ms: u64,
) -> bool {
    if from >= events.len() {
        return false;
    }

    let to = to.min(events.len() - 1);
    if from == to {
        return false;
    }

    let moved = events.remove(from);
    events.insert(to, moved);
    recompute_delays(events, durations, gap_ms);
    true
}

/// Remove the event at `index`, then recompute all delays.
///
/// The events after it move up to close the gap. An out-of-range index
/// leaves the sequence untouched.
pub fn remove(
    events: &mut Vec<SequenceEvent>,
    index: usize,
    durations: &impl SoundDurations,
    gap_ms: u64,
) -> Option<SequenceEvent> {
    if index >= events.len() {
        return None;
    }
    let removed = events.remove(index);
    recompute_delays(events, durations, gap_ms);
    Some(removed)
}
