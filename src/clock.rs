// src/clock.rs
//
// Time source and timer queue for the playback engine.
//
// The engine never sleeps or spawns threads. It asks the clock for "now",
// schedules timers at absolute due times, and the host drains whatever is
// due by calling `tick()` on the engine.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Instant;

use crate::event::Timer;

/// Shared time reference plus a schedule-at primitive.
pub trait Clock {
    /// Current time in milliseconds.
    fn now_ms(&self) -> f64;

    /// Schedule a timer at an absolute time on this clock.
    fn schedule_at(&mut self, due_ms: f64, timer: Timer);

    /// Pop the next timer whose due time has passed.
    fn pop_due(&mut self) -> Option<Timer>;

    /// Number of timers still waiting.
    fn pending(&self) -> usize;

    /// Schedule a timer `offset_ms` after now.
    fn schedule_in(&mut self, offset_ms: f64, timer: Timer) {
        let due = self.now_ms() + offset_ms.max(0.0);
        self.schedule_at(due, timer);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Timer queue
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
struct QueuedTimer {
    due_ms: f64,
    seq: u64,
    timer: Timer,
}

impl PartialEq for QueuedTimer {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueuedTimer {}

impl PartialOrd for QueuedTimer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedTimer {
    // Reversed so the BinaryHeap pops the earliest timer first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due_ms
            .total_cmp(&self.due_ms)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Min-heap of timers ordered by due time, then insertion order.
#[derive(Debug, Default)]
pub struct TimerQueue {
    heap: BinaryHeap<QueuedTimer>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, due_ms: f64, timer: Timer) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(QueuedTimer { due_ms, seq, timer });
    }

    /// Pop the earliest timer if it is due at `now_ms`.
    pub fn pop_due(&mut self, now_ms: f64) -> Option<Timer> {
        if self.heap.peek()?.due_ms <= now_ms {
            self.heap.pop().map(|q| q.timer)
        } else {
            None
        }
    }

    /// Due time of the earliest timer.
    pub fn next_due(&self) -> Option<f64> {
        self.heap.peek().map(|q| q.due_ms)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Manual clock
// ═══════════════════════════════════════════════════════════════════════════

/// Clock that only moves when told to.
///
/// Used by tests, and by the web binding where JS supplies the time.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: f64,
    timers: TimerQueue,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(now_ms: f64) -> Self {
        Self {
            now_ms,
            timers: TimerQueue::new(),
        }
    }

    /// Move time forward.
    pub fn advance(&mut self, ms: f64) {
        self.now_ms += ms.max(0.0);
    }

    /// Jump to an absolute time. Going backwards is ignored.
    pub fn set_now(&mut self, now_ms: f64) {
        if now_ms > self.now_ms {
            self.now_ms = now_ms;
        }
    }

    pub fn next_due(&self) -> Option<f64> {
        self.timers.next_due()
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now_ms
    }

    fn schedule_at(&mut self, due_ms: f64, timer: Timer) {
        self.timers.push(due_ms, timer);
    }

    fn pop_due(&mut self) -> Option<Timer> {
        self.timers.pop_due(self.now_ms)
    }

    fn pending(&self) -> usize {
        self.timers.len()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// System clock
// ═══════════════════════════════════════════════════════════════════════════

/// Wall clock backed by a monotonic Instant.
#[derive(Debug)]
pub struct SystemClock {
    origin: Instant,
    timers: TimerQueue,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            timers: TimerQueue::new(),
        }
    }

    /// Milliseconds until the next timer is due, if any are pending.
    pub fn until_next_ms(&self) -> Option<f64> {
        self.timers
            .next_due()
            .map(|due| (due - self.now_ms()).max(0.0))
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }

    fn schedule_at(&mut self, due_ms: f64, timer: Timer) {
        self.timers.push(due_ms, timer);
    }

    fn pop_due(&mut self) -> Option<Timer> {
        let now = self.now_ms();
        self.timers.pop_due(now)
    }

    fn pending(&self) -> usize {
        self.timers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finish(generation: u64) -> Timer {
        Timer::Finish { generation }
    }

    #[test]
    fn test_timers_pop_in_due_order() {
        let mut clock = ManualClock::new();
        clock.schedule_at(300.0, finish(3));
        clock.schedule_at(100.0, finish(1));
        clock.schedule_at(200.0, finish(2));

        assert!(clock.pop_due().is_none());

        clock.advance(1000.0);
        let order: Vec<_> = std::iter::from_fn(|| clock.pop_due()).collect();
        assert_eq!(order, vec![finish(1), finish(2), finish(3)]);
    }

    #[test]
    fn test_equal_due_times_keep_insertion_order() {
        let mut clock = ManualClock::new();
        for generation in 0..5 {
            clock.schedule_at(50.0, finish(generation));
        }
        clock.advance(50.0);

        let order: Vec<_> = std::iter::from_fn(|| clock.pop_due()).collect();
        assert_eq!(order, (0..5).map(finish).collect::<Vec<_>>());
    }

    #[test]
    fn test_schedule_in_is_relative_to_now() {
        let mut clock = ManualClock::starting_at(1_000.0);
        clock.schedule_in(250.0, finish(0));
        assert_eq!(clock.next_due(), Some(1_250.0));

        clock.advance(249.0);
        assert!(clock.pop_due().is_none());
        clock.advance(1.0);
        assert_eq!(clock.pop_due(), Some(finish(0)));
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn test_set_now_is_monotonic() {
        let mut clock = ManualClock::new();
        clock.set_now(500.0);
        clock.set_now(100.0);
        assert_eq!(clock.now_ms(), 500.0);
    }
}
