//! Cancelable timers on a virtual clock
//!
//! The queue never reads the system clock. Callers move time forward with
//! [`TimerQueue::pop_due`] and [`TimerQueue::advance_to`], which keeps drivers
//! deterministic under test and lets a real-time loop supply wall-clock deltas.

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle to a scheduled timer
    pub struct TimerId;
}

struct Timer {
    due: f64,
    /// Run generation the timer was scheduled for
    generation: u64,
    /// Insertion order, breaks ties between timers due at the same time
    seq: u64,
}

/// A timer that came due
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FiredTimer {
    pub id: TimerId,
    pub due: f64,
    pub generation: u64,
}

/// Queue of pending timers
pub struct TimerQueue {
    timers: SlotMap<TimerId, Timer>,
    now: f64,
    next_seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self {
            timers: SlotMap::with_key(),
            now: 0.0,
            next_seq: 0,
        }
    }

    /// Current virtual time
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Schedule a timer `delay` units from now, tagged with a run generation
    pub fn schedule(&mut self, delay: f64, generation: u64) -> TimerId {
        let delay = if delay.is_finite() { delay.max(0.0) } else { 0.0 };
        let seq = self.next_seq;
        self.next_seq += 1;
        let id = self.timers.insert(Timer {
            due: self.now + delay,
            generation,
            seq,
        });
        tracing::trace!(?id, delay, generation, "timer scheduled");
        id
    }

    /// Cancel a pending timer. Returns false if it already fired or was
    /// cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.timers.remove(id).is_some()
    }

    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    /// Due time of a pending timer
    pub fn due(&self, id: TimerId) -> Option<f64> {
        self.timers.get(id).map(|t| t.due)
    }

    /// Earliest pending timer
    pub fn next_due(&self) -> Option<(TimerId, f64)> {
        self.timers
            .iter()
            .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)))
            .map(|(id, t)| (id, t.due))
    }

    /// Remove and return the earliest timer due at or before `until`, moving
    /// the clock to its due time
    pub fn pop_due(&mut self, until: f64) -> Option<FiredTimer> {
        let (id, due) = self.next_due()?;
        if due > until {
            return None;
        }
        let timer = self.timers.remove(id)?;
        self.now = self.now.max(due);
        tracing::trace!(?id, due, "timer fired");
        Some(FiredTimer {
            id,
            due,
            generation: timer.generation,
        })
    }

    /// Move the clock forward without firing anything. Time never runs
    /// backwards.
    pub fn advance_to(&mut self, time: f64) {
        if time > self.now {
            self.now = time;
        }
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

impl Default for TimerQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timers_fire_in_due_order() {
        let mut queue = TimerQueue::new();
        let late = queue.schedule(30.0, 1);
        let early = queue.schedule(10.0, 1);
        let tie = queue.schedule(10.0, 2);

        assert_eq!(queue.pop_due(100.0).map(|t| t.id), Some(early));
        assert_eq!(queue.now(), 10.0);
        assert_eq!(queue.pop_due(100.0).map(|t| t.id), Some(tie));
        assert_eq!(queue.pop_due(100.0).map(|t| t.id), Some(late));
        assert!(queue.pop_due(100.0).is_none());
        assert_eq!(queue.now(), 30.0);
    }

    #[test]
    fn test_pop_due_respects_deadline() {
        let mut queue = TimerQueue::new();
        queue.schedule(20.0, 1);
        assert!(queue.pop_due(19.9).is_none());
        assert_eq!(queue.now(), 0.0);

        queue.advance_to(19.9);
        let fired = queue.pop_due(20.0).unwrap();
        assert_eq!(fired.due, 20.0);
        assert_eq!(fired.generation, 1);
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let mut queue = TimerQueue::new();
        let id = queue.schedule(5.0, 1);
        assert!(queue.is_pending(id));
        assert!(queue.cancel(id));
        assert!(!queue.cancel(id));
        assert!(!queue.is_pending(id));
        assert!(queue.pop_due(100.0).is_none());

        // A new timer does not reuse the cancelled handle
        let other = queue.schedule(5.0, 2);
        assert_ne!(id, other);
    }

    #[test]
    fn test_delay_is_relative_to_now() {
        let mut queue = TimerQueue::new();
        queue.advance_to(50.0);
        let id = queue.schedule(14.0, 1);
        assert_eq!(queue.due(id), Some(64.0));

        let id = queue.schedule(-3.0, 1);
        assert_eq!(queue.due(id), Some(50.0));
        queue.advance_to(10.0);
        assert_eq!(queue.now(), 50.0);
    }
}
