//! Animation scheduler
//!
//! Owns a set of animated numbers and advances them all each frame.

use crate::animated::AnimatedNumber;
use crate::engine::Frame;
use crate::error::AnimationError;
use slotmap::{new_key_type, SlotMap};
use std::time::Instant;

new_key_type! {
    pub struct CounterId;
}

/// What one scheduler tick produced
#[derive(Debug)]
pub struct Tick<T> {
    pub frames: Vec<(CounterId, Frame<T>)>,
    /// Counters whose step failed; their runs were cancelled
    pub errors: Vec<(CounterId, AnimationError)>,
}

impl<T> Tick<T> {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// The animation scheduler that ticks all counters
pub struct AnimationScheduler<T = f64> {
    counters: SlotMap<CounterId, AnimatedNumber<T>>,
    last_frame: Instant,
}

impl<T: Clone> AnimationScheduler<T> {
    pub fn new() -> Self {
        Self {
            counters: SlotMap::with_key(),
            last_frame: Instant::now(),
        }
    }

    pub fn add_counter(&mut self, counter: AnimatedNumber<T>) -> CounterId {
        self.counters.insert(counter)
    }

    pub fn get_counter(&self, id: CounterId) -> Option<&AnimatedNumber<T>> {
        self.counters.get(id)
    }

    pub fn get_counter_mut(&mut self, id: CounterId) -> Option<&mut AnimatedNumber<T>> {
        self.counters.get_mut(id)
    }

    /// Remove a counter, cancelling any step it still has scheduled
    pub fn remove_counter(&mut self, id: CounterId) -> Option<AnimatedNumber<T>> {
        let mut counter = self.counters.remove(id)?;
        counter.unmount();
        Some(counter)
    }

    /// Tick all counters by the wall-clock time since the last tick, in
    /// milliseconds
    pub fn tick(&mut self) -> Tick<T> {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f64() * 1000.0;
        self.last_frame = now;
        self.tick_by(dt)
    }

    /// Tick all counters by an explicit delta. A counter whose step fails is
    /// reported in [`Tick::errors`]; the others still advance.
    pub fn tick_by(&mut self, dt: f64) -> Tick<T> {
        let mut tick = Tick {
            frames: Vec::new(),
            errors: Vec::new(),
        };
        for (id, counter) in self.counters.iter_mut() {
            match counter.advance(dt) {
                Ok(frames) => tick.frames.extend(frames.into_iter().map(|frame| (id, frame))),
                Err(err) => tick.errors.push((id, err)),
            }
        }
        tick
    }

    /// Check if any counter is still animating
    pub fn has_active_animations(&self) -> bool {
        self.counters.iter().any(|(_, c)| c.is_animating())
    }

    /// Shortest wait until some counter steps again
    pub fn next_delay(&self) -> Option<f64> {
        self.counters
            .iter()
            .filter_map(|(_, c)| c.next_delay())
            .min_by(f64::total_cmp)
    }

    /// Iterate over all counters (immutable)
    pub fn counters_iter(&self) -> impl Iterator<Item = (CounterId, &AnimatedNumber<T>)> {
        self.counters.iter()
    }

    /// Iterate over all counters (mutable)
    pub fn counters_iter_mut(&mut self) -> impl Iterator<Item = (CounterId, &mut AnimatedNumber<T>)> {
        self.counters.iter_mut()
    }

    /// Get the number of counters in the scheduler
    pub fn counter_count(&self) -> usize {
        self.counters.len()
    }
}

impl<T: Clone> Default for AnimationScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnimationConfig;
    use crate::engine::AnimationEngine;

    fn mounted(steps: u32, target: f64) -> AnimatedNumber {
        let engine = AnimationEngine::new(AnimationConfig::default().with_steps(steps)).unwrap();
        let mut counter = AnimatedNumber::new(engine, target).unwrap();
        counter.mount().unwrap();
        counter
    }

    #[test]
    fn test_tick_by_advances_every_counter() {
        let mut scheduler = AnimationScheduler::new();
        let a = scheduler.add_counter(mounted(2, 10.0));
        let b = scheduler.add_counter(mounted(4, 100.0));
        assert_eq!(scheduler.counter_count(), 2);
        assert!(scheduler.has_active_animations());
        assert_eq!(scheduler.next_delay(), Some(14.0));

        let tick = scheduler.tick_by(14.0);
        assert!(tick.is_ok());
        assert_eq!(tick.frames.len(), 2);
        assert_eq!(scheduler.get_counter(a).unwrap().value(), 5.0);
        assert_eq!(scheduler.get_counter(b).unwrap().value(), 25.0);

        scheduler.tick_by(14.0);
        assert!(!scheduler.get_counter(a).unwrap().is_animating());
        assert!(scheduler.has_active_animations());

        scheduler.tick_by(28.0);
        assert!(!scheduler.has_active_animations());
        assert_eq!(scheduler.next_delay(), None);
    }

    #[test]
    fn test_remove_counter() {
        let mut scheduler = AnimationScheduler::new();
        let id = scheduler.add_counter(mounted(2, 10.0));
        let removed = scheduler.remove_counter(id).unwrap();
        assert!(!removed.is_mounted());
        assert!(scheduler.get_counter(id).is_none());
        assert!(scheduler.tick_by(100.0).frames.is_empty());
    }

    #[test]
    fn test_retarget_through_scheduler() {
        let mut scheduler = AnimationScheduler::new();
        let id = scheduler.add_counter(mounted(2, 10.0));
        scheduler.tick_by(14.0);

        let counter = scheduler.get_counter_mut(id).unwrap();
        counter.set_target(0.0).unwrap();
        scheduler.tick_by(100.0);
        assert_eq!(scheduler.get_counter(id).unwrap().value(), 0.0);
    }

    #[test]
    fn test_failing_counter_does_not_block_others() {
        let failing = AnimationEngine::builder()
            .steps(2)
            .try_on_progress(|_, _| Err("offline"))
            .build()
            .unwrap();
        let mut broken = AnimatedNumber::new(failing, 10.0).unwrap();
        broken.mount().unwrap();

        let mut scheduler = AnimationScheduler::new();
        let bad = scheduler.add_counter(broken);
        let good = scheduler.add_counter(mounted(2, 10.0));

        let tick = scheduler.tick_by(14.0);
        assert_eq!(tick.errors.len(), 1);
        assert_eq!(tick.errors[0].0, bad);
        assert_eq!(tick.frames.len(), 1);
        assert_eq!(tick.frames[0].0, good);
        assert_eq!(tick.frames[0].1.value, 5.0);

        assert!(!scheduler.get_counter(bad).unwrap().is_animating());
        let tick = scheduler.tick_by(14.0);
        assert!(tick.is_ok());
        assert_eq!(scheduler.get_counter(good).unwrap().value(), 10.0);
    }

    #[test]
    fn test_wall_clock_tick() {
        let mut scheduler = AnimationScheduler::new();
        scheduler.add_counter(mounted(1, 1.0));
        // Elapsed wall time is tiny, the first step is 14ms out
        let tick = scheduler.tick();
        assert!(tick.is_ok());
        assert!(tick.frames.len() <= 1);
    }
}
