//! Driver that runs an engine on a timer queue
//!
//! [`AnimatedNumber`] plays the part of a mounted counter widget: it keeps a
//! target, starts a run when mounted or when the target changes, and owns the
//! single timer that schedules the next step. Time is measured in the same
//! units as the configured interval (milliseconds for wall-clock drivers).

use smallvec::SmallVec;

use crate::engine::{AnimationEngine, Frame};
use crate::error::Result;
use crate::timer::{TimerId, TimerQueue};
use crate::value::IntoValue;

/// Frames produced by one [`AnimatedNumber::advance`] call
pub type Frames<T> = SmallVec<[Frame<T>; 4]>;

/// An engine bound to its own step timer
pub struct AnimatedNumber<T = f64> {
    engine: AnimationEngine<T>,
    timers: TimerQueue,
    /// The one outstanding step timer, if any
    pending: Option<TimerId>,
    target: f64,
    mounted: bool,
}

impl<T: Clone> AnimatedNumber<T> {
    /// Wrap an engine; nothing animates until [`AnimatedNumber::mount`]
    pub fn new(engine: AnimationEngine<T>, target: impl IntoValue) -> Result<Self> {
        Ok(Self {
            engine,
            timers: TimerQueue::new(),
            pending: None,
            target: target.into_value()?,
            mounted: false,
        })
    }

    /// Start animating from the engine's current value to the target. The
    /// first step waits for the configured start delay plus the timing delay.
    pub fn mount(&mut self) -> Result<()> {
        if self.mounted {
            return Ok(());
        }
        self.engine.begin(self.engine.value(), self.target)?;
        self.mounted = true;
        let delay = self.engine.config().start_delay + self.engine.timing_delay();
        self.schedule(delay);
        Ok(())
    }

    /// Change the target. Returns false if it is unchanged.
    ///
    /// While mounted this abandons the pending step and starts a new run from
    /// the current value.
    pub fn set_target(&mut self, target: impl IntoValue) -> Result<bool> {
        let target = target.into_value()?;
        if target == self.target {
            return Ok(false);
        }
        self.target = target;
        if !self.mounted {
            return Ok(true);
        }

        self.clear_pending();
        self.engine.retarget(target)?;
        self.schedule(self.engine.timing_delay());
        Ok(true)
    }

    /// Move time forward by `dt`, running every step that comes due.
    ///
    /// A failing callback cancels the run, leaving the value where the last
    /// committed step put it, and the error is returned. Steps are not
    /// retried; setting a new target starts a fresh run.
    pub fn advance(&mut self, dt: f64) -> Result<Frames<T>> {
        let until = self.timers.now() + dt.max(0.0);
        let mut frames = Frames::new();

        while let Some(fired) = self.timers.pop_due(until) {
            if self.pending != Some(fired.id) || fired.generation != self.engine.generation() {
                tracing::trace!(generation = fired.generation, "dropping stale step timer");
                continue;
            }
            self.pending = None;

            let frame = match self.engine.step() {
                Ok(frame) => frame,
                Err(err) => {
                    self.engine.cancel();
                    tracing::warn!(error = %err, "animation step failed, run cancelled");
                    return Err(err);
                }
            };
            if frame.active {
                self.schedule(self.engine.timing_delay());
            }
            frames.push(frame);
        }

        self.timers.advance_to(until);
        Ok(frames)
    }

    /// Time left until the pending step
    pub fn next_delay(&self) -> Option<f64> {
        let due = self.timers.due(self.pending?)?;
        Some((due - self.timers.now()).max(0.0))
    }

    /// Stop the current run where it is. Returns false if nothing was running.
    pub fn cancel(&mut self) -> bool {
        self.clear_pending();
        self.engine.cancel()
    }

    /// Cancel and detach; a later [`AnimatedNumber::mount`] starts over from
    /// the current value
    pub fn unmount(&mut self) {
        self.cancel();
        self.timers.cancel_all();
        self.mounted = false;
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn is_animating(&self) -> bool {
        self.engine.is_active()
    }

    pub fn value(&self) -> f64 {
        self.engine.value()
    }

    pub fn display(&self) -> &T {
        self.engine.display()
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    /// Current time on the driver's clock
    pub fn now(&self) -> f64 {
        self.timers.now()
    }

    pub fn engine(&self) -> &AnimationEngine<T> {
        &self.engine
    }

    fn schedule(&mut self, delay: f64) {
        let id = self.timers.schedule(delay, self.engine.generation());
        self.pending = Some(id);
    }

    fn clear_pending(&mut self) {
        if let Some(id) = self.pending.take() {
            self.timers.cancel(id);
        }
    }
}
