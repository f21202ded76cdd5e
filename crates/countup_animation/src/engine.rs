//! The stepping engine behind an animated number
//!
//! An [`AnimationEngine`] walks a value from a start to a target in discrete
//! steps. It never waits on its own: a driver asks it for the delay before the
//! next step ([`AnimationEngine::timing_delay`]), waits, then calls
//! [`AnimationEngine::step`] until the returned frame is no longer active.
//!
//! Each run ends exactly on its target. A step that would reach or pass the
//! target is clamped to it, so `count_by` values that do not divide the span
//! never overshoot.

use std::fmt;

use crate::config::AnimationConfig;
use crate::error::{AnimationError, BoxError, CallbackError, Hook, Result};
use crate::timing::TimingFunction;
use crate::value::IntoValue;

/// Projects the numeric value into what gets displayed
pub type Formatter<T> = Box<dyn Fn(f64) -> std::result::Result<T, BoxError> + Send>;

/// Called with `(old, new)` before each step is committed
pub type ProgressHook = Box<dyn FnMut(f64, f64) -> std::result::Result<(), BoxError> + Send>;

/// Called once when a run reaches its target
pub type FinishHook = Box<dyn FnMut() -> std::result::Result<(), BoxError> + Send>;

/// Lifecycle of the current run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStatus {
    /// No run has been started yet
    Idle,
    Running,
    /// Reached its target
    Finished,
    /// Stopped by [`AnimationEngine::cancel`] before reaching its target
    Cancelled,
}

/// State of one animation run
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationRun {
    pub start_value: f64,
    pub target_value: f64,
    pub current_value: f64,
    /// `Some(true)` when counting up, `Some(false)` when counting down,
    /// `None` until the run's first step
    pub direction: Option<bool>,
    /// True while steps remain
    pub active: bool,
    pub status: RunStatus,
    /// Bumped by every `begin` and `cancel`
    pub generation: u64,
}

impl AnimationRun {
    fn idle(value: f64) -> Self {
        Self {
            start_value: value,
            target_value: value,
            current_value: value,
            direction: None,
            active: false,
            status: RunStatus::Idle,
            generation: 0,
        }
    }

    /// Fraction of the run's span covered so far; 0 for zero-length runs
    pub fn progress(&self) -> f64 {
        let span = self.target_value - self.start_value;
        if span == 0.0 {
            0.0
        } else {
            (self.current_value - self.start_value) / span
        }
    }
}

/// Result of a single step
#[derive(Clone, Debug, PartialEq)]
pub struct Frame<T> {
    pub value: f64,
    pub display: T,
    /// False once the run has finished or was cancelled
    pub active: bool,
}

/// Steps a value towards a target
pub struct AnimationEngine<T = f64> {
    config: AnimationConfig,
    timing: TimingFunction,
    run: AnimationRun,
    display: T,
    formatter: Formatter<T>,
    on_progress: Option<ProgressHook>,
    on_finish: Option<FinishHook>,
}

impl AnimationEngine<f64> {
    /// Create an engine that displays raw values
    pub fn new(config: AnimationConfig) -> Result<Self> {
        Self::builder().config(config).build()
    }

    pub fn builder() -> AnimationEngineBuilder<f64> {
        AnimationEngineBuilder::new()
    }
}

impl<T: Clone> AnimationEngine<T> {
    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    pub fn timing(&self) -> &TimingFunction {
        &self.timing
    }

    pub fn run(&self) -> &AnimationRun {
        &self.run
    }

    /// Last committed value
    pub fn value(&self) -> f64 {
        self.run.current_value
    }

    /// Formatted form of the last committed value
    pub fn display(&self) -> &T {
        &self.display
    }

    pub fn target(&self) -> f64 {
        self.run.target_value
    }

    pub fn direction(&self) -> Option<bool> {
        self.run.direction
    }

    pub fn is_active(&self) -> bool {
        self.run.active
    }

    pub fn status(&self) -> RunStatus {
        self.run.status
    }

    pub fn generation(&self) -> u64 {
        self.run.generation
    }

    pub fn progress(&self) -> f64 {
        self.run.progress()
    }

    /// Delay before the next step, from the current progress
    pub fn timing_delay(&self) -> f64 {
        self.timing_delay_at(self.progress())
    }

    /// Delay for an arbitrary progress value
    pub fn timing_delay_at(&self, progress: f64) -> f64 {
        self.timing.delay(self.config.interval, progress)
    }

    /// Start a new run from `from` to `to`, replacing any current run
    pub fn begin(&mut self, from: impl IntoValue, to: impl IntoValue) -> Result<()> {
        let from = from.into_value()?;
        let to = to.into_value()?;

        if from != self.run.current_value {
            self.display = self.format(from)?;
        }

        let generation = self.run.generation + 1;
        self.run = AnimationRun {
            start_value: from,
            target_value: to,
            current_value: from,
            direction: None,
            active: true,
            status: RunStatus::Running,
            generation,
        };

        tracing::debug!(from, to, generation, "animation run started");
        Ok(())
    }

    /// Start a new run from the current value towards `to`
    pub fn retarget(&mut self, to: impl IntoValue) -> Result<()> {
        self.begin(self.run.current_value, to)
    }

    /// Advance the run by one step.
    ///
    /// On an inactive run this is a no-op that returns the committed frame;
    /// no callbacks fire. A failing callback aborts the step before the new
    /// value is committed, except `on_finish`, which runs after the final
    /// commit.
    pub fn step(&mut self) -> Result<Frame<T>> {
        if !self.run.active {
            tracing::trace!(status = ?self.run.status, "step on inactive run ignored");
            return Ok(self.frame());
        }

        let previous = self.run.current_value;
        let target = self.run.target_value;

        let raw_step = (target - self.run.start_value) / self.config.steps as f64;
        let sign = if raw_step >= 0.0 { 1.0 } else { -1.0 };
        let step = match self.config.count_by {
            Some(count_by) => sign * count_by.abs(),
            None => raw_step,
        };
        let direction = step > 0.0;

        let mut candidate = previous + step;
        // A step below the value's float precision leaves it unchanged and
        // would never reach the target
        let stalled = candidate == previous;
        let reached = stalled
            || if direction {
                candidate >= target
            } else {
                candidate <= target
            };
        if reached {
            candidate = target;
        }

        if let Some(hook) = self.on_progress.as_mut() {
            hook(previous, candidate).map_err(|e| CallbackError::new(Hook::Progress, e))?;
        }
        let display = self.format(candidate)?;

        self.run.direction = Some(direction);
        self.run.current_value = candidate;
        self.display = display;
        tracing::trace!(value = candidate, active = !reached, "animation step");

        if reached {
            self.run.active = false;
            self.run.status = RunStatus::Finished;
            tracing::debug!(target, generation = self.run.generation, "animation run finished");
            if let Some(hook) = self.on_finish.as_mut() {
                hook().map_err(|e| CallbackError::new(Hook::Finish, e))?;
            }
        }

        Ok(self.frame())
    }

    /// Stop the current run where it is. Returns false if nothing was running.
    ///
    /// The value is left unclamped and `on_finish` is not called.
    pub fn cancel(&mut self) -> bool {
        if !self.run.active {
            return false;
        }
        self.run.active = false;
        self.run.status = RunStatus::Cancelled;
        self.run.generation += 1;
        tracing::debug!(value = self.run.current_value, "animation run cancelled");
        true
    }

    /// Snapshot of the committed state
    pub fn frame(&self) -> Frame<T> {
        Frame {
            value: self.run.current_value,
            display: self.display.clone(),
            active: self.run.active,
        }
    }

    fn format(&self, value: f64) -> Result<T> {
        (self.formatter)(value)
            .map_err(|e| AnimationError::Callback(CallbackError::new(Hook::Formatter, e)))
    }
}

impl<T: fmt::Debug> fmt::Debug for AnimationEngine<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationEngine")
            .field("config", &self.config)
            .field("timing", &self.timing)
            .field("run", &self.run)
            .field("display", &self.display)
            .finish_non_exhaustive()
    }
}

/// Builder for [`AnimationEngine`]
pub struct AnimationEngineBuilder<T> {
    config: AnimationConfig,
    timing: Option<TimingFunction>,
    initial: std::result::Result<f64, crate::error::ValueError>,
    formatter: Formatter<T>,
    on_progress: Option<ProgressHook>,
    on_finish: Option<FinishHook>,
}

impl AnimationEngineBuilder<f64> {
    pub fn new() -> Self {
        Self {
            config: AnimationConfig::default(),
            timing: None,
            initial: Ok(0.0),
            formatter: Box::new(|value| Ok(value)),
            on_progress: None,
            on_finish: None,
        }
    }
}

impl Default for AnimationEngineBuilder<f64> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> AnimationEngineBuilder<T> {
    /// Replace the whole configuration
    pub fn config(mut self, config: AnimationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn interval(mut self, interval: f64) -> Self {
        self.config.interval = interval;
        self
    }

    pub fn steps(mut self, steps: u32) -> Self {
        self.config.steps = steps;
        self
    }

    pub fn count_by(mut self, count_by: f64) -> Self {
        self.config.count_by = Some(count_by);
        self
    }

    pub fn start_delay(mut self, delay: f64) -> Self {
        self.config.start_delay = delay;
        self
    }

    /// Select a built-in timing function by key; resolved in `build`
    pub fn timing_key(mut self, key: impl Into<String>) -> Self {
        self.config.timing = key.into();
        self.timing = None;
        self
    }

    /// Use a timing function directly, bypassing the keyed table
    pub fn timing(mut self, timing: TimingFunction) -> Self {
        self.timing = Some(timing);
        self
    }

    pub fn custom_timing<F>(self, f: F) -> Self
    where
        F: Fn(f64, f64) -> f64 + Send + Sync + 'static,
    {
        self.timing(TimingFunction::custom(f))
    }

    /// Value shown before the first run
    pub fn initial(mut self, value: impl IntoValue) -> Self {
        self.initial = value.into_value();
        self
    }

    pub fn formatter<U, F>(self, f: F) -> AnimationEngineBuilder<U>
    where
        U: 'static,
        F: Fn(f64) -> U + Send + 'static,
    {
        self.with_formatter(Box::new(move |value| Ok(f(value))))
    }

    pub fn try_formatter<U, E, F>(self, f: F) -> AnimationEngineBuilder<U>
    where
        U: 'static,
        F: Fn(f64) -> std::result::Result<U, E> + Send + 'static,
        E: Into<BoxError> + 'static,
    {
        self.with_formatter(Box::new(move |value| {
            f(value).map_err(Into::<BoxError>::into)
        }))
    }

    pub fn on_progress<F>(self, mut f: F) -> Self
    where
        F: FnMut(f64, f64) + Send + 'static,
    {
        self.try_on_progress(move |old, new| {
            f(old, new);
            Ok::<(), BoxError>(())
        })
    }

    pub fn try_on_progress<E, F>(mut self, mut f: F) -> Self
    where
        F: FnMut(f64, f64) -> std::result::Result<(), E> + Send + 'static,
        E: Into<BoxError> + 'static,
    {
        self.on_progress = Some(Box::new(move |old, new| {
            f(old, new).map_err(Into::<BoxError>::into)
        }));
        self
    }

    pub fn on_finish<F>(self, mut f: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        self.try_on_finish(move || {
            f();
            Ok::<(), BoxError>(())
        })
    }

    pub fn try_on_finish<E, F>(mut self, mut f: F) -> Self
    where
        F: FnMut() -> std::result::Result<(), E> + Send + 'static,
        E: Into<BoxError> + 'static,
    {
        self.on_finish = Some(Box::new(move || f().map_err(Into::<BoxError>::into)));
        self
    }

    fn with_formatter<U: 'static>(self, formatter: Formatter<U>) -> AnimationEngineBuilder<U> {
        AnimationEngineBuilder {
            config: self.config,
            timing: self.timing,
            initial: self.initial,
            formatter,
            on_progress: self.on_progress,
            on_finish: self.on_finish,
        }
    }

    /// Validate the configuration and build the engine
    pub fn build(self) -> Result<AnimationEngine<T>> {
        self.config.validate_numbers()?;
        let timing = match self.timing {
            Some(timing) => timing,
            None => self.config.timing_function()?,
        };
        let initial = self.initial?;
        let display = (self.formatter)(initial)
            .map_err(|e| CallbackError::new(Hook::Formatter, e))?;

        Ok(AnimationEngine {
            config: self.config,
            timing,
            run: AnimationRun::idle(initial),
            display,
            formatter: self.formatter,
            on_progress: self.on_progress,
            on_finish: self.on_finish,
        })
    }
}
