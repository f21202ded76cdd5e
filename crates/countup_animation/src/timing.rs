//! Timing functions: the delay to wait before each step

use std::f64::consts::FRAC_PI_2;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::ConfigError;

/// User supplied timing: `(interval, progress) -> delay`
pub type CustomTiming = Arc<dyn Fn(f64, f64) -> f64 + Send + Sync>;

/// Built-in timing functions by key
///
/// Keys match the names accepted in config files and on the command line.
pub const TIMING_TABLE: [(&str, TimingFunction); 3] = [
    ("linear", TimingFunction::Linear),
    ("easeOut", TimingFunction::EaseOut),
    ("easeIn", TimingFunction::EaseIn),
];

/// Computes the delay before the next step from the base interval and the
/// progress of the current run (0.0 to 1.0)
#[derive(Clone, Default)]
pub enum TimingFunction {
    /// Constant cadence
    #[default]
    Linear,
    /// Delay grows with progress, so the count slows down near the end
    EaseOut,
    /// Delay shrinks with progress, so the count speeds up near the end
    EaseIn,
    Custom(CustomTiming),
}

impl TimingFunction {
    /// Wrap a closure as a custom timing function
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(f64, f64) -> f64 + Send + Sync + 'static,
    {
        TimingFunction::Custom(Arc::new(f))
    }

    /// Look up a built-in timing function by key
    pub fn from_key(key: &str) -> Result<Self, ConfigError> {
        TIMING_TABLE
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, timing)| timing.clone())
            .ok_or_else(|| ConfigError::UnknownTiming(key.to_string()))
    }

    /// Key of a built-in timing function, `None` for custom ones
    pub fn key(&self) -> Option<&'static str> {
        match self {
            TimingFunction::Linear => Some("linear"),
            TimingFunction::EaseOut => Some("easeOut"),
            TimingFunction::EaseIn => Some("easeIn"),
            TimingFunction::Custom(_) => None,
        }
    }

    /// Raw delay for `progress`. Custom functions may return anything; see
    /// [`TimingFunction::delay`] for the sanitized value.
    pub fn apply(&self, interval: f64, progress: f64) -> f64 {
        match self {
            TimingFunction::Linear => interval,
            TimingFunction::EaseOut => interval * (FRAC_PI_2 * progress).sin() * 5.0,
            TimingFunction::EaseIn => interval * (FRAC_PI_2 - FRAC_PI_2 * progress).sin() * 5.0,
            TimingFunction::Custom(f) => f(interval, progress),
        }
    }

    /// Delay for `progress`, with progress clamped into `[0, 1]` and the
    /// result clamped to a finite non-negative number
    pub fn delay(&self, interval: f64, progress: f64) -> f64 {
        let progress = if progress.is_finite() {
            progress.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let delay = self.apply(interval, progress);
        if delay.is_finite() && delay >= 0.0 {
            delay
        } else {
            tracing::warn!(delay, progress, "timing function returned an unusable delay, using 0");
            0.0
        }
    }
}

impl fmt::Debug for TimingFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.key() {
            Some(key) => f.write_str(key),
            None => f.write_str("Custom(..)"),
        }
    }
}

impl FromStr for TimingFunction {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s)
    }
}
