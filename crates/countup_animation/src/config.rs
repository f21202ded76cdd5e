//! Animation configuration
//!
//! Mirrors the options of an animated number:
//!
//! ```toml
//! interval = 14      # base delay unit between steps
//! steps = 45         # number of steps when count_by is unset
//! count_by = 3       # optional fixed step magnitude
//! timing = "easeOut" # linear | easeOut | easeIn
//! start_delay = 0    # delay before the first step after mounting
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::timing::TimingFunction;

/// Engine-wide configuration shared by every run
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct AnimationConfig {
    /// Base delay unit handed to the timing function
    #[serde(default = "default_interval")]
    pub interval: f64,
    /// Number of steps a run is divided into
    #[serde(default = "default_steps")]
    pub steps: u32,
    /// Fixed magnitude per step; overrides `steps` when set
    #[serde(default, alias = "countBy")]
    pub count_by: Option<f64>,
    /// Key into the built-in timing table
    #[serde(default = "default_timing")]
    pub timing: String,
    /// Delay before the first step of the first run
    #[serde(default, alias = "startDelay", alias = "start_at")]
    pub start_delay: f64,
}

fn default_interval() -> f64 {
    14.0
}

fn default_steps() -> u32 {
    45
}

fn default_timing() -> String {
    "linear".to_string()
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            interval: default_interval(),
            steps: default_steps(),
            count_by: None,
            timing: default_timing(),
            start_delay: 0.0,
        }
    }
}

impl AnimationConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AnimationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Serialize to a TOML string
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Builder: set the base interval
    pub fn with_interval(mut self, interval: f64) -> Self {
        self.interval = interval;
        self
    }

    /// Builder: set the step count
    pub fn with_steps(mut self, steps: u32) -> Self {
        self.steps = steps;
        self
    }

    /// Builder: set a fixed step magnitude
    pub fn with_count_by(mut self, count_by: f64) -> Self {
        self.count_by = Some(count_by);
        self
    }

    /// Builder: set the timing key
    pub fn with_timing(mut self, key: impl Into<String>) -> Self {
        self.timing = key.into();
        self
    }

    /// Builder: set the delay before the first step
    pub fn with_start_delay(mut self, delay: f64) -> Self {
        self.start_delay = delay;
        self
    }

    /// Resolve the timing key against the built-in table
    pub fn timing_function(&self) -> Result<TimingFunction, ConfigError> {
        TimingFunction::from_key(&self.timing)
    }

    /// Check every field, including the timing key
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_numbers()?;
        self.timing_function()?;
        Ok(())
    }

    /// Check the numeric fields only (used when a custom timing function
    /// replaces the keyed one)
    pub(crate) fn validate_numbers(&self) -> Result<(), ConfigError> {
        if self.steps == 0 {
            return Err(ConfigError::ZeroSteps);
        }
        if !self.interval.is_finite() {
            return Err(ConfigError::NonFiniteInterval(self.interval));
        }
        if self.interval < 0.0 {
            return Err(ConfigError::NegativeInterval(self.interval));
        }
        if let Some(count_by) = self.count_by {
            if !count_by.is_finite() || count_by == 0.0 {
                return Err(ConfigError::InvalidCountBy(count_by));
            }
        }
        if !self.start_delay.is_finite() || self.start_delay < 0.0 {
            return Err(ConfigError::InvalidStartDelay(self.start_delay));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnimationConfig::default();
        assert_eq!(config.interval, 14.0);
        assert_eq!(config.steps, 45);
        assert_eq!(config.count_by, None);
        assert_eq!(config.timing, "linear");
        assert_eq!(config.start_delay, 0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_toml() {
        let config = AnimationConfig::from_toml_str("steps = 10\ntiming = \"easeIn\"\n").unwrap();
        assert_eq!(config.steps, 10);
        assert_eq!(config.timing, "easeIn");
        assert_eq!(config.interval, 14.0);
    }

    #[test]
    fn test_parse_camel_case_aliases() {
        let config = AnimationConfig::from_toml_str("countBy = 3\nstartDelay = 100\n").unwrap();
        assert_eq!(config.count_by, Some(3.0));
        assert_eq!(config.start_delay, 100.0);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = AnimationConfig::default().with_count_by(2.5).with_timing("easeOut");
        let text = config.to_toml().unwrap();
        assert_eq!(AnimationConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_zero_steps_rejected() {
        let err = AnimationConfig::default().with_steps(0).validate().unwrap_err();
        assert!(matches!(err, ConfigError::ZeroSteps));
    }

    #[test]
    fn test_negative_steps_fail_to_parse() {
        let err = AnimationConfig::from_toml_str("steps = -1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_unknown_timing_rejected() {
        let err = AnimationConfig::from_toml_str("timing = \"spring\"").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownTiming(_)));
    }

    #[test]
    fn test_non_finite_numbers_rejected() {
        let config = AnimationConfig::default();
        assert!(matches!(
            config.clone().with_interval(f64::INFINITY).validate(),
            Err(ConfigError::NonFiniteInterval(_))
        ));
        assert!(matches!(
            config.clone().with_interval(-1.0).validate(),
            Err(ConfigError::NegativeInterval(_))
        ));
        assert!(matches!(
            config.clone().with_count_by(f64::NAN).validate(),
            Err(ConfigError::InvalidCountBy(_))
        ));
        assert!(matches!(
            config.clone().with_count_by(0.0).validate(),
            Err(ConfigError::InvalidCountBy(_))
        ));
        assert!(matches!(
            config.with_start_delay(-5.0).validate(),
            Err(ConfigError::InvalidStartDelay(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = AnimationConfig::load(Path::new("/nonexistent/countup.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
