//! Animation error types

use std::path::PathBuf;

use thiserror::Error;

/// Boxed error returned by fallible user callbacks
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Invalid engine configuration.
///
/// Always raised when a configuration is built or a run starts, never while a
/// run is in flight.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// `steps` must be at least 1
    #[error("steps must be a positive integer")]
    ZeroSteps,

    /// Timing key not present in the built-in table
    #[error("unknown timing function `{0}` (expected linear, easeOut or easeIn)")]
    UnknownTiming(String),

    #[error("interval must be finite, got {0}")]
    NonFiniteInterval(f64),

    #[error("interval must not be negative, got {0}")]
    NegativeInterval(f64),

    /// `count_by` must be finite and non-zero
    #[error("countBy must be a finite non-zero number, got {0}")]
    InvalidCountBy(f64),

    #[error("start delay must be finite and non-negative, got {0}")]
    InvalidStartDelay(f64),

    /// Malformed TOML configuration
    #[error("failed to parse animation config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A start or target value that is not a usable number
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueError {
    #[error("value `{0}` is not numeric")]
    NotNumeric(String),

    #[error("value must be finite, got {0}")]
    NonFinite(f64),
}

/// Which user callback failed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hook {
    Formatter,
    Progress,
    Finish,
}

impl std::fmt::Display for Hook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Hook::Formatter => "formatter",
            Hook::Progress => "onProgress",
            Hook::Finish => "onFinish",
        };
        f.write_str(name)
    }
}

/// A user callback failed; the step that invoked it was aborted
#[derive(Error, Debug)]
#[error("{hook} callback failed: {source}")]
pub struct CallbackError {
    pub hook: Hook,
    #[source]
    pub source: BoxError,
}

impl CallbackError {
    pub fn new(hook: Hook, source: impl Into<BoxError>) -> Self {
        Self {
            hook,
            source: source.into(),
        }
    }
}

/// Top-level animation error
#[derive(Error, Debug)]
pub enum AnimationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Value(#[from] ValueError),

    #[error(transparent)]
    Callback(#[from] CallbackError),
}

/// Result type for animation operations
pub type Result<T> = std::result::Result<T, AnimationError>;
