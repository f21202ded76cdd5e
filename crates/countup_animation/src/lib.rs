//! Countup Animation
//!
//! Animates a displayed number from a start value to a target in discrete
//! steps, restarting from wherever it is whenever the target changes.
//!
//! # Features
//!
//! - **Stepping engine**: fixed step count or fixed step size, exact landing on
//!   the target
//! - **Timing functions**: linear, ease-out, ease-in, or a custom closure
//!   decides the delay between steps
//! - **Cancelable timers**: a retargeted or cancelled run can never be stepped
//!   by a stale timer
//! - **Scheduler**: tick many counters from one frame loop
//!
//! # Example
//!
//! ```rust
//! use countup_animation::{AnimatedNumber, AnimationEngine};
//!
//! let engine = AnimationEngine::builder()
//!     .steps(45)
//!     .formatter(|v| format!("{v:.0}"))
//!     .build()
//!     .unwrap();
//!
//! let mut counter = AnimatedNumber::new(engine, 90).unwrap();
//! counter.mount().unwrap();
//!
//! // 45 steps, 14ms apart
//! counter.advance(45.0 * 14.0).unwrap();
//! assert_eq!(counter.display(), "90");
//! ```

pub mod animated;
pub mod config;
pub mod engine;
pub mod error;
pub mod scheduler;
pub mod timer;
pub mod timing;
pub mod value;

pub use animated::{AnimatedNumber, Frames};
pub use config::AnimationConfig;
pub use engine::{AnimationEngine, AnimationEngineBuilder, AnimationRun, Frame, RunStatus};
pub use error::{AnimationError, CallbackError, ConfigError, Hook, Result, ValueError};
pub use scheduler::{AnimationScheduler, CounterId, Tick};
pub use timer::{TimerId, TimerQueue};
pub use timing::{TimingFunction, TIMING_TABLE};
pub use value::IntoValue;
