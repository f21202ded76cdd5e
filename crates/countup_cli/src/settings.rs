//! Animation settings from a config file layered under command line flags

use anyhow::{Context, Result};
use countup_animation::AnimationConfig;

use crate::Args;

/// Build the animation config: file (or defaults), then flags on top
pub fn resolve(args: &Args) -> Result<AnimationConfig> {
    let mut config = match &args.config {
        Some(path) => AnimationConfig::load(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => AnimationConfig::default(),
    };

    if let Some(steps) = args.steps {
        config.steps = steps;
    }
    if let Some(count_by) = args.count_by {
        config.count_by = Some(count_by);
    }
    if let Some(interval) = args.interval {
        config.interval = interval;
    }
    if let Some(timing) = &args.timing {
        config.timing = timing.clone();
    }
    if let Some(start_delay) = args.start_delay {
        config.start_delay = start_delay;
    }

    config.validate().context("Invalid animation settings")?;
    Ok(config)
}
