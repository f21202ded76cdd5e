//! Plays an animation to a writer, one line per step

use std::io::Write;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use countup_animation::{AnimatedNumber, AnimationConfig, AnimationEngine};

use crate::Args;

/// Run every requested animation, writing each displayed value
pub fn play(args: &Args, config: AnimationConfig, out: &mut impl Write) -> Result<()> {
    let precision = args.precision;
    let engine = AnimationEngine::builder()
        .config(config)
        .initial(args.from.as_str())
        .formatter(move |v| format!("{v:.precision$}"))
        .on_finish(|| tracing::info!("count finished"))
        .build()
        .context("Invalid start value")?;

    let mut counter =
        AnimatedNumber::new(engine, args.to.as_str()).context("Invalid target value")?;
    writeln!(out, "{}", counter.display())?;

    counter.mount()?;
    drain(&mut counter, args.instant, out)?;

    for target in &args.then {
        counter
            .set_target(target.as_str())
            .with_context(|| format!("Invalid target value `{target}`"))?;
        drain(&mut counter, args.instant, out)?;
    }

    Ok(())
}

/// Step the counter until its run ends, sleeping between steps unless
/// `instant` is set
fn drain(counter: &mut AnimatedNumber<String>, instant: bool, out: &mut impl Write) -> Result<()> {
    while let Some(delay) = counter.next_delay() {
        if !instant {
            thread::sleep(Duration::from_secs_f64(delay / 1000.0));
        }
        for frame in counter.advance(delay)? {
            writeln!(out, "{}", frame.display)?;
        }
        out.flush()?;
    }
    Ok(())
}
