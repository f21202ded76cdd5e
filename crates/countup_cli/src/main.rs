//! Countup - animate a number in the terminal
//!
//! Counts from one value to another, printing each step as it happens.
//! Extra targets chain further runs, each starting where the last one ended.
//!
//! ```text
//! countup 90
//! countup --from 10 --count-by 3 --timing easeOut 100 50
//! countup --config countup.toml --instant 1e3
//! ```

mod player;
mod settings;

use anyhow::Result;
use clap::{ArgAction, Parser};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Animate a number from one value to another
#[derive(Parser, Debug)]
#[command(name = "countup")]
#[command(about = "Animate a number from one value to another")]
#[command(version)]
#[command(allow_negative_numbers = true)]
pub struct Args {
    /// Value to count to
    pub to: String,

    /// Further targets, each counted to from where the previous run ended
    pub then: Vec<String>,

    /// Value to start from
    #[arg(short, long, default_value = "0")]
    pub from: String,

    /// TOML file with animation settings (flags override it)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of steps per run
    #[arg(long)]
    pub steps: Option<u32>,

    /// Fixed amount to count by each step
    #[arg(long)]
    pub count_by: Option<f64>,

    /// Base delay between steps, in milliseconds
    #[arg(long)]
    pub interval: Option<f64>,

    /// Timing function: linear, easeOut or easeIn
    #[arg(short, long)]
    pub timing: Option<String>,

    /// Delay before the first step, in milliseconds
    #[arg(long)]
    pub start_delay: Option<f64>,

    /// Decimal places to print
    #[arg(short, long, default_value_t = 0)]
    pub precision: usize,

    /// Print every step immediately instead of waiting between steps
    #[arg(long)]
    pub instant: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = settings::resolve(&args)?;
    tracing::debug!(?config, "resolved animation settings");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    player::play(&args, config, &mut out)
}
