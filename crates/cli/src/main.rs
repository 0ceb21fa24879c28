//! linestamp - add timestamps to the beginning of each line of input,
//! or rewrite the timestamps a line already carries.

use anyhow::{anyhow, Result};
use clap::Parser;
use linestamp_engine::ClockSource;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod config;
mod pipeline;
mod stream;

use config::StampConfig;
use pipeline::{Mode, Pipeline};

/// Add timestamps to the beginning of each line of input.
#[derive(Parser, Debug)]
#[command(name = "linestamp")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Convert existing timestamps to relative times
    #[arg(short)]
    relative: bool,

    /// Report elapsed time since the previous line
    #[arg(short, conflicts_with = "since_start")]
    incremental: bool,

    /// Report elapsed time since program start
    #[arg(short)]
    since_start: bool,

    /// Use the monotonic clock for samples
    #[arg(short)]
    monotonic: bool,

    /// Only output lines that differ from the previous line
    #[arg(short)]
    unique: bool,

    /// strftime format template; extensions: %.S %.s %.T (subsecond), %N
    /// (nanoseconds), %s (unix timestamp)
    format: Option<String>,
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "linestamp=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let config = StampConfig::load().map_err(|e| anyhow!("config load failed: {e}"))?;
    config.validate().map_err(|e| anyhow!("invalid config: {e}"))?;

    let mode = if cli.relative {
        Mode::Relative
    } else if cli.incremental {
        Mode::Incremental
    } else if cli.since_start {
        Mode::SinceStart
    } else {
        Mode::Absolute
    };

    let clock = if cli.monotonic {
        ClockSource::Monotonic
    } else {
        ClockSource::WallClock
    };

    let mut pipeline = Pipeline::new(mode, cli.format, clock, cli.unique, &config)?;
    stream::run(&mut pipeline).await
}
