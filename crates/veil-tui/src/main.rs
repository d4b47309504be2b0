//! Veil terminal UI entry point.
//!
//! # Usage
//!
//! ```bash
//! # Random session
//! veil-tui
//!
//! # Reproducible presence simulation, frequent drops, verbose log
//! veil-tui --seed 7 --offline-chance 0.5 --log-level debug
//! ```

use std::{fs::File, path::PathBuf, sync::Mutex};

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use veil_app::{Runtime, SessionConfig};
use veil_tui::{SystemEnv, TerminalDriver};

/// Anonymous chat prototype in the terminal
#[derive(Parser, Debug)]
#[command(name = "veil-tui")]
#[command(about = "Terminal prototype of an anonymous chat client")]
#[command(version)]
struct Args {
    /// Seed for the presence simulation (typing and connection drops)
    ///
    /// If not provided, the seed is drawn from the OS RNG.
    #[arg(long)]
    seed: Option<u64>,

    /// Chance in [0, 1] that a connectivity check drops the connection
    #[arg(long, default_value = "0.05")]
    offline_chance: f64,

    /// File to write logs to (the terminal belongs to the UI)
    #[arg(long, default_value = "veil-tui.log")]
    log_file: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = SessionConfig::default();
    config.presence.offline_probability = args.offline_chance;
    config.validate()?;

    let log_file = File::create(&args.log_file)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(Mutex::new(log_file)).with_ansi(false))
        .with(filter)
        .init();

    tracing::info!("Veil TUI starting");

    let driver = TerminalDriver::new()?;
    let runtime = Runtime::new(driver, SystemEnv::new(), config, args.seed)?;
    runtime.run().await?;

    tracing::info!("Veil TUI exited");
    Ok(())
}
