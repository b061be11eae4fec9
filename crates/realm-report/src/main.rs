//! `realm-report`: print realm statistics for a directory of settlements.
//!
//! # Startup Sequence
//!
//! 1. Parse command-line arguments
//! 2. Load configuration (optional YAML file plus `REALM_LOG_LEVEL`)
//! 3. Initialize structured logging on stderr
//! 4. Load, aggregate and print to stdout
//!
//! An audit that finds anomalies ends the process with a non-zero status.

use std::path::PathBuf;

use clap::Parser;
use realm_report::{LoggingConfig, ReportConfig, ReportError, ReportOptions, run};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "realm-report", version)]
#[command(about = "Aggregate settlement records into realm income, troop and population figures")]
struct Args {
    /// Directory containing settlement `*.json` files
    #[arg(long)]
    data: PathBuf,

    /// YAML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Only report on this settlement
    #[arg(long)]
    settlement: Option<String>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,

    /// Check that every computed figure adds up, exit non-zero if not
    #[arg(long)]
    audit: bool,
}

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, loading, output or the audit fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = ReportConfig::load(args.config.as_deref())?;
    init_logging(&config.logging)?;
    info!(data = %args.data.display(), "realm-report starting");

    let options = ReportOptions {
        data_dir: args.data,
        settlement: args.settlement,
        json: args.json,
        audit: args.audit,
    };
    let stdout = std::io::stdout();
    run(&options, config.stats, &mut stdout.lock())?;
    Ok(())
}

/// Install the tracing subscriber. `RUST_LOG` wins over the configured level.
fn init_logging(config: &LoggingConfig) -> Result<(), ReportError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| ReportError::Logging {
        message: e.to_string(),
    })
}
