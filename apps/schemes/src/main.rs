//! # Schemes
//!
//! Command-line front end for the scheme engine.
//!
//! ## Usage
//!
//! ```bash
//! schemes check literature.xml
//! schemes tree literature.xml
//! schemes find literature.xml --contains novel --ignore-case
//! schemes sort literature.xml -o sorted.xml
//! schemes dot literature.xml -o literature.dot
//! schemes --json-mode copy literature.xml -o copy.xml
//! ```
//!
//! Results go to stdout; logs go to stderr.

use clap::Parser;
use schemes::cli::{self, Cli, Settings};
use schemes::config::{AppConfig, LogFormat, VERBOSE_LOG_FILTER};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    let cli = Cli::parse();

    // A broken configuration is reported once logging is up.
    let (config, config_error) = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    init_tracing(&config, cli.verbose);

    if let Some(e) = config_error {
        tracing::error!("Error: {}", e);
        std::process::exit(2);
    }

    let settings = Settings::merge(&config, cli.json_mode);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if let Err(e) = cli::execute(cli.command, settings, &mut out) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Install the subscriber: `RUST_LOG` wins over `--verbose`, which wins
/// over the configured filter.
fn init_tracing(config: &AppConfig, verbose: bool) {
    let fallback = if verbose {
        VERBOSE_LOG_FILTER.to_string()
    } else {
        config.logging.filter.clone()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into());

    match config.logging.format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
