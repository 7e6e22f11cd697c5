//! Logging bootstrap shared by the RNX binaries
//!
//! `RUST_LOG` takes precedence. Otherwise the configured level applies to the
//! RNX crates and third-party crates stay at `warn`.

use crate::config::LoggingConfig;
use crate::{Error, Result};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const RNX_CRATES: [&str; 3] = ["rnx_common", "rnx_la", "rnx_sa"];

/// Build the default filter directive for a level, e.g. `warn,rnx_la=debug,...`
pub fn default_filter(level: &str) -> String {
    let mut directive = String::from("warn");
    for krate in RNX_CRATES {
        directive.push_str(&format!(",{}={}", krate, level));
    }
    directive
}

/// Initialize global tracing subscriber
///
/// Logs go to stderr; if `config.file` is set they are also appended to that
/// file (without ANSI colors).
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter(&config.level)))
        .map_err(|e| Error::Config(format!("Invalid log level '{}': {}", config.level, e)))?;

    let file_layer = match &config.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| {
                    Error::Config(format!("Cannot open log file {}: {}", path.display(), e))
                })?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::Internal(format!("Failed to install tracing subscriber: {}", e)))
}
