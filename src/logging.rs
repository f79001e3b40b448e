use error_stack::{Report, Result};
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::config::{Logging, LoggingStyle};

#[derive(Debug, Error)]
#[error("Failed to initialize logging")]
pub struct LoggingInitError;

/// Installs the global tracing subscriber. Logs are written to stderr
/// so rendered reports on stdout stay clean.
pub fn init(config: &Logging) -> Result<(), LoggingInitError> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(make_env_filter(&config.targets))
        .with_writer(std::io::stderr);

    let result = match config.style {
        LoggingStyle::Compact => builder.compact().try_init(),
        LoggingStyle::Full => builder.try_init(),
        LoggingStyle::Pretty => builder.pretty().try_init(),
        LoggingStyle::Json => builder.json().try_init(),
    };

    result.map_err(|e| {
        Report::new(LoggingInitError)
            .attach_printable(e.to_string())
            .attach_printable("already initialized tracing")
    })
}

fn make_env_filter(targets: &str) -> EnvFilter {
    let targets = if targets.is_empty() {
        std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default()
    } else {
        targets.to_string()
    };

    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(targets)
}
