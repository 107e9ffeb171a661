//! Tracing subscriber setup.

use std::env;
use std::io;

use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Invalid log filter '{directive}': {reason}")]
    InvalidFilter { directive: String, reason: String },

    #[error("A global tracing subscriber is already installed")]
    AlreadyInitialized,
}

/// Builds the filter: `RUST_LOG` if set, otherwise the configured level.
/// HTTP client internals are capped at `warn` either way.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, TelemetryError> {
    let directive = env::var("RUST_LOG").unwrap_or_else(|_| config.level.clone());
    let filter = EnvFilter::try_new(&directive).map_err(|e| TelemetryError::InvalidFilter {
        directive: directive.clone(),
        reason: e.to_string(),
    })?;

    Ok(filter
        .add_directive(
            "hyper=warn"
                .parse()
                .unwrap_or_else(|_| tracing::Level::WARN.into()),
        )
        .add_directive(
            "reqwest=warn"
                .parse()
                .unwrap_or_else(|_| tracing::Level::WARN.into()),
        ))
}

/// Installs the global subscriber in the configured format.
///
/// # Errors
///
/// - `InvalidFilter` if neither `RUST_LOG` nor the configured level parses
/// - `AlreadyInitialized` if called twice in one process
pub fn init_tracing(config: &LoggingConfig) -> Result<(), TelemetryError> {
    let registry = tracing_subscriber::registry().with(build_filter(config)?);

    let result = match config.format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .with_writer(io::stdout),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().pretty().with_target(true).with_writer(io::stdout))
            .try_init(),
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_target(false).with_writer(io::stdout))
            .try_init(),
    };
    result.map_err(|_| TelemetryError::AlreadyInitialized)?;

    tracing::info!(
        log.level = %config.level,
        log.format = ?config.format,
        version = env!("CARGO_PKG_VERSION"),
        "Periodization engine tracing initialized"
    );
    Ok(())
}
