//! Logging bootstrap for host applications.

use crate::{CoreError, Result};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable output for development.
    #[default]
    Pretty,
    /// Newline-delimited JSON for log shippers.
    Json,
}

/// Initialize global tracing output.
///
/// The filter honors `RUST_LOG` when set and otherwise defaults to
/// `info` for the index crates with sqlx quieted to warnings. Calling
/// this twice returns an error from the underlying registry.
pub fn init_logging(format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,core_index=info,core_sync=info,core_service=info,sqlx=warn")
    });

    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().flatten_event(true))
            .try_init(),
    }
    .map_err(|e| CoreError::InitializationFailed(format!("Failed to initialize logging: {e}")))
}
