//! Tracing setup for the journey binary.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Output format for diagnostic logs.
#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    /// Human-readable output for terminals
    Pretty,
    /// Structured JSON, one object per line
    Json,
    /// Single-line output without the pretty-printed extras
    Compact,
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `level` when set, so operators can
/// turn on per-module filters without touching CLI flags.
pub fn init_tracing(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_target(false))
                .init();
        }
        LogFormat::Compact => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().compact().with_target(false))
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_target(false))
                .init();
        }
    }
}
