//! journey: reconstruct user sessions from structured event logs.

mod api;
mod config;
mod init;
mod logging;
mod serve;
mod sessions;
mod snapshot;

use anyhow::Result;
use clap::{Parser, ValueEnum};

use crate::logging::LogFormat;
use crate::sessions::Command;

#[derive(Parser, Debug)]
#[command(
    name = "journey",
    about = "Reconstruct user sessions from structured event logs",
    version
)]
struct Cli {
    /// Diagnostic log format
    #[arg(long, value_enum, default_value = "pretty", global = true)]
    log_format: LogFormatChoice,

    /// Diagnostic log level when RUST_LOG is unset
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatChoice {
    Pretty,
    Json,
    Compact,
}

impl From<LogFormatChoice> for LogFormat {
    fn from(choice: LogFormatChoice) -> Self {
        match choice {
            LogFormatChoice::Pretty => LogFormat::Pretty,
            LogFormatChoice::Json => LogFormat::Json,
            LogFormatChoice::Compact => LogFormat::Compact,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_tracing(&cli.log_level, cli.log_format.into());

    sessions::handle_command(cli.command).await
}
