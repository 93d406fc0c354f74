//! `journey serve`: HTTP API over a live-reloading snapshot.

use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;
use tokio::sync::broadcast::error::RecvError;

use journey_sessions::{DatasetEvent, DatasetWatcher};

use crate::api;
use crate::config::JourneyConfig;
use crate::snapshot::AppState;

pub async fn handle_serve_command(
    file: Option<PathBuf>,
    timeout_secs: Option<i64>,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    let working_dir = std::env::current_dir().context("Failed to get working directory")?;
    let config = JourneyConfig::load(&working_dir)?.unwrap_or_default();

    let source = config.data_file(file)?;
    let timeout = config.segment_timeout(timeout_secs);
    let host = config.serve_host(host);
    let port = config.serve_port(port);

    let state = AppState::load(source.clone(), timeout).await?;
    {
        let snapshot = state.snapshot.read().await;
        tracing::info!(
            "loaded {} events into {} sessions from {}",
            snapshot.event_count,
            snapshot.sessions.len(),
            source.display()
        );
    }

    // The watcher must outlive the server; dropping it stops notifications.
    let watcher = DatasetWatcher::new(&source).context("Failed to watch log file")?;
    spawn_reload_task(state.clone(), &watcher);

    let router = api::create_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind API server to {}", addr))?;

    eprintln!();
    eprintln!(
        "  {} {}",
        "->".bright_green(),
        format!("API on http://{}", addr).bold()
    );
    eprintln!(
        "  {} Watching {} for changes",
        "->".dimmed(),
        source.display()
    );
    eprintln!("  {} Press {} to stop", "->".dimmed(), "Ctrl+C".bold());
    eprintln!();

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server error")
}

/// Rebuild the snapshot whenever the watcher reports a change.
fn spawn_reload_task(state: AppState, watcher: &DatasetWatcher) {
    let mut rx = watcher.subscribe();

    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(DatasetEvent::Changed { .. }) => {
                    if let Err(e) = state.reload().await {
                        tracing::warn!("reload failed: {:#}", e);
                    }
                }
                Ok(DatasetEvent::Removed { path }) => {
                    tracing::warn!("log file removed: {}", path.display());
                    state.notify_removed(path);
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!("reload task lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for Ctrl+C: {}", e);
        return;
    }
    eprintln!();
    eprintln!("{}", "Shutting down...".dimmed());
}
