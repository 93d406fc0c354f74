//! In-memory snapshot of the segmented log file for serve mode.
//!
//! The pipeline itself is pure; this layer owns the caching. A snapshot
//! is built once at startup and swapped wholesale when the file changes,
//! so request handlers only ever read an immutable segmentation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use tokio::sync::{broadcast, RwLock};

use journey_sessions::{fingerprint, parse_events, segment, UserSession};

/// One segmentation of the log file.
pub struct Snapshot {
    pub sessions: Vec<UserSession>,
    pub fingerprint: String,
    pub event_count: usize,
    pub loaded_at: DateTime<Utc>,
}

/// Pushed to SSE subscribers when the snapshot changes.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SnapshotEvent {
    SnapshotReloaded { sessions: usize, fingerprint: String },
    SourceRemoved { path: PathBuf },
}

#[derive(Clone)]
pub struct AppState {
    pub snapshot: Arc<RwLock<Snapshot>>,
    pub events: broadcast::Sender<SnapshotEvent>,
    pub source: PathBuf,
    pub timeout: TimeDelta,
}

impl AppState {
    /// Read the source file and build the initial snapshot.
    pub async fn load(source: PathBuf, timeout: TimeDelta) -> Result<Self> {
        let bytes = read_source(&source).await?;
        let snapshot = build_snapshot(&bytes, timeout)?;
        let (events, _) = broadcast::channel(256);

        Ok(Self {
            snapshot: Arc::new(RwLock::new(snapshot)),
            events,
            source,
            timeout,
        })
    }

    /// Re-read the source file and swap the snapshot.
    ///
    /// Skips re-segmentation when the file bytes are unchanged, which
    /// covers editors that write the file without modifying it and
    /// watchers that fire several events for one save.
    pub async fn reload(&self) -> Result<()> {
        let bytes = read_source(&self.source).await?;
        let digest = fingerprint(&bytes);

        if self.snapshot.read().await.fingerprint == digest {
            tracing::debug!("snapshot unchanged, skipping reload");
            return Ok(());
        }

        let next = build_snapshot(&bytes, self.timeout)?;
        let session_count = next.sessions.len();
        let event_count = next.event_count;

        *self.snapshot.write().await = next;

        tracing::info!(
            "snapshot reloaded: {} events, {} sessions",
            event_count,
            session_count
        );
        let _ = self.events.send(SnapshotEvent::SnapshotReloaded {
            sessions: session_count,
            fingerprint: digest,
        });

        Ok(())
    }

    /// Tell subscribers the source file disappeared. The last good
    /// snapshot stays live until the file comes back.
    pub fn notify_removed(&self, path: PathBuf) {
        let _ = self.events.send(SnapshotEvent::SourceRemoved { path });
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SnapshotEvent> {
        self.events.subscribe()
    }
}

async fn read_source(source: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(source)
        .await
        .with_context(|| format!("Failed to read {}", source.display()))
}

fn build_snapshot(bytes: &[u8], timeout: TimeDelta) -> Result<Snapshot> {
    let digest = fingerprint(bytes);
    let text = std::str::from_utf8(bytes).context("Log file is not valid UTF-8")?;

    let events = parse_events(text)?;
    let event_count = events.len();
    let sessions = segment(events, timeout);

    Ok(Snapshot {
        sessions,
        fingerprint: digest,
        event_count,
        loaded_at: Utc::now(),
    })
}
