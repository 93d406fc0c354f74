use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::Serialize;
use tokio::sync::broadcast;

/// Events emitted when the watched log file changes on disk.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DatasetEvent {
    Changed { path: PathBuf },
    Removed { path: PathBuf },
}

/// Watches a single log file for changes and emits DatasetEvents.
///
/// The watch is placed on the parent directory so saves that go through
/// a rename-replace (most editors) are still observed.
pub struct DatasetWatcher {
    tx: broadcast::Sender<DatasetEvent>,
    _watcher: RecommendedWatcher,
}

impl DatasetWatcher {
    /// Start watching the given log file. The file must exist.
    pub fn new(path: &Path) -> Result<Self> {
        let target = path
            .canonicalize()
            .with_context(|| format!("Cannot watch {}", path.display()))?;
        let dir = target
            .parent()
            .with_context(|| format!("{} has no parent directory", target.display()))?
            .to_path_buf();

        let (tx, _) = broadcast::channel(256);
        let tx_clone = tx.clone();
        let target_clone = target.clone();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            if let Ok(event) = res {
                Self::handle_event(&tx_clone, &target_clone, &event);
            }
        })?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        Ok(Self {
            tx,
            _watcher: watcher,
        })
    }

    /// Subscribe to dataset events.
    pub fn subscribe(&self) -> broadcast::Receiver<DatasetEvent> {
        self.tx.subscribe()
    }

    fn handle_event(tx: &broadcast::Sender<DatasetEvent>, target: &Path, event: &Event) {
        let concerns_target = event
            .paths
            .iter()
            .any(|p| p.file_name() == target.file_name());
        if !concerns_target {
            return;
        }

        let dataset_event = match event.kind {
            EventKind::Create(_) | EventKind::Modify(_) => Some(DatasetEvent::Changed {
                path: target.to_path_buf(),
            }),
            EventKind::Remove(_) => Some(DatasetEvent::Removed {
                path: target.to_path_buf(),
            }),
            _ => None,
        };

        if let Some(evt) = dataset_event {
            let _ = tx.send(evt);
        }
    }
}
