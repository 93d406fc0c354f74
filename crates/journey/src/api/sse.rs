//! Server-sent events for snapshot changes.

use std::convert::Infallible;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};

use crate::snapshot::{AppState, SnapshotEvent};

/// Stream snapshot reloads to the client as named SSE events.
pub async fn snapshot_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.subscribe();

    let stream = BroadcastStream::new(rx).map(|result| {
        let event = match result {
            Ok(snapshot_event) => {
                let name = match &snapshot_event {
                    SnapshotEvent::SnapshotReloaded { .. } => "snapshot_reloaded",
                    SnapshotEvent::SourceRemoved { .. } => "source_removed",
                };
                Event::default()
                    .event(name)
                    .data(serde_json::to_string(&snapshot_event).unwrap_or_default())
            }
            // Slow clients that miss events just pick up from the next one.
            Err(_) => Event::default().comment("lagged"),
        };
        Ok(event)
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
