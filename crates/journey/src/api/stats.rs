//! Aggregate statistics and snapshot metadata endpoints.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use journey_sessions::{apply, summarize, AnalyticsSummary};

use crate::snapshot::AppState;

use super::sessions::{build_filter, ListParams};

pub async fn get_stats(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<AnalyticsSummary>, (StatusCode, String)> {
    let filter = build_filter(params)?;
    let snapshot = state.snapshot.read().await;

    let filtered = apply(&snapshot.sessions, &filter);
    Ok(Json(summarize(&filtered)))
}

#[derive(Debug, Serialize)]
pub struct SnapshotInfo {
    pub source: String,
    pub fingerprint: String,
    pub events: usize,
    pub sessions: usize,
    pub loaded_at: DateTime<Utc>,
}

pub async fn get_snapshot(State(state): State<AppState>) -> Json<SnapshotInfo> {
    let snapshot = state.snapshot.read().await;

    Json(SnapshotInfo {
        source: state.source.display().to_string(),
        fingerprint: snapshot.fingerprint.clone(),
        events: snapshot.event_count,
        sessions: snapshot.sessions.len(),
        loaded_at: snapshot.loaded_at,
    })
}
