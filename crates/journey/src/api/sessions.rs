//! Session listing and lookup endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use journey_sessions::{SessionFilter, SessionSummary, Status, UserSession};

use crate::snapshot::AppState;

/// Query parameters shared by the listing, stats, and export endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub status: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub min_minutes: Option<f64>,
    pub max_minutes: Option<f64>,
}

/// Translate query parameters into a filter, rejecting unknown statuses.
pub fn build_filter(params: ListParams) -> Result<SessionFilter, (StatusCode, String)> {
    let status = match params.status.as_deref() {
        None | Some("") | Some("all") => None,
        Some(other) => Some(
            other
                .parse::<Status>()
                .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?,
        ),
    };

    Ok(SessionFilter {
        search: params.search,
        status,
        from: params.from,
        to: params.to,
        min_minutes: params.min_minutes,
        max_minutes: params.max_minutes,
    })
}

pub async fn list_sessions(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<SessionSummary>>, (StatusCode, String)> {
    let filter = build_filter(params)?;
    let snapshot = state.snapshot.read().await;

    let summaries: Vec<SessionSummary> = snapshot
        .sessions
        .iter()
        .filter(|session| filter.matches(session))
        .map(SessionSummary::from)
        .collect();

    Ok(Json(summaries))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserSession>, (StatusCode, String)> {
    let snapshot = state.snapshot.read().await;

    let session = snapshot
        .sessions
        .iter()
        .find(|session| session.id == id)
        .cloned()
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("No session with id {}", id)))?;

    Ok(Json(session))
}
