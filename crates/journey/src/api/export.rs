//! CSV download endpoint.

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;

use journey_sessions::{apply, to_csv};

use crate::snapshot::AppState;

use super::sessions::{build_filter, ListParams};

pub async fn export_csv(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let filter = build_filter(params)?;
    let snapshot = state.snapshot.read().await;

    let filtered = apply(&snapshot.sessions, &filter);
    let csv = to_csv(&filtered);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"user-sessions.csv\"",
            ),
        ],
        csv,
    ))
}
