//! HTTP API for serve mode.

mod export;
mod sessions;
mod sse;
mod stats;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::snapshot::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/sessions", get(sessions::list_sessions))
        .route("/api/sessions/live", get(sse::snapshot_events))
        .route("/api/sessions/export", get(export::export_csv))
        .route("/api/sessions/{id}", get(sessions::get_session))
        .route("/api/stats", get(stats::get_stats))
        .route("/api/snapshot", get(stats::get_snapshot))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
