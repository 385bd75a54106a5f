//! HTTP route handlers for the Speicherlupe API.
//!
//! - `analysis`: run an analysis and persist it as a snapshot
//! - `snapshots`: read stored snapshots and build cleanup previews from them
//! - `health`: liveness, readiness, metrics and version

pub mod analysis;
pub mod health;
pub mod snapshots;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// All API routes bound to `state`. Transport layers are added by the caller.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health::healthz))
        .route("/readyz", get(health::readyz))
        .route("/metrics", get(health::metrics))
        .route("/metrics/prometheus", get(health::metrics_prometheus))
        .route("/version", get(health::version))
        .route("/analyze", post(analysis::analyze))
        .route("/snapshots/latest", get(snapshots::latest_snapshot))
        .route("/snapshots/{id}", get(snapshots::get_snapshot))
        .route("/cleanup/preview", post(snapshots::cleanup_preview))
        .with_state(state)
}
