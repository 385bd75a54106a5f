use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;

// Liveness: no dependencies touched
pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

// Readiness: database reachable; reports free analysis slots
pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    let query = sqlx::query("SELECT 1").fetch_one(&state.db);
    let slots = state.scan_slots.available_permits();
    match tokio::time::timeout(std::time::Duration::from_secs(5), query).await {
        Ok(Ok(_)) => (StatusCode::OK, Json(json!({ "status": "ready", "availableScanSlots": slots }))).into_response(),
        Ok(Err(e)) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "not ready", "error": e.to_string() })),
        )
            .into_response(),
        Err(_) => (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "status": "not ready", "error": "timeout" })))
            .into_response(),
    }
}

// Metrics endpoint: returns JSON snapshot
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.metrics.get_snapshot();
    Json(snapshot)
}

// Prometheus-compatible text exposition format
pub async fn metrics_prometheus(State(state): State<AppState>) -> impl IntoResponse {
    let m = state.metrics.get_snapshot();
    let body = format!(
        "# HELP speicherlupe_analyses_started Total analyses started\n# TYPE speicherlupe_analyses_started counter\nspeicherlupe_analyses_started {}\n\
# HELP speicherlupe_analyses_completed Total analyses completed\n# TYPE speicherlupe_analyses_completed counter\nspeicherlupe_analyses_completed {}\n\
# HELP speicherlupe_analyses_partial Completed analyses that hit a bound\n# TYPE speicherlupe_analyses_partial counter\nspeicherlupe_analyses_partial {}\n\
# HELP speicherlupe_analyses_failed Total analyses failed\n# TYPE speicherlupe_analyses_failed counter\nspeicherlupe_analyses_failed {}\n\
# HELP speicherlupe_files_processed Files processed\n# TYPE speicherlupe_files_processed counter\nspeicherlupe_files_processed {}\n\
# HELP speicherlupe_dirs_processed Directories processed\n# TYPE speicherlupe_dirs_processed counter\nspeicherlupe_dirs_processed {}\n\
# HELP speicherlupe_bytes_scanned Bytes scanned\n# TYPE speicherlupe_bytes_scanned counter\nspeicherlupe_bytes_scanned {}\n\
# HELP speicherlupe_permission_denied Permission denied entries\n# TYPE speicherlupe_permission_denied counter\nspeicherlupe_permission_denied {}\n\
# HELP speicherlupe_uptime_seconds Uptime seconds\n# TYPE speicherlupe_uptime_seconds gauge\nspeicherlupe_uptime_seconds {}\n",
        m.analyses_started,
        m.analyses_completed,
        m.analyses_partial,
        m.analyses_failed,
        m.files_processed,
        m.dirs_processed,
        m.bytes_scanned,
        m.permission_denied,
        m.uptime_seconds,
    );
    ([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body)
}

// Version/Build info endpoint (JSON)
pub async fn version() -> impl IntoResponse {
    let body = json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "package": {
            "description": env!("CARGO_PKG_DESCRIPTION"),
            "authors": env!("CARGO_PKG_AUTHORS"),
            "license": env!("CARGO_PKG_LICENSE"),
        },
        "build": {
            "profile": if cfg!(debug_assertions) { "debug" } else { "release" },
            "os": std::env::consts::OS,
            "arch": std::env::consts::ARCH,
        }
    });
    (StatusCode::OK, Json(body))
}
