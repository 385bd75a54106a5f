use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, info, warn};

use crate::{
    analysis::{budget, FilesystemAnalyzer},
    db,
    error::{AppError, AppResult},
    state::AppState,
    types::{AnalyzeRequest, AnalyzeResponse},
};

/// Runs one analysis on the blocking pool and stores the result as a snapshot.
///
/// The engine honours its own deadline; the outer timeout only catches an
/// engine stuck inside a single filesystem call. Queueing for a slot is
/// bounded by the same duration.
pub async fn analyze(State(state): State<AppState>, Json(req): Json<AnalyzeRequest>) -> AppResult<Response> {
    let defaults = state.config.analysis.clone();
    let engine_timeout =
        budget::clamp(req.timeout_seconds.unwrap_or(defaults.timeout_seconds), budget::TIMEOUT_SECONDS_RANGE) as u64;
    let wait = Duration::from_secs(engine_timeout + state.config.dispatch.timeout_grace_seconds);

    let permit = match tokio::time::timeout(wait, state.scan_slots.clone().acquire_owned()).await {
        Ok(Ok(permit)) => permit,
        Ok(Err(_)) => return Err(AppError::ServiceUnavailable("analysis slots closed".into())),
        Err(_) => {
            warn!("No analysis slot became free within {}s", wait.as_secs());
            return Err(AppError::ServiceUnavailable(format!(
                "no analysis slot became free within {} seconds",
                wait.as_secs()
            )));
        }
    };

    state.metrics.inc_analyses_started();
    let task = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        FilesystemAnalyzer::for_platform().with_defaults(defaults).execute(&req)
    });

    let command = match tokio::time::timeout(wait, task).await {
        Ok(Ok(command)) => command,
        Ok(Err(join_err)) => {
            state.metrics.inc_analyses_failed();
            return Err(AppError::Internal(anyhow::anyhow!("analysis task failed: {}", join_err)));
        }
        Err(_) => {
            state.metrics.inc_analyses_failed();
            warn!("Analysis did not return within {}s", wait.as_secs());
            return Err(AppError::ServiceUnavailable(format!(
                "analysis did not finish within {} seconds",
                wait.as_secs()
            )));
        }
    };

    let Some(result) = command.result.as_ref() else {
        state.metrics.inc_analyses_failed();
        let body = AnalyzeResponse { snapshot_id: None, command };
        return Ok((StatusCode::BAD_REQUEST, Json(body)).into_response());
    };
    state.metrics.record_result(result);

    // A failed insert must not cost the caller the result it already waited for.
    let snapshot_id = match db::save_snapshot(&state.db, result, db::TRIGGER_ON_DEMAND).await {
        Ok(id) => {
            info!("Stored snapshot {} for {}", id, result.path);
            match db::prune_snapshots(&state.db, &result.path, state.config.snapshots.retain_per_path).await {
                Ok(0) => {}
                Ok(n) => info!("Pruned {} old snapshot(s) for {}", n, result.path),
                Err(e) => warn!("Snapshot pruning failed for {}: {}", result.path, e),
            }
            Some(id)
        }
        Err(e) => {
            error!("Failed to store snapshot for {}: {}", result.path, e);
            None
        }
    };

    Ok((StatusCode::OK, Json(AnalyzeResponse { snapshot_id, command })).into_response())
}
