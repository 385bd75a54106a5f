use std::path::Path as FsPath;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::{
    analysis::budget::clean_path,
    cleanup::build_cleanup_preview,
    db,
    error::{AppError, AppResult, OptionExt},
    state::AppState,
    types::{CleanupCategory, CleanupPreviewRequest, CleanupPreviewResponse, SnapshotDto},
};

#[derive(Debug, Default, Deserialize)]
pub struct LatestQuery {
    pub path: Option<String>,
}

pub async fn latest_snapshot(
    State(state): State<AppState>,
    Query(q): Query<LatestQuery>,
) -> AppResult<Json<SnapshotDto>> {
    // Stored roots are cleaned the same way analysis requests are.
    let root = q
        .path
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| clean_path(FsPath::new(p)).display().to_string());

    let snapshot = db::latest_snapshot(&state.db, root.as_deref())
        .await?
        .ok_or_else(|| match &root {
            Some(p) => AppError::NotFound(format!("no snapshot for {}", p)),
            None => AppError::NotFound("no snapshot recorded yet".into()),
        })?;
    Ok(Json(snapshot))
}

pub async fn get_snapshot(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<Json<SnapshotDto>> {
    let snapshot = db::get_snapshot(&state.db, id).await?.ok_or_not_found("snapshot")?;
    Ok(Json(snapshot))
}

/// Estimates what cleaning the safe categories of a snapshot would reclaim.
/// Uses the newest snapshot when none is named.
pub async fn cleanup_preview(
    State(state): State<AppState>,
    Json(req): Json<CleanupPreviewRequest>,
) -> AppResult<Json<CleanupPreviewResponse>> {
    let snapshot = match req.snapshot_id {
        Some(id) => db::get_snapshot(&state.db, id).await?,
        None => db::latest_snapshot(&state.db, None).await?,
    }
    .ok_or_else(|| AppError::NotFound("no snapshot available for cleanup preview".into()))?;

    let requested = req.categories.as_deref().filter(|c| !c.is_empty());
    let preview = build_cleanup_preview(snapshot.id, &snapshot.result.cleanup_candidates, requested);
    let categories: &[CleanupCategory] = requested.unwrap_or(&CleanupCategory::SAFE);
    let cleanup_run_id = db::insert_cleanup_run(&state.db, &preview, categories).await?;

    info!(
        "Cleanup preview {} for snapshot {}: {} candidates, {} bytes",
        cleanup_run_id, snapshot.id, preview.candidate_count, preview.estimated_bytes
    );
    Ok(Json(CleanupPreviewResponse { cleanup_run_id, preview }))
}
