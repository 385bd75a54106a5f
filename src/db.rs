use chrono::{SecondsFormat, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

use crate::error::AppResult;
use crate::types::{CleanupCategory, CleanupPreview, ScanResult, ScanSummary, SnapshotDto};

/// Trigger recorded for snapshots captured through `POST /analyze`.
pub const TRIGGER_ON_DEMAND: &str = "on_demand";

pub async fn init_db(pool: &SqlitePool) -> anyhow::Result<()> {
    // Pragmas for better durability/performance
    if let Err(e) = sqlx::query("PRAGMA journal_mode=WAL;").execute(pool).await {
        tracing::warn!("Failed to set WAL journal mode: {}", e);
    }
    if let Err(e) = sqlx::query("PRAGMA synchronous=NORMAL;").execute(pool).await {
        tracing::warn!("Failed to set synchronous mode: {}", e);
    }
    // Foreign keys are critical - fail if this doesn't work
    sqlx::query("PRAGMA foreign_keys=ON;").execute(pool).await?;

    if let Err(e) = sqlx::query("PRAGMA busy_timeout=10000;").execute(pool).await {
        tracing::warn!("Failed to set busy_timeout: {}", e);
    }

    // one row per completed analysis; payload holds the full result JSON
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS filesystem_snapshots (
            id TEXT PRIMARY KEY,
            root_path TEXT NOT NULL,
            "trigger" TEXT NOT NULL,
            partial INTEGER NOT NULL,
            captured_at TEXT NOT NULL,
            summary TEXT NOT NULL,
            payload TEXT NOT NULL
        )"#,
    )
    .execute(pool)
    .await?;

    // previews only; nothing in this service executes a cleanup
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS cleanup_runs (
            id TEXT PRIMARY KEY,
            snapshot_id TEXT NOT NULL,
            status TEXT NOT NULL,
            categories TEXT NOT NULL,
            estimated_bytes INTEGER NOT NULL,
            candidate_count INTEGER NOT NULL,
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ','now')),
            FOREIGN KEY(snapshot_id) REFERENCES filesystem_snapshots(id) ON DELETE CASCADE
        )"#,
    )
    .execute(pool)
    .await?;

    let indexes = [
        (
            "idx_snapshots_root_captured",
            "CREATE INDEX IF NOT EXISTS idx_snapshots_root_captured ON filesystem_snapshots(root_path, captured_at DESC)",
        ),
        (
            "idx_snapshots_captured",
            "CREATE INDEX IF NOT EXISTS idx_snapshots_captured ON filesystem_snapshots(captured_at DESC)",
        ),
        ("idx_cleanup_runs_snapshot", "CREATE INDEX IF NOT EXISTS idx_cleanup_runs_snapshot ON cleanup_runs(snapshot_id)"),
    ];

    for (name, query) in indexes {
        if let Err(e) = sqlx::query(query).execute(pool).await {
            match &e {
                sqlx::Error::Database(db_err) => {
                    let msg = db_err.message().to_lowercase();
                    if msg.contains("already exists") || msg.contains("duplicate") {
                        tracing::debug!("Index {} already exists, skipping", name);
                    } else {
                        tracing::warn!("Failed to create index {}: {}", name, e);
                    }
                }
                _ => {
                    tracing::warn!("Failed to create index {}: {}", name, e);
                }
            }
        }
    }

    Ok(())
}

fn from_json<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T, sqlx::Error> {
    serde_json::from_str(raw).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

fn snapshot_from_row(row: &SqliteRow) -> Result<SnapshotDto, sqlx::Error> {
    let id: String = row.try_get("id")?;
    let summary: String = row.try_get("summary")?;
    let payload: String = row.try_get("payload")?;
    Ok(SnapshotDto {
        id: Uuid::parse_str(&id).map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
        root_path: row.try_get("root_path")?,
        trigger: row.try_get("trigger")?,
        partial: row.try_get::<i64, _>("partial")? != 0,
        captured_at: row.try_get("captured_at")?,
        summary: from_json::<ScanSummary>(&summary)?,
        result: from_json::<ScanResult>(&payload)?,
    })
}

/// Persists a completed analysis and returns the new snapshot id.
pub async fn save_snapshot(pool: &SqlitePool, result: &ScanResult, trigger: &str) -> AppResult<Uuid> {
    let summary = serde_json::to_string(&result.summary)?;
    let payload = serde_json::to_string(result)?;
    let id = Uuid::new_v4();
    let captured_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    sqlx::query(
        r#"INSERT INTO filesystem_snapshots (id, root_path, "trigger", partial, captured_at, summary, payload)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"#,
    )
    .bind(id.to_string())
    .bind(&result.path)
    .bind(trigger)
    .bind(result.partial as i64)
    .bind(captured_at)
    .bind(summary)
    .bind(payload)
    .execute(pool)
    .await?;
    Ok(id)
}

/// Most recent snapshot, optionally restricted to one root path.
pub async fn latest_snapshot(pool: &SqlitePool, root_path: Option<&str>) -> AppResult<Option<SnapshotDto>> {
    let row = match root_path {
        Some(root) => {
            sqlx::query(
                r#"SELECT id, root_path, "trigger", partial, captured_at, summary, payload
                   FROM filesystem_snapshots WHERE root_path = ?1
                   ORDER BY captured_at DESC, rowid DESC LIMIT 1"#,
            )
            .bind(root)
            .fetch_optional(pool)
            .await?
        }
        None => {
            sqlx::query(
                r#"SELECT id, root_path, "trigger", partial, captured_at, summary, payload
                   FROM filesystem_snapshots ORDER BY captured_at DESC, rowid DESC LIMIT 1"#,
            )
            .fetch_optional(pool)
            .await?
        }
    };
    Ok(row.as_ref().map(snapshot_from_row).transpose()?)
}

pub async fn get_snapshot(pool: &SqlitePool, id: Uuid) -> AppResult<Option<SnapshotDto>> {
    let row = sqlx::query(
        r#"SELECT id, root_path, "trigger", partial, captured_at, summary, payload
           FROM filesystem_snapshots WHERE id = ?1"#,
    )
    .bind(id.to_string())
    .fetch_optional(pool)
    .await?;
    Ok(row.as_ref().map(snapshot_from_row).transpose()?)
}

/// Keeps the newest `keep` snapshots for `root_path` and deletes the rest.
/// Returns the number of rows removed.
pub async fn prune_snapshots(pool: &SqlitePool, root_path: &str, keep: u32) -> AppResult<u64> {
    let res = sqlx::query(
        r#"DELETE FROM filesystem_snapshots
           WHERE root_path = ?1 AND id NOT IN (
               SELECT id FROM filesystem_snapshots WHERE root_path = ?1
               ORDER BY captured_at DESC, rowid DESC LIMIT ?2
           )"#,
    )
    .bind(root_path)
    .bind(keep as i64)
    .execute(pool)
    .await?;
    Ok(res.rows_affected())
}

/// Records a cleanup preview with status `previewed`.
pub async fn insert_cleanup_run(
    pool: &SqlitePool,
    preview: &CleanupPreview,
    categories: &[CleanupCategory],
) -> AppResult<Uuid> {
    let categories = serde_json::to_string(categories)?;
    let id = Uuid::new_v4();
    sqlx::query(
        r#"INSERT INTO cleanup_runs (id, snapshot_id, status, categories, estimated_bytes, candidate_count)
           VALUES (?1, ?2, 'previewed', ?3, ?4, ?5)"#,
    )
    .bind(id.to_string())
    .bind(preview.snapshot_id.to_string())
    .bind(categories)
    .bind(preview.estimated_bytes as i64)
    .bind(preview.candidate_count as i64)
    .execute(pool)
    .await?;
    Ok(id)
}
