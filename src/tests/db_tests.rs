#[cfg(test)]
mod tests {
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::Row;
    use uuid::Uuid;

    use crate::cleanup::build_cleanup_preview;
    use crate::db;
    use crate::tests::fixtures::{candidate, sample_result};
    use crate::types::CleanupCategory;

    async fn setup_test_db() -> sqlx::SqlitePool {
        let pool = SqlitePoolOptions::new().max_connections(1).connect("sqlite::memory:").await.unwrap();
        db::init_db(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn test_init_db() {
        let pool = setup_test_db().await;

        let tables: Vec<String> =
            sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
                .fetch_all(&pool)
                .await
                .unwrap();

        assert!(tables.contains(&"filesystem_snapshots".to_string()));
        assert!(tables.contains(&"cleanup_runs".to_string()));

        // Running the schema setup twice is harmless.
        db::init_db(&pool).await.unwrap();
    }

    #[tokio::test]
    async fn test_snapshot_round_trip() {
        let pool = setup_test_db().await;
        let result = sample_result("/srv/data", true, vec![candidate("/srv/data/tmp/a", CleanupCategory::TempFiles, 9, true)]);

        let id = db::save_snapshot(&pool, &result, db::TRIGGER_ON_DEMAND).await.unwrap();
        let stored = db::get_snapshot(&pool, id).await.unwrap().unwrap();

        assert_eq!(stored.id, id);
        assert_eq!(stored.root_path, "/srv/data");
        assert_eq!(stored.trigger, "on_demand");
        assert!(stored.partial);
        assert_eq!(stored.summary, result.summary);
        assert_eq!(stored.result, result);
        assert!(stored.captured_at.ends_with('Z'));
    }

    #[tokio::test]
    async fn test_get_unknown_snapshot() {
        let pool = setup_test_db().await;
        assert!(db::get_snapshot(&pool, Uuid::new_v4()).await.unwrap().is_none());
        assert!(db::latest_snapshot(&pool, None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_latest_snapshot_by_path() {
        let pool = setup_test_db().await;
        let first = db::save_snapshot(&pool, &sample_result("/a", false, vec![]), "on_demand").await.unwrap();
        let second = db::save_snapshot(&pool, &sample_result("/a", false, vec![]), "on_demand").await.unwrap();
        let other = db::save_snapshot(&pool, &sample_result("/b", false, vec![]), "on_demand").await.unwrap();

        let latest_a = db::latest_snapshot(&pool, Some("/a")).await.unwrap().unwrap();
        assert_eq!(latest_a.id, second);
        assert_ne!(latest_a.id, first);

        let latest_any = db::latest_snapshot(&pool, None).await.unwrap().unwrap();
        assert_eq!(latest_any.id, other);

        assert!(db::latest_snapshot(&pool, Some("/c")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_prune_keeps_newest_per_path() {
        let pool = setup_test_db().await;
        let mut ids = Vec::new();
        for _ in 0..5 {
            ids.push(db::save_snapshot(&pool, &sample_result("/a", false, vec![]), "on_demand").await.unwrap());
        }
        let other = db::save_snapshot(&pool, &sample_result("/b", false, vec![]), "on_demand").await.unwrap();

        let removed = db::prune_snapshots(&pool, "/a", 2).await.unwrap();
        assert_eq!(removed, 3);

        assert!(db::get_snapshot(&pool, ids[0]).await.unwrap().is_none());
        assert!(db::get_snapshot(&pool, ids[3]).await.unwrap().is_some());
        assert!(db::get_snapshot(&pool, ids[4]).await.unwrap().is_some());
        assert!(db::get_snapshot(&pool, other).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_insert_cleanup_run() {
        let pool = setup_test_db().await;
        let result = sample_result("/a", false, vec![candidate("/a/tmp/x", CleanupCategory::TempFiles, 70, true)]);
        let snapshot_id = db::save_snapshot(&pool, &result, "on_demand").await.unwrap();
        let preview = build_cleanup_preview(snapshot_id, &result.cleanup_candidates, None);

        let run_id = db::insert_cleanup_run(&pool, &preview, &CleanupCategory::SAFE).await.unwrap();

        let row = sqlx::query("SELECT snapshot_id, status, estimated_bytes, candidate_count, categories FROM cleanup_runs WHERE id = ?1")
            .bind(run_id.to_string())
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(row.get::<String, _>("snapshot_id"), snapshot_id.to_string());
        assert_eq!(row.get::<String, _>("status"), "previewed");
        assert_eq!(row.get::<i64, _>("estimated_bytes"), 70);
        assert_eq!(row.get::<i64, _>("candidate_count"), 1);
        assert!(row.get::<String, _>("categories").contains("package_cache"));
    }
}
