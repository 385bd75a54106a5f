use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::config::AppConfig;
use crate::metrics::Metrics;

/// The shared application state.
///
/// Cloned into every handler by axum. Analyses themselves share nothing; the
/// semaphore only caps how many run at once.
#[derive(Clone)]
pub struct AppState {
    /// The database connection pool holding snapshots and cleanup previews.
    pub db: sqlx::SqlitePool,
    /// The application configuration.
    pub config: Arc<AppConfig>,
    /// Process-wide analysis counters.
    pub metrics: Metrics,
    /// One permit per concurrently running analysis.
    pub scan_slots: Arc<Semaphore>,
}

impl AppState {
    pub fn new(db: sqlx::SqlitePool, config: AppConfig) -> Self {
        let slots = config.dispatch.max_concurrent_scans.max(1);
        Self { db, config: Arc::new(config), metrics: Metrics::new(), scan_slots: Arc::new(Semaphore::new(slots)) }
    }
}
