use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::types::ScanResult;

/// Process-wide analysis counters
#[derive(Clone)]
pub struct Metrics {
    pub analyses_started: Arc<AtomicUsize>,
    pub analyses_completed: Arc<AtomicUsize>,
    pub analyses_partial: Arc<AtomicUsize>,
    pub analyses_failed: Arc<AtomicUsize>,
    pub files_processed: Arc<AtomicU64>,
    pub dirs_processed: Arc<AtomicU64>,
    pub bytes_scanned: Arc<AtomicU64>,
    pub permission_denied: Arc<AtomicU64>,
    pub start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            analyses_started: Arc::new(AtomicUsize::new(0)),
            analyses_completed: Arc::new(AtomicUsize::new(0)),
            analyses_partial: Arc::new(AtomicUsize::new(0)),
            analyses_failed: Arc::new(AtomicUsize::new(0)),
            files_processed: Arc::new(AtomicU64::new(0)),
            dirs_processed: Arc::new(AtomicU64::new(0)),
            bytes_scanned: Arc::new(AtomicU64::new(0)),
            permission_denied: Arc::new(AtomicU64::new(0)),
            start_time: Instant::now(),
        }
    }

    pub fn inc_analyses_started(&self) {
        self.analyses_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_analyses_failed(&self) {
        self.analyses_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Folds a finished (possibly partial) analysis into the totals.
    pub fn record_result(&self, result: &ScanResult) {
        self.analyses_completed.fetch_add(1, Ordering::Relaxed);
        if result.partial {
            self.analyses_partial.fetch_add(1, Ordering::Relaxed);
        }
        let s = &result.summary;
        self.files_processed.fetch_add(s.files_scanned, Ordering::Relaxed);
        self.dirs_processed.fetch_add(s.dirs_scanned, Ordering::Relaxed);
        self.bytes_scanned.fetch_add(s.bytes_scanned, Ordering::Relaxed);
        self.permission_denied.fetch_add(s.permission_denied_count, Ordering::Relaxed);
    }

    pub fn get_snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            analyses_started: self.analyses_started.load(Ordering::Relaxed),
            analyses_completed: self.analyses_completed.load(Ordering::Relaxed),
            analyses_partial: self.analyses_partial.load(Ordering::Relaxed),
            analyses_failed: self.analyses_failed.load(Ordering::Relaxed),
            files_processed: self.files_processed.load(Ordering::Relaxed),
            dirs_processed: self.dirs_processed.load(Ordering::Relaxed),
            bytes_scanned: self.bytes_scanned.load(Ordering::Relaxed),
            permission_denied: self.permission_denied.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
pub struct MetricsSnapshot {
    pub analyses_started: usize,
    pub analyses_completed: usize,
    pub analyses_partial: usize,
    pub analyses_failed: usize,
    pub files_processed: u64,
    pub dirs_processed: u64,
    pub bytes_scanned: u64,
    pub permission_denied: u64,
    pub uptime_seconds: u64,
}
