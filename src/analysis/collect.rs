use std::collections::{BTreeMap, HashMap};
use std::io;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::debug;

use super::aggregate::DirectoryAggregates;
use super::classify;
use super::owner::OwnerResolver;
use super::topk::TopK;
use super::walker::{FileVisit, WalkVisitor};
use crate::types::{
    CleanupCandidate, CleanupCategory, LargestFile, OldDownload, ScanErrorEntry, ScanSummary, UnrotatedLog,
};

pub const MAX_SCAN_ERRORS: usize = 200;
pub const MAX_CLEANUP_CANDIDATES: usize = 1_000;
pub const MAX_PATHS_PER_DUPLICATE_GROUP: usize = 50;

/// RFC 3339 in UTC. Times before the epoch or outside chrono's range give an
/// empty string; filesystems happily store both.
pub fn format_timestamp(time: SystemTime) -> String {
    let Ok(since_epoch) = time.duration_since(UNIX_EPOCH) else { return String::new() };
    let Ok(secs) = i64::try_from(since_epoch.as_secs()) else { return String::new() };
    DateTime::<Utc>::from_timestamp(secs, since_epoch.subsec_nanos())
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}

/// Recorded per-entry failures. The permission-denied tally keeps counting
/// after the list is full.
#[derive(Debug, Default)]
pub struct ScanErrors {
    pub entries: Vec<ScanErrorEntry>,
    pub permission_denied: u64,
}

impl ScanErrors {
    pub fn record(&mut self, path: &Path, err: &io::Error) {
        if err.kind() == io::ErrorKind::PermissionDenied {
            self.permission_denied += 1;
        }
        if self.entries.len() >= MAX_SCAN_ERRORS {
            return;
        }
        self.entries.push(ScanErrorEntry { path: path.display().to_string(), error: err.to_string() });
    }
}

#[derive(Debug, Clone)]
pub struct DuplicateGroup {
    pub key: String,
    pub size_bytes: u64,
    pub paths: Vec<String>,
}

#[derive(Debug, Default)]
pub struct DuplicateGroups {
    groups: Vec<DuplicateGroup>,
    index: HashMap<(u64, String), usize>,
}

impl DuplicateGroups {
    pub fn add(&mut self, path: &Path, size: u64) {
        let Some(name) = path.file_name() else { return };
        let Some(key) = classify::duplicate_key(&name.to_string_lossy(), size) else { return };

        match self.index.get(&key) {
            Some(&idx) => {
                let group = &mut self.groups[idx];
                if group.paths.len() < MAX_PATHS_PER_DUPLICATE_GROUP {
                    group.paths.push(path.display().to_string());
                }
            }
            None => {
                self.groups.push(DuplicateGroup {
                    key: format!("{}|{}", key.0, key.1),
                    size_bytes: size,
                    paths: vec![path.display().to_string()],
                });
                self.index.insert(key, self.groups.len() - 1);
            }
        }
    }

    /// Groups in first-seen order.
    pub fn into_groups(self) -> Vec<DuplicateGroup> {
        self.groups
    }
}

/// Cleanup candidates deduplicated by path, in first-seen order.
#[derive(Debug, Default)]
pub struct CleanupCandidates {
    items: Vec<CleanupCandidate>,
    index: HashMap<String, usize>,
}

impl CleanupCandidates {
    pub fn add(&mut self, candidate: CleanupCandidate) {
        if candidate.path.is_empty() || candidate.size_bytes == 0 {
            return;
        }
        if let Some(&idx) = self.index.get(&candidate.path) {
            if candidate.size_bytes > self.items[idx].size_bytes {
                self.items[idx] = candidate;
            }
            return;
        }
        if self.items.len() >= MAX_CLEANUP_CANDIDATES {
            return;
        }
        self.index.insert(candidate.path.clone(), self.items.len());
        self.items.push(candidate);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<CleanupCandidate> {
        self.items
    }
}

/// Everything the main walk feeds while it visits entries.
pub struct ScanCollectors<'a> {
    owner: &'a dyn OwnerResolver,
    download_threshold: SystemTime,
    pub summary: ScanSummary,
    pub aggregates: DirectoryAggregates,
    pub top_files: TopK<LargestFile>,
    pub temp_bytes: BTreeMap<CleanupCategory, u64>,
    pub cleanup: CleanupCandidates,
    pub old_downloads: Vec<OldDownload>,
    pub unrotated_logs: Vec<UnrotatedLog>,
    pub duplicates: DuplicateGroups,
    pub errors: ScanErrors,
}

impl<'a> ScanCollectors<'a> {
    pub fn new(root: &Path, top_files: usize, download_threshold: SystemTime, owner: &'a dyn OwnerResolver) -> Self {
        Self {
            owner,
            download_threshold,
            summary: ScanSummary::default(),
            aggregates: DirectoryAggregates::with_root(root),
            top_files: TopK::new(top_files),
            temp_bytes: BTreeMap::new(),
            cleanup: CleanupCandidates::default(),
            old_downloads: Vec::new(),
            unrotated_logs: Vec::new(),
            duplicates: DuplicateGroups::default(),
            errors: ScanErrors::default(),
        }
    }
}

impl WalkVisitor for ScanCollectors<'_> {
    fn directory_expanded(&mut self, _path: &Path, depth: u32) {
        self.summary.dirs_scanned += 1;
        self.summary.max_depth_reached = self.summary.max_depth_reached.max(depth);
    }

    fn directory_discovered(&mut self, path: &Path, parent: &Path, depth: u32) {
        self.aggregates.register(path, Some(parent), depth);
    }

    fn file(&mut self, visit: FileVisit<'_>) {
        let size = visit.metadata.len();
        self.summary.files_scanned += 1;
        self.summary.bytes_scanned = self.summary.bytes_scanned.saturating_add(size);
        self.aggregates.add_file(visit.parent, size);

        let path = visit.path.display().to_string();
        let modified = visit.metadata.modified().ok();
        let modified_at = modified.map(format_timestamp).unwrap_or_default();
        let old_download = modified.is_some_and(|m| classify::is_old_download(&path, m, self.download_threshold));

        // Owner lookups hit the passwd database; only pay for entries that are kept.
        let owner = if self.top_files.would_accept(size) || old_download {
            self.owner.owner(visit.metadata)
        } else {
            String::new()
        };

        if self.top_files.would_accept(size) {
            self.top_files.offer(LargestFile {
                path: path.clone(),
                size_bytes: size,
                modified_at: modified_at.clone(),
                owner: owner.clone(),
            });
        }

        if let Some(category) = classify::classify_cleanup_category(&path) {
            *self.temp_bytes.entry(category).or_insert(0) += size;
            self.cleanup.add(CleanupCandidate {
                path: path.clone(),
                category,
                size_bytes: size,
                safe: true,
                reason: "temporary/cache file".to_string(),
                modified_at: Some(modified_at.clone()),
            });
        }

        if old_download {
            self.old_downloads.push(OldDownload {
                path: path.clone(),
                size_bytes: size,
                modified_at: modified_at.clone(),
                owner,
            });
        }

        if classify::is_unrotated_log(&path, size) {
            self.unrotated_logs.push(UnrotatedLog { path: path.clone(), size_bytes: size, modified_at });
        }

        self.duplicates.add(visit.path, size);
    }

    fn error(&mut self, path: &Path, err: &io::Error) {
        debug!("Scan error at {}: {}", path.display(), err);
        self.errors.record(path, err);
    }
}
