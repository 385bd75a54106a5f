//! Final assembly: every list is sorted largest-first with a stable tiebreak,
//! and only then truncated to its cap.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::{Instant, SystemTime};

use super::aggregate::DirectoryAggregate;
use super::collect::{format_timestamp, DuplicateGroup, ScanCollectors};
use super::topk::TopK;
use super::walker::StopReason;
use crate::types::{
    CleanupCategory, DuplicateCandidate, LargestDirectory, ScanResult, TempAccumulation, TrashUsage,
};

pub const MAX_OLD_DOWNLOADS: usize = 200;
pub const MAX_UNROTATED_LOGS: usize = 200;
pub const MAX_DUPLICATE_GROUPS: usize = 200;

/// `partial`/`reason` pair. The main walk's bound wins over the trash sub-scan's.
pub fn partial_reason(walk: Option<StopReason>, trash: Option<StopReason>) -> (bool, String) {
    match (walk, trash) {
        (Some(reason), _) => (true, reason.describe().to_string()),
        (None, Some(reason)) => (true, format!("{} while scanning trash", reason.describe())),
        (None, None) => (false, String::new()),
    }
}

/// Directory ranking over rolled-up totals, offered in discovery order.
pub fn rank_directories(aggregates: Vec<DirectoryAggregate>, limit: usize) -> Vec<LargestDirectory> {
    let mut top = TopK::new(limit);
    for agg in aggregates {
        if !top.would_accept(agg.size_bytes) {
            continue;
        }
        top.offer(LargestDirectory {
            path: agg.path.display().to_string(),
            size_bytes: agg.size_bytes,
            file_count: agg.file_count,
        });
    }
    top.into_vec()
}

/// Stable size-descending sort followed by truncation.
pub fn sort_and_cap<T>(mut items: Vec<T>, size: impl Fn(&T) -> u64, cap: usize) -> Vec<T> {
    items.sort_by(|a, b| size(b).cmp(&size(a)));
    items.truncate(cap);
    items
}

/// Groups with at least two members, largest size first, then most members.
pub fn duplicate_candidates(groups: Vec<DuplicateGroup>, limit: usize) -> Vec<DuplicateCandidate> {
    let mut candidates: Vec<DuplicateCandidate> = groups
        .into_iter()
        .filter(|g| g.paths.len() >= 2)
        .map(|g| DuplicateCandidate { key: g.key, size_bytes: g.size_bytes, count: g.paths.len(), paths: g.paths })
        .collect();
    candidates.sort_by(|a, b| b.size_bytes.cmp(&a.size_bytes).then_with(|| b.count.cmp(&a.count)));
    candidates.truncate(limit);
    candidates
}

pub fn temp_accumulation(bytes: BTreeMap<CleanupCategory, u64>) -> Vec<TempAccumulation> {
    // BTreeMap iteration is ordered by category; the stable sort keeps that as tiebreak.
    let items = bytes.into_iter().map(|(category, bytes)| TempAccumulation { category, bytes }).collect();
    sort_and_cap(items, |t: &TempAccumulation| t.bytes, usize::MAX)
}

pub fn trash_usage(mut usage: Vec<TrashUsage>) -> Vec<TrashUsage> {
    usage.sort_by(|a, b| b.size_bytes.cmp(&a.size_bytes).then_with(|| a.path.cmp(&b.path)));
    usage
}

/// Timing of one invocation.
#[derive(Debug, Clone, Copy)]
pub struct ScanClock {
    pub started_wall: SystemTime,
    pub started: Instant,
}

impl ScanClock {
    pub fn start() -> Self {
        Self { started_wall: SystemTime::now(), started: Instant::now() }
    }
}

pub struct ReportInputs<'a> {
    pub root: &'a Path,
    pub clock: ScanClock,
    pub top_dirs: usize,
    pub walk_stop: Option<StopReason>,
    pub trash_stop: Option<StopReason>,
    pub trash_usage: Vec<TrashUsage>,
}

pub fn assemble(collectors: ScanCollectors<'_>, inputs: ReportInputs<'_>) -> ScanResult {
    let (partial, reason) = partial_reason(inputs.walk_stop, inputs.trash_stop);

    let ScanCollectors {
        summary,
        aggregates,
        top_files,
        temp_bytes,
        cleanup,
        old_downloads,
        unrotated_logs,
        duplicates,
        mut errors,
        ..
    } = collectors;
    errors.entries.truncate(super::collect::MAX_SCAN_ERRORS);

    let mut summary = summary;
    summary.permission_denied_count = errors.permission_denied;

    let top_largest_directories = rank_directories(aggregates.roll_up(), inputs.top_dirs);
    let completed_wall = SystemTime::now();

    ScanResult {
        path: inputs.root.display().to_string(),
        started_at: format_timestamp(inputs.clock.started_wall),
        completed_at: format_timestamp(completed_wall),
        duration_ms: inputs.clock.started.elapsed().as_millis() as u64,
        partial,
        reason,
        summary,
        top_largest_files: top_files.into_vec(),
        top_largest_directories,
        temp_accumulation: temp_accumulation(temp_bytes),
        old_downloads: sort_and_cap(old_downloads, |d| d.size_bytes, MAX_OLD_DOWNLOADS),
        unrotated_logs: sort_and_cap(unrotated_logs, |l| l.size_bytes, MAX_UNROTATED_LOGS),
        trash_usage: trash_usage(inputs.trash_usage),
        duplicate_candidates: duplicate_candidates(duplicates.into_groups(), MAX_DUPLICATE_GROUPS),
        cleanup_candidates: sort_and_cap(
            cleanup.into_vec(),
            |c| c.size_bytes,
            super::collect::MAX_CLEANUP_CANDIDATES,
        ),
        errors: errors.entries,
    }
}
