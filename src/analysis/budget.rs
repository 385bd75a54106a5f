//! Budget & config resolution: turns an untrusted [`AnalyzeRequest`] into a
//! [`ScanConfig`] whose every field sits inside a fixed safe range.

use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::AnalysisError;
use crate::types::AnalyzeRequest;

pub const MAX_DEPTH_RANGE: (i64, i64) = (1, 12);
pub const TOP_FILES_RANGE: (i64, i64) = (1, 500);
pub const TOP_DIRS_RANGE: (i64, i64) = (1, 200);
pub const MAX_ENTRIES_RANGE: (i64, i64) = (1_000, 1_000_000);
pub const TIMEOUT_SECONDS_RANGE: (i64, i64) = (5, 120);

/// Values used for request fields the operator left out.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanDefaults {
    pub max_depth: i64,
    pub top_files: i64,
    pub top_dirs: i64,
    pub max_entries: i64,
    pub timeout_seconds: i64,
    pub follow_symlinks: bool,
}

impl Default for ScanDefaults {
    fn default() -> Self {
        Self {
            max_depth: 6,
            top_files: 50,
            top_dirs: 30,
            max_entries: 200_000,
            timeout_seconds: 20,
            follow_symlinks: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    pub root: PathBuf,
    pub max_depth: u32,
    pub top_files: usize,
    pub top_dirs: usize,
    pub max_entries: u64,
    pub timeout_seconds: u64,
    pub follow_symlinks: bool,
}

impl ScanConfig {
    /// Resolves a request against the built-in defaults.
    pub fn resolve(req: &AnalyzeRequest) -> Result<Self, AnalysisError> {
        Self::resolve_with(req, &ScanDefaults::default())
    }

    /// Parse-and-clamp at the boundary. Only the path can make this fail.
    pub fn resolve_with(req: &AnalyzeRequest, defaults: &ScanDefaults) -> Result<Self, AnalysisError> {
        let raw = req.path.as_deref().ok_or(AnalysisError::MissingPath)?;
        if raw.trim().is_empty() {
            return Err(AnalysisError::MissingPath);
        }
        if raw.contains('\0') {
            return Err(AnalysisError::InvalidPath("path contains null characters".to_string()));
        }

        Ok(Self {
            root: clean_path(Path::new(raw)),
            max_depth: clamp(req.max_depth.unwrap_or(defaults.max_depth), MAX_DEPTH_RANGE) as u32,
            top_files: clamp(req.top_files.unwrap_or(defaults.top_files), TOP_FILES_RANGE) as usize,
            top_dirs: clamp(req.top_dirs.unwrap_or(defaults.top_dirs), TOP_DIRS_RANGE) as usize,
            max_entries: clamp(req.max_entries.unwrap_or(defaults.max_entries), MAX_ENTRIES_RANGE)
                as u64,
            timeout_seconds: clamp(
                req.timeout_seconds.unwrap_or(defaults.timeout_seconds),
                TIMEOUT_SECONDS_RANGE,
            ) as u64,
            follow_symlinks: req.follow_symlinks.unwrap_or(defaults.follow_symlinks),
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Entry allowance for each trash location sub-scan.
    pub fn trash_entry_budget(&self) -> u64 {
        self.max_entries / 2
    }
}

pub fn clamp(value: i64, (min, max): (i64, i64)) -> i64 {
    value.clamp(min, max)
}

/// Lexical cleanup: drops `.` components and redundant separators, and
/// resolves `..` against the preceding name. A `..` directly under the root
/// is dropped; a leading `..` in a relative path is kept.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }
    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}
