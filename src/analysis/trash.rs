use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use dirs_next as dirs;
use walkdir::WalkDir;

use super::walker::{Deadline, StopReason};

/// Supplies the well-known trash / recycle-bin locations to measure.
pub trait TrashLocator: Send + Sync {
    fn trash_paths(&self) -> Vec<PathBuf>;
}

/// The current user's trash for this OS.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlatformTrashLocator;

impl TrashLocator for PlatformTrashLocator {
    fn trash_paths(&self) -> Vec<PathBuf> {
        let mut paths = Vec::with_capacity(1);
        let home = dirs::home_dir();
        if cfg!(windows) {
            paths.push(PathBuf::from(r"C:\$Recycle.Bin"));
        } else if cfg!(target_os = "macos") {
            if let Some(home) = home {
                paths.push(home.join(".Trash"));
            }
        } else if cfg!(target_os = "linux") {
            if let Some(home) = home {
                paths.push(home.join(".local").join("share").join("Trash"));
            }
        }
        paths
    }
}

/// A fixed list of locations, for callers that already know where to look.
#[derive(Debug, Default, Clone)]
pub struct FixedTrashLocator(pub Vec<PathBuf>);

impl TrashLocator for FixedTrashLocator {
    fn trash_paths(&self) -> Vec<PathBuf> {
        self.0.clone()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TrashEstimate {
    pub size_bytes: u64,
    pub files: u64,
    /// Set when the estimate stopped early.
    pub stopped: Option<StopReason>,
}

/// Sums file sizes below `root` without classifying anything.
///
/// A root that cannot be stat'ed (including one that does not exist) is an
/// error; callers decide which kinds they care about. Unreadable
/// subdirectories are skipped when the cause is permissions and abort the
/// estimate otherwise. Symlinks are never followed.
pub fn estimate_directory_size(root: &Path, deadline: Deadline, max_entries: u64) -> io::Result<TrashEstimate> {
    let info = fs::metadata(root)?;
    if !info.is_dir() {
        return Ok(TrashEstimate { size_bytes: info.len(), files: 1, stopped: None });
    }

    let mut estimate = TrashEstimate::default();
    if deadline.expired() {
        estimate.stopped = Some(StopReason::Timeout);
        return Ok(estimate);
    }

    let mut entries: u64 = 0;
    for item in WalkDir::new(root).follow_links(false).min_depth(1) {
        if deadline.expired() {
            estimate.stopped = Some(StopReason::Timeout);
            break;
        }
        entries += 1;
        if entries > max_entries {
            estimate.stopped = Some(StopReason::MaxEntries);
            break;
        }

        let entry = match item {
            Ok(entry) => entry,
            Err(e) if e.io_error().map(io::Error::kind) == Some(io::ErrorKind::PermissionDenied) => continue,
            Err(e) => return Err(e.into()),
        };
        if !entry.file_type().is_file() {
            continue;
        }
        // Eintrag kann zwischen Auflistung und stat verschwinden
        let Ok(md) = entry.metadata() else { continue };
        estimate.size_bytes = estimate.size_bytes.saturating_add(md.len());
        estimate.files += 1;
    }

    Ok(estimate)
}
