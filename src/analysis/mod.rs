//! Filesystem investigation engine.
//!
//! One call to [`FilesystemAnalyzer::analyze`] walks a directory tree once,
//! feeds every regular file through the classifiers and ranked collectors,
//! rolls directory totals up, measures the trash locations and assembles a
//! deterministic [`ScanResult`]. All state is owned by the call; analyzers can
//! run concurrently without coordination.

pub mod aggregate;
pub mod budget;
pub mod classify;
pub mod collect;
pub mod owner;
pub mod report;
pub mod topk;
pub mod trash;
pub mod walker;

use std::fs;
use std::io;
use std::time::{Instant, SystemTime};

use tracing::{debug, info, warn};

use crate::error::AnalysisError;
use crate::types::{AnalyzeRequest, CleanupCandidate, CleanupCategory, CommandResult, ScanResult, TrashUsage};

pub use budget::{ScanConfig, ScanDefaults};
pub use walker::{Deadline, StopReason};

use collect::ScanCollectors;
use owner::{platform_owner_resolver, OwnerResolver};
use report::{ReportInputs, ScanClock};
use trash::{estimate_directory_size, PlatformTrashLocator, TrashLocator};
use walker::TreeWalker;

pub struct FilesystemAnalyzer {
    owner: Box<dyn OwnerResolver>,
    trash: Box<dyn TrashLocator>,
    defaults: ScanDefaults,
}

impl FilesystemAnalyzer {
    /// Collaborators for the host OS.
    pub fn for_platform() -> Self {
        Self {
            owner: platform_owner_resolver(),
            trash: Box::new(PlatformTrashLocator),
            defaults: ScanDefaults::default(),
        }
    }

    pub fn with_owner_resolver(mut self, owner: impl OwnerResolver + 'static) -> Self {
        self.owner = Box::new(owner);
        self
    }

    pub fn with_trash_locator(mut self, trash: impl TrashLocator + 'static) -> Self {
        self.trash = Box::new(trash);
        self
    }

    /// Defaults applied to request fields that were left out.
    pub fn with_defaults(mut self, defaults: ScanDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Request-level entry point: resolves the budget, runs the scan and wraps
    /// the outcome with its elapsed time. Never panics on bad input.
    pub fn execute(&self, req: &AnalyzeRequest) -> CommandResult {
        let started = Instant::now();
        let outcome = ScanConfig::resolve_with(req, &self.defaults).and_then(|cfg| self.analyze(&cfg));
        let elapsed = started.elapsed().as_millis() as u64;
        match outcome {
            Ok(result) => CommandResult::completed(result, elapsed),
            Err(e) => {
                warn!("Filesystem analysis rejected: {}", e);
                CommandResult::failed(e.to_string(), elapsed)
            }
        }
    }

    pub fn analyze(&self, cfg: &ScanConfig) -> Result<ScanResult, AnalysisError> {
        self.analyze_until(cfg, None)
    }

    /// Same as [`analyze`](Self::analyze), with the wall-clock deadline supplied
    /// by the caller instead of derived from `cfg.timeout_seconds`.
    pub(crate) fn analyze_until(&self, cfg: &ScanConfig, deadline: Option<Deadline>) -> Result<ScanResult, AnalysisError> {
        let clock = ScanClock::start();
        validate_root(cfg)?;

        let deadline = deadline.unwrap_or_else(|| Deadline::after(cfg.timeout()));
        let download_threshold = clock
            .started_wall
            .checked_sub(classify::OLD_DOWNLOAD_AGE)
            .unwrap_or(SystemTime::UNIX_EPOCH);

        info!(
            "Starting filesystem analysis of {} (depth {}, max entries {}, timeout {}s)",
            cfg.root.display(),
            cfg.max_depth,
            cfg.max_entries,
            cfg.timeout_seconds
        );

        let mut collectors = ScanCollectors::new(&cfg.root, cfg.top_files, download_threshold, self.owner.as_ref());
        let outcome = TreeWalker::new(&cfg.root, deadline)
            .max_depth(cfg.max_depth)
            .max_entries(cfg.max_entries)
            .follow_symlinks(cfg.follow_symlinks)
            .walk(&mut collectors);
        debug!("Walk finished after {} entries", outcome.entries_seen);

        let (trash_usage, trash_stop) = self.measure_trash(cfg, deadline, &mut collectors);

        let result = report::assemble(
            collectors,
            ReportInputs {
                root: &cfg.root,
                clock,
                top_dirs: cfg.top_dirs,
                walk_stop: outcome.stopped,
                trash_stop,
                trash_usage,
            },
        );

        if result.partial {
            warn!(
                "Filesystem analysis of {} is partial: {} ({} files, {} dirs)",
                result.path, result.reason, result.summary.files_scanned, result.summary.dirs_scanned
            );
        } else {
            info!(
                "Filesystem analysis of {} finished in {} ms ({} files, {} dirs, {} bytes)",
                result.path,
                result.duration_ms,
                result.summary.files_scanned,
                result.summary.dirs_scanned,
                result.summary.bytes_scanned
            );
        }
        Ok(result)
    }

    /// Sizes every trash location under the shared deadline. Missing locations
    /// are expected and stay silent.
    fn measure_trash(
        &self,
        cfg: &ScanConfig,
        deadline: Deadline,
        collectors: &mut ScanCollectors<'_>,
    ) -> (Vec<TrashUsage>, Option<StopReason>) {
        let mut usage = Vec::new();
        let mut stopped = None;

        for path in self.trash.trash_paths() {
            let estimate = match estimate_directory_size(&path, deadline, cfg.trash_entry_budget()) {
                Ok(estimate) => estimate,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => {
                    collectors.errors.record(&path, &e);
                    continue;
                }
            };
            if stopped.is_none() {
                stopped = estimate.stopped;
            }
            if estimate.size_bytes == 0 {
                continue;
            }

            let display = path.display().to_string();
            usage.push(TrashUsage { path: display.clone(), size_bytes: estimate.size_bytes });
            collectors.cleanup.add(CleanupCandidate {
                path: display,
                category: CleanupCategory::Trash,
                size_bytes: estimate.size_bytes,
                safe: true,
                reason: "trash/recycle bin cleanup".to_string(),
                modified_at: None,
            });
        }

        (usage, stopped)
    }
}

impl Default for FilesystemAnalyzer {
    fn default() -> Self {
        Self::for_platform()
    }
}

fn validate_root(cfg: &ScanConfig) -> Result<(), AnalysisError> {
    let display = cfg.root.display().to_string();
    let info = fs::metadata(&cfg.root).map_err(|source| AnalysisError::RootStat { path: display.clone(), source })?;
    if !info.is_dir() {
        return Err(AnalysisError::NotADirectory(display));
    }
    Ok(())
}
