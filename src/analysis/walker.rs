//! Bounded, iterative depth-first traversal.
//!
//! The walker only decides *what* gets visited and *when to stop*; everything a
//! visit means for the report lives behind [`WalkVisitor`].

use std::collections::HashSet;
use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Wall-clock cut-off shared by every phase of one scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline(Instant);

impl Deadline {
    pub fn at(instant: Instant) -> Self {
        Self(instant)
    }

    pub fn after(timeout: Duration) -> Self {
        Self(Instant::now() + timeout)
    }

    pub fn expired(&self) -> bool {
        Instant::now() > self.0
    }
}

/// Which bound ended a traversal early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Timeout,
    MaxEntries,
}

impl StopReason {
    pub fn describe(&self) -> &'static str {
        match self {
            StopReason::Timeout => "timeout reached",
            StopReason::MaxEntries => "max entries reached",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalFrame {
    pub path: PathBuf,
    pub depth: u32,
}

/// A regular file (after symlink resolution) found inside an expanded directory.
pub struct FileVisit<'a> {
    pub path: &'a Path,
    pub parent: &'a Path,
    pub depth: u32,
    pub metadata: &'a Metadata,
}

pub trait WalkVisitor {
    /// A directory was popped and listed successfully.
    fn directory_expanded(&mut self, path: &Path, depth: u32);

    /// A child directory was seen, whether or not it will be expanded.
    fn directory_discovered(&mut self, path: &Path, parent: &Path, depth: u32);

    fn file(&mut self, visit: FileVisit<'_>);

    /// A recoverable per-entry failure.
    fn error(&mut self, path: &Path, err: &io::Error);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkOutcome {
    pub entries_seen: u64,
    pub stopped: Option<StopReason>,
}

pub struct TreeWalker {
    root: PathBuf,
    max_depth: u32,
    max_entries: u64,
    follow_symlinks: bool,
    deadline: Deadline,
}

impl TreeWalker {
    pub fn new(root: impl Into<PathBuf>, deadline: Deadline) -> Self {
        Self { root: root.into(), max_depth: u32::MAX, max_entries: u64::MAX, follow_symlinks: false, deadline }
    }

    pub fn max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_entries(mut self, max_entries: u64) -> Self {
        self.max_entries = max_entries;
        self
    }

    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Walks until the tree is exhausted or a bound is hit. Bounds are checked
    /// before every pop and before every child entry.
    pub fn walk<V: WalkVisitor>(&self, visitor: &mut V) -> WalkOutcome {
        let mut outcome = WalkOutcome::default();
        let mut stack = vec![TraversalFrame { path: self.root.clone(), depth: 0 }];
        let mut visited: HashSet<PathBuf> = HashSet::new();
        visited.insert(self.visited_key(&self.root));

        'outer: loop {
            if self.deadline.expired() {
                outcome.stopped = Some(StopReason::Timeout);
                break;
            }
            // Popping from the end keeps the stack proportional to depth × fan-out.
            let Some(frame) = stack.pop() else { break };

            let entries = match fs::read_dir(&frame.path) {
                Ok(rd) => rd,
                Err(e) => {
                    visitor.error(&frame.path, &e);
                    continue;
                }
            };
            visitor.directory_expanded(&frame.path, frame.depth);

            for entry in entries {
                if self.deadline.expired() {
                    outcome.stopped = Some(StopReason::Timeout);
                    break 'outer;
                }
                outcome.entries_seen += 1;
                if outcome.entries_seen > self.max_entries {
                    outcome.stopped = Some(StopReason::MaxEntries);
                    break 'outer;
                }

                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        visitor.error(&frame.path, &e);
                        continue;
                    }
                };
                let entry_path = entry.path();
                let mut metadata = match entry.metadata() {
                    Ok(md) => md,
                    Err(e) => {
                        visitor.error(&entry_path, &e);
                        continue;
                    }
                };

                if metadata.file_type().is_symlink() {
                    if !self.follow_symlinks {
                        continue;
                    }
                    metadata = match fs::metadata(&entry_path) {
                        Ok(target) => target,
                        Err(e) => {
                            visitor.error(&entry_path, &e);
                            continue;
                        }
                    };
                }

                if metadata.is_dir() {
                    let child_depth = frame.depth + 1;
                    visitor.directory_discovered(&entry_path, &frame.path, child_depth);
                    if child_depth <= self.max_depth && visited.insert(self.visited_key(&entry_path)) {
                        stack.push(TraversalFrame { path: entry_path, depth: child_depth });
                    }
                    continue;
                }

                // Sockets, FIFOs and device nodes carry no reclaimable bytes.
                if !metadata.is_file() {
                    continue;
                }

                visitor.file(FileVisit {
                    path: &entry_path,
                    parent: &frame.path,
                    depth: frame.depth,
                    metadata: &metadata,
                });
            }
        }

        outcome
    }

    /// Canonical location when links are followed, so a loop back into an
    /// ancestor is recognised; the plain joined path otherwise.
    fn visited_key(&self, path: &Path) -> PathBuf {
        if self.follow_symlinks {
            fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
        } else {
            path.to_path_buf()
        }
    }
}
