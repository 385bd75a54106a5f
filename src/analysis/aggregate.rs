use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryAggregate {
    pub path: PathBuf,
    pub parent: Option<PathBuf>,
    pub depth: u32,
    pub size_bytes: u64,
    pub file_count: u64,
}

/// Per-directory totals for one scan, kept in discovery order.
#[derive(Debug, Default)]
pub struct DirectoryAggregates {
    entries: Vec<DirectoryAggregate>,
    index: HashMap<PathBuf, usize>,
}

impl DirectoryAggregates {
    pub fn with_root(root: &Path) -> Self {
        let mut aggregates = Self::default();
        aggregates.register(root, None, 0);
        aggregates
    }

    /// First discovery wins; later discoveries of the same path are no-ops.
    pub fn register(&mut self, path: &Path, parent: Option<&Path>, depth: u32) {
        if self.index.contains_key(path) {
            return;
        }
        self.index.insert(path.to_path_buf(), self.entries.len());
        self.entries.push(DirectoryAggregate {
            path: path.to_path_buf(),
            parent: parent.map(Path::to_path_buf),
            depth,
            size_bytes: 0,
            file_count: 0,
        });
    }

    /// Credits a file to its immediate parent directory.
    pub fn add_file(&mut self, dir: &Path, size: u64) {
        if let Some(&idx) = self.index.get(dir) {
            let agg = &mut self.entries[idx];
            agg.size_bytes = agg.size_bytes.saturating_add(size);
            agg.file_count += 1;
        }
    }

    pub fn get(&self, path: &Path) -> Option<&DirectoryAggregate> {
        self.index.get(path).map(|&idx| &self.entries[idx])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Folds every directory's totals into its ancestors, deepest first, so each
    /// entry ends up holding its whole observed subtree. Contributions whose parent
    /// was never registered are dropped.
    pub fn roll_up(mut self) -> Vec<DirectoryAggregate> {
        let mut order: Vec<usize> = (0..self.entries.len()).collect();
        order.sort_by(|&a, &b| self.entries[b].depth.cmp(&self.entries[a].depth));

        for idx in order {
            let (size, count, parent) = {
                let agg = &self.entries[idx];
                match &agg.parent {
                    Some(parent) => (agg.size_bytes, agg.file_count, parent.clone()),
                    None => continue,
                }
            };
            if let Some(&pidx) = self.index.get(&parent) {
                let p = &mut self.entries[pidx];
                p.size_bytes = p.size_bytes.saturating_add(size);
                p.file_count += count;
            }
        }

        self.entries
    }
}
