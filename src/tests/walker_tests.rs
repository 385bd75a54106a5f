#[cfg(test)]
mod tests {
    use std::io;
    use std::path::{Path, PathBuf};
    use std::thread;
    use std::time::{Duration, Instant};

    use tempfile::TempDir;

    use crate::analysis::trash::{estimate_directory_size, FixedTrashLocator, TrashLocator};
    use crate::analysis::walker::{Deadline, FileVisit, StopReason, TreeWalker, WalkVisitor};
    use crate::tests::fixtures::write_file;

    #[derive(Default)]
    struct Recorder {
        expanded: Vec<(PathBuf, u32)>,
        discovered: Vec<(PathBuf, PathBuf, u32)>,
        files: Vec<(PathBuf, u64, u32)>,
        errors: Vec<PathBuf>,
    }

    impl WalkVisitor for Recorder {
        fn directory_expanded(&mut self, path: &Path, depth: u32) {
            self.expanded.push((path.to_path_buf(), depth));
        }

        fn directory_discovered(&mut self, path: &Path, parent: &Path, depth: u32) {
            self.discovered.push((path.to_path_buf(), parent.to_path_buf(), depth));
        }

        fn file(&mut self, visit: FileVisit<'_>) {
            self.files.push((visit.path.to_path_buf(), visit.metadata.len(), visit.depth));
        }

        fn error(&mut self, path: &Path, _err: &io::Error) {
            self.errors.push(path.to_path_buf());
        }
    }

    fn far_deadline() -> Deadline {
        Deadline::after(Duration::from_secs(60))
    }

    fn expired_deadline() -> Deadline {
        let d = Deadline::at(Instant::now());
        thread::sleep(Duration::from_millis(5));
        d
    }

    #[test]
    fn test_walks_whole_tree() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write_file(&root.join("a.txt"), 10);
        write_file(&root.join("sub/b.txt"), 20);
        write_file(&root.join("sub/deeper/c.txt"), 30);

        let mut rec = Recorder::default();
        let outcome = TreeWalker::new(root, far_deadline()).walk(&mut rec);

        assert_eq!(outcome.stopped, None);
        assert_eq!(rec.expanded.len(), 3);
        assert_eq!(rec.files.len(), 3);
        let total: u64 = rec.files.iter().map(|f| f.1).sum();
        assert_eq!(total, 60);
        let c = rec.files.iter().find(|f| f.0.ends_with("c.txt")).unwrap();
        assert_eq!(c.2, 2);
        assert!(rec.errors.is_empty());
    }

    #[test]
    fn test_max_depth_registers_but_does_not_expand() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write_file(&root.join("a/in_a.txt"), 1);
        write_file(&root.join("a/b/in_b.txt"), 1);

        let mut rec = Recorder::default();
        TreeWalker::new(root, far_deadline()).max_depth(1).walk(&mut rec);

        let expanded: Vec<&PathBuf> = rec.expanded.iter().map(|e| &e.0).collect();
        assert!(expanded.contains(&&root.join("a")));
        assert!(!expanded.contains(&&root.join("a/b")));
        assert!(rec.discovered.iter().any(|d| d.0 == root.join("a/b") && d.2 == 2));
        assert_eq!(rec.files.len(), 1);
    }

    #[test]
    fn test_max_entries_stops_walk() {
        let tmp = TempDir::new().unwrap();
        for i in 0..5 {
            write_file(&tmp.path().join(format!("f{}.bin", i)), 1);
        }

        let mut rec = Recorder::default();
        let outcome = TreeWalker::new(tmp.path(), far_deadline()).max_entries(3).walk(&mut rec);

        assert_eq!(outcome.stopped, Some(StopReason::MaxEntries));
        assert_eq!(rec.files.len(), 3);
        assert_eq!(outcome.stopped.map(|r| r.describe()), Some("max entries reached"));
    }

    #[test]
    fn test_expired_deadline_does_no_work() {
        let tmp = TempDir::new().unwrap();
        write_file(&tmp.path().join("a.txt"), 1);

        let mut rec = Recorder::default();
        let outcome = TreeWalker::new(tmp.path(), expired_deadline()).walk(&mut rec);

        assert_eq!(outcome.stopped, Some(StopReason::Timeout));
        assert_eq!(outcome.entries_seen, 0);
        assert!(rec.expanded.is_empty());
        assert!(rec.files.is_empty());
    }

    #[test]
    fn test_unreadable_directory_is_reported_and_skipped() {
        let tmp = TempDir::new().unwrap();
        let not_a_dir = tmp.path().join("plain.txt");
        write_file(&not_a_dir, 3);

        let mut rec = Recorder::default();
        let outcome = TreeWalker::new(&not_a_dir, far_deadline()).walk(&mut rec);

        assert_eq!(outcome.stopped, None);
        assert_eq!(rec.errors, vec![not_a_dir]);
        assert!(rec.expanded.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_skipped_unless_followed() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write_file(&root.join("real/data.bin"), 8);
        std::os::unix::fs::symlink(root.join("real/data.bin"), root.join("link.bin")).unwrap();

        let mut rec = Recorder::default();
        TreeWalker::new(root, far_deadline()).walk(&mut rec);
        assert_eq!(rec.files.len(), 1);

        let mut rec = Recorder::default();
        TreeWalker::new(root, far_deadline()).follow_symlinks(true).walk(&mut rec);
        assert_eq!(rec.files.len(), 2);
        assert!(rec.files.iter().any(|f| f.0 == root.join("link.bin") && f.1 == 8));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_cycle_is_expanded_once() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write_file(&root.join("a/file.txt"), 4);
        std::os::unix::fs::symlink(root, root.join("a/loop")).unwrap();

        let mut rec = Recorder::default();
        let outcome = TreeWalker::new(root, far_deadline()).max_depth(12).follow_symlinks(true).walk(&mut rec);

        assert_eq!(outcome.stopped, None);
        assert_eq!(rec.expanded.len(), 2);
        assert_eq!(rec.files.len(), 1);
        // The loop is still discovered as a child of `a`.
        assert!(rec.discovered.iter().any(|d| d.0 == root.join("a/loop")));
    }

    #[cfg(unix)]
    #[test]
    fn test_broken_symlink_is_a_scan_error_when_followed() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        std::os::unix::fs::symlink(root.join("missing"), root.join("dangling")).unwrap();

        let mut rec = Recorder::default();
        TreeWalker::new(root, far_deadline()).follow_symlinks(true).walk(&mut rec);
        assert_eq!(rec.errors, vec![root.join("dangling")]);

        let mut rec = Recorder::default();
        TreeWalker::new(root, far_deadline()).walk(&mut rec);
        assert!(rec.errors.is_empty());
    }

    #[test]
    fn test_trash_estimate_sums_nested_files() {
        let tmp = TempDir::new().unwrap();
        write_file(&tmp.path().join("files/a"), 100);
        write_file(&tmp.path().join("files/nested/b"), 50);
        write_file(&tmp.path().join("info/a.trashinfo"), 5);

        let est = estimate_directory_size(tmp.path(), far_deadline(), 1_000).unwrap();
        assert_eq!(est.size_bytes, 155);
        assert_eq!(est.files, 3);
        assert_eq!(est.stopped, None);
    }

    #[test]
    fn test_trash_estimate_missing_path_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = estimate_directory_size(&tmp.path().join("nope"), far_deadline(), 1_000).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_trash_estimate_file_root() {
        let tmp = TempDir::new().unwrap();
        let f = tmp.path().join("single");
        write_file(&f, 77);
        let est = estimate_directory_size(&f, far_deadline(), 1_000).unwrap();
        assert_eq!(est.size_bytes, 77);
    }

    #[test]
    fn test_trash_estimate_bounds() {
        let tmp = TempDir::new().unwrap();
        for i in 0..6 {
            write_file(&tmp.path().join(format!("f{}", i)), 1);
        }
        let est = estimate_directory_size(tmp.path(), far_deadline(), 4).unwrap();
        assert_eq!(est.stopped, Some(StopReason::MaxEntries));
        assert_eq!(est.files, 4);

        let est = estimate_directory_size(tmp.path(), expired_deadline(), 1_000).unwrap();
        assert_eq!(est.stopped, Some(StopReason::Timeout));
        assert_eq!(est.size_bytes, 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_trash_estimate_skips_locked_directory_and_links() {
        use std::fs;
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        write_file(&tmp.path().join("files/kept"), 40);
        write_file(&tmp.path().join("locked/hidden"), 1000);
        std::os::unix::fs::symlink(tmp.path().join("files"), tmp.path().join("link")).unwrap();
        let locked = tmp.path().join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        // root ignores directory permissions
        let locked_readable = fs::read_dir(&locked).is_ok();

        let est = estimate_directory_size(tmp.path(), far_deadline(), 1_000);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let est = est.unwrap();
        assert_eq!(est.stopped, None);
        if locked_readable {
            assert_eq!(est.size_bytes, 1040);
        } else {
            assert_eq!(est.size_bytes, 40);
            assert_eq!(est.files, 1);
        }
    }

    #[test]
    fn test_fixed_trash_locator() {
        let locator = FixedTrashLocator(vec![PathBuf::from("/a"), PathBuf::from("/b")]);
        assert_eq!(locator.trash_paths().len(), 2);
    }
}
