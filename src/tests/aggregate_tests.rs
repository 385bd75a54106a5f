#[cfg(test)]
mod tests {
    use std::path::Path;

    use crate::analysis::aggregate::DirectoryAggregates;

    fn totals(aggs: &[crate::analysis::aggregate::DirectoryAggregate], path: &str) -> (u64, u64) {
        let agg = aggs.iter().find(|a| a.path == Path::new(path)).unwrap();
        (agg.size_bytes, agg.file_count)
    }

    #[test]
    fn test_roll_up_produces_cumulative_totals() {
        let mut aggs = DirectoryAggregates::with_root(Path::new("/r"));
        aggs.register(Path::new("/r/a"), Some(Path::new("/r")), 1);
        aggs.register(Path::new("/r/a/b"), Some(Path::new("/r/a")), 2);
        aggs.register(Path::new("/r/c"), Some(Path::new("/r")), 1);
        aggs.add_file(Path::new("/r"), 1);
        aggs.add_file(Path::new("/r/a"), 10);
        aggs.add_file(Path::new("/r/a/b"), 100);
        aggs.add_file(Path::new("/r/a/b"), 100);
        aggs.add_file(Path::new("/r/c"), 1000);

        let rolled = aggs.roll_up();
        assert_eq!(totals(&rolled, "/r"), (1211, 5));
        assert_eq!(totals(&rolled, "/r/a"), (210, 3));
        assert_eq!(totals(&rolled, "/r/a/b"), (200, 2));
        assert_eq!(totals(&rolled, "/r/c"), (1000, 1));
    }

    #[test]
    fn test_roll_up_keeps_discovery_order() {
        let mut aggs = DirectoryAggregates::with_root(Path::new("/r"));
        aggs.register(Path::new("/r/z"), Some(Path::new("/r")), 1);
        aggs.register(Path::new("/r/a"), Some(Path::new("/r")), 1);
        let order: Vec<_> = aggs.roll_up().into_iter().map(|a| a.path).collect();
        assert_eq!(order, vec![Path::new("/r").to_path_buf(), "/r/z".into(), "/r/a".into()]);
    }

    #[test]
    fn test_contribution_without_registered_parent_is_dropped() {
        let mut aggs = DirectoryAggregates::with_root(Path::new("/r"));
        aggs.register(Path::new("/elsewhere/x"), Some(Path::new("/elsewhere")), 1);
        aggs.add_file(Path::new("/elsewhere/x"), 500);
        aggs.add_file(Path::new("/r"), 5);

        let rolled = aggs.roll_up();
        assert_eq!(totals(&rolled, "/r"), (5, 1));
        assert_eq!(totals(&rolled, "/elsewhere/x"), (500, 1));
    }

    #[test]
    fn test_register_is_first_discovery_wins() {
        let mut aggs = DirectoryAggregates::with_root(Path::new("/r"));
        aggs.register(Path::new("/r/a"), Some(Path::new("/r")), 1);
        aggs.register(Path::new("/r/a"), Some(Path::new("/other")), 7);
        assert_eq!(aggs.len(), 2);
        let a = aggs.get(Path::new("/r/a")).unwrap();
        assert_eq!(a.depth, 1);
        assert_eq!(a.parent.as_deref(), Some(Path::new("/r")));
    }

    #[test]
    fn test_files_for_unknown_directory_are_ignored() {
        let mut aggs = DirectoryAggregates::with_root(Path::new("/r"));
        aggs.add_file(Path::new("/nowhere"), 99);
        assert_eq!(totals(&aggs.roll_up(), "/r"), (0, 0));
    }
}
