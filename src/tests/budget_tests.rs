#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use crate::analysis::budget::{clean_path, ScanConfig, ScanDefaults};
    use crate::error::AnalysisError;
    use crate::types::AnalyzeRequest;

    #[test]
    fn test_defaults_applied_for_missing_fields() {
        let cfg = ScanConfig::resolve(&AnalyzeRequest::for_path("/srv/data")).unwrap();
        assert_eq!(cfg.root, PathBuf::from("/srv/data"));
        assert_eq!(cfg.max_depth, 6);
        assert_eq!(cfg.top_files, 50);
        assert_eq!(cfg.top_dirs, 30);
        assert_eq!(cfg.max_entries, 200_000);
        assert_eq!(cfg.timeout_seconds, 20);
        assert!(!cfg.follow_symlinks);
    }

    #[test]
    fn test_values_clamped_low() {
        let req = AnalyzeRequest {
            path: Some("/srv".into()),
            max_depth: Some(0),
            top_files: Some(-5),
            top_dirs: Some(0),
            max_entries: Some(10),
            timeout_seconds: Some(1),
            follow_symlinks: Some(true),
        };
        let cfg = ScanConfig::resolve(&req).unwrap();
        assert_eq!(cfg.max_depth, 1);
        assert_eq!(cfg.top_files, 1);
        assert_eq!(cfg.top_dirs, 1);
        assert_eq!(cfg.max_entries, 1_000);
        assert_eq!(cfg.timeout_seconds, 5);
        assert!(cfg.follow_symlinks);
    }

    #[test]
    fn test_values_clamped_high() {
        let req = AnalyzeRequest {
            path: Some("/srv".into()),
            max_depth: Some(99),
            top_files: Some(10_000),
            top_dirs: Some(1_000),
            max_entries: Some(5_000_000),
            timeout_seconds: Some(999),
            follow_symlinks: None,
        };
        let cfg = ScanConfig::resolve(&req).unwrap();
        assert_eq!(cfg.max_depth, 12);
        assert_eq!(cfg.top_files, 500);
        assert_eq!(cfg.top_dirs, 200);
        assert_eq!(cfg.max_entries, 1_000_000);
        assert_eq!(cfg.timeout_seconds, 120);
    }

    #[test]
    fn test_configured_defaults_are_used() {
        let defaults = ScanDefaults { max_depth: 3, timeout_seconds: 60, follow_symlinks: true, ..Default::default() };
        let cfg = ScanConfig::resolve_with(&AnalyzeRequest::for_path("/srv"), &defaults).unwrap();
        assert_eq!(cfg.max_depth, 3);
        assert_eq!(cfg.timeout_seconds, 60);
        assert!(cfg.follow_symlinks);
        assert_eq!(cfg.top_files, 50);
    }

    #[test]
    fn test_missing_or_blank_path_rejected() {
        assert!(matches!(ScanConfig::resolve(&AnalyzeRequest::default()), Err(AnalysisError::MissingPath)));
        assert!(matches!(ScanConfig::resolve(&AnalyzeRequest::for_path("   ")), Err(AnalysisError::MissingPath)));
    }

    #[test]
    fn test_nul_in_path_rejected() {
        let err = ScanConfig::resolve(&AnalyzeRequest::for_path("/srv/\0evil")).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidPath(_)));
        assert_eq!(err.to_string(), "invalid path: path contains null characters");
    }

    #[test]
    fn test_clean_path() {
        assert_eq!(clean_path(Path::new("/data/./a/")), PathBuf::from("/data/a"));
        assert_eq!(clean_path(Path::new("./")), PathBuf::from("."));
        assert_eq!(clean_path(Path::new("relative/dir")), PathBuf::from("relative/dir"));
        assert_eq!(clean_path(Path::new("/data/tmp/../home")), PathBuf::from("/data/home"));
        assert_eq!(clean_path(Path::new("/data/a/b/../../c/")), PathBuf::from("/data/c"));
        assert_eq!(clean_path(Path::new("/../etc")), PathBuf::from("/etc"));
        assert_eq!(clean_path(Path::new("../up/./x")), PathBuf::from("../up/x"));
        assert_eq!(clean_path(Path::new("a/../../b")), PathBuf::from("../b"));
        assert_eq!(clean_path(Path::new("a/..")), PathBuf::from("."));
    }

    #[test]
    fn test_resolved_root_has_no_parent_components() {
        let cfg = ScanConfig::resolve(&AnalyzeRequest::for_path("/srv/tmp/../home/./docs")).unwrap();
        assert_eq!(cfg.root, PathBuf::from("/srv/home/docs"));
    }

    #[test]
    fn test_trash_budget_is_half_of_entries() {
        let cfg = ScanConfig::resolve(&AnalyzeRequest::for_path("/srv")).unwrap();
        assert_eq!(cfg.trash_entry_budget(), 100_000);
        assert_eq!(cfg.timeout().as_secs(), 20);
    }
}
