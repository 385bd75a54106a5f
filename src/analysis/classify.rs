//! Per-file heuristics. All matching happens on a normalized path (forward
//! slashes, lower case) so the same tables work on every platform.

use std::time::SystemTime;

use crate::types::CleanupCategory;

pub const UNROTATED_LOG_MIN_BYTES: u64 = 100 * 1024 * 1024;
pub const OLD_DOWNLOAD_AGE: std::time::Duration = std::time::Duration::from_secs(30 * 24 * 60 * 60);

const TEMP_FRAGMENTS: &[&str] = &["/tmp/", "/windows/temp/", "/appdata/local/temp/", "/var/tmp/"];

const BROWSER_CACHE_FRAGMENTS: &[&str] = &[
    "/google/chrome/user data/",
    "/mozilla/firefox/",
    "/library/caches/com.apple.safari/",
    "/library/caches/",
    "/.cache/",
    "/edge/user data/",
];

const PACKAGE_CACHE_FRAGMENTS: &[&str] = &[
    "/var/cache/apt/",
    "/var/cache/dnf/",
    "/var/cache/yum/",
    "/library/caches/homebrew/",
    "/appdata/local/packages/",
];

pub fn normalize_path_for_checks(path: &str) -> String {
    path.replace('\\', "/").to_lowercase()
}

/// Maps a path onto a cleanup category. Groups are tried in order, so
/// `/library/caches/homebrew/...` lands in `browser_cache` through the generic
/// `/library/caches/` fragment before the package table is consulted.
pub fn classify_cleanup_category(path: &str) -> Option<CleanupCategory> {
    let n = normalize_path_for_checks(path);
    let contains_any = |fragments: &[&str]| fragments.iter().any(|f| n.contains(f));

    if contains_any(TEMP_FRAGMENTS) || n.ends_with("/tmp") {
        Some(CleanupCategory::TempFiles)
    } else if contains_any(BROWSER_CACHE_FRAGMENTS) {
        Some(CleanupCategory::BrowserCache)
    } else if contains_any(PACKAGE_CACHE_FRAGMENTS) {
        Some(CleanupCategory::PackageCache)
    } else {
        None
    }
}

pub fn is_old_download(path: &str, modified: SystemTime, threshold: SystemTime) -> bool {
    if modified > threshold {
        return false;
    }
    let n = normalize_path_for_checks(path);
    n.contains("/downloads/") || n.ends_with("/downloads")
}

pub fn is_unrotated_log(path: &str, size: u64) -> bool {
    size >= UNROTATED_LOG_MIN_BYTES && normalize_path_for_checks(path).ends_with(".log")
}

/// `"Report (copy).PDF"` and `"report - Copy.pdf"` both become `"report.pdf"`.
pub fn normalize_duplicate_name(name: &str) -> String {
    name.trim().to_lowercase().replace(" (copy)", "").replace(" - copy", "")
}

/// Composite grouping key, or `None` when the file cannot take part.
pub fn duplicate_key(file_name: &str, size: u64) -> Option<(u64, String)> {
    let base = normalize_duplicate_name(file_name);
    if base.is_empty() || size == 0 {
        return None;
    }
    Some((size, base))
}
