use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Raw analysis request as it arrives from the dispatch layer.
///
/// Every numeric field is optional and untrusted; [`crate::analysis::ScanConfig::resolve`]
/// turns this into a clamped configuration before the engine sees it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub path: Option<String>,
    pub max_depth: Option<i64>,
    pub top_files: Option<i64>,
    pub top_dirs: Option<i64>,
    pub max_entries: Option<i64>,
    pub timeout_seconds: Option<i64>,
    pub follow_symlinks: Option<bool>,
}

impl AnalyzeRequest {
    pub fn for_path(path: impl Into<String>) -> Self {
        Self { path: Some(path.into()), ..Default::default() }
    }
}

// Declared in name order: ties in the temp accumulation list sort by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanupCategory {
    BrowserCache,
    PackageCache,
    TempFiles,
    Trash,
}

impl CleanupCategory {
    pub const SAFE: [CleanupCategory; 4] = [
        CleanupCategory::TempFiles,
        CleanupCategory::BrowserCache,
        CleanupCategory::PackageCache,
        CleanupCategory::Trash,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LargestFile {
    pub path: String,
    pub size_bytes: u64,
    pub modified_at: String,
    pub owner: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LargestDirectory {
    pub path: String,
    pub size_bytes: u64,
    pub file_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TempAccumulation {
    pub category: CleanupCategory,
    pub bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OldDownload {
    pub path: String,
    pub size_bytes: u64,
    pub modified_at: String,
    pub owner: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnrotatedLog {
    pub path: String,
    pub size_bytes: u64,
    pub modified_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrashUsage {
    pub path: String,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateCandidate {
    pub key: String,
    pub size_bytes: u64,
    pub count: usize,
    pub paths: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupCandidate {
    pub path: String,
    pub category: CleanupCategory,
    pub size_bytes: u64,
    pub safe: bool,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanErrorEntry {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSummary {
    pub files_scanned: u64,
    pub dirs_scanned: u64,
    pub bytes_scanned: u64,
    pub max_depth_reached: u32,
    pub permission_denied_count: u64,
}

/// The assembled report of one analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub path: String,
    pub started_at: String,
    pub completed_at: String,
    pub duration_ms: u64,
    pub partial: bool,
    pub reason: String,
    pub summary: ScanSummary,
    pub top_largest_files: Vec<LargestFile>,
    pub top_largest_directories: Vec<LargestDirectory>,
    pub temp_accumulation: Vec<TempAccumulation>,
    pub old_downloads: Vec<OldDownload>,
    pub unrotated_logs: Vec<UnrotatedLog>,
    pub trash_usage: Vec<TrashUsage>,
    pub duplicate_candidates: Vec<DuplicateCandidate>,
    pub cleanup_candidates: Vec<CleanupCandidate>,
    pub errors: Vec<ScanErrorEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandStatus {
    Completed,
    Failed,
}

/// Response envelope handed back to the dispatch layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult {
    pub status: CommandStatus,
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<ScanResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommandResult {
    pub fn completed(result: ScanResult, duration_ms: u64) -> Self {
        Self { status: CommandStatus::Completed, duration_ms, result: Some(result), error: None }
    }

    pub fn failed(message: impl Into<String>, duration_ms: u64) -> Self {
        Self { status: CommandStatus::Failed, duration_ms, result: None, error: Some(message.into()) }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub snapshot_id: Option<Uuid>,
    #[serde(flatten)]
    pub command: CommandResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotDto {
    pub id: Uuid,
    pub root_path: String,
    pub trigger: String,
    pub partial: bool,
    pub captured_at: String,
    pub summary: ScanSummary,
    pub result: ScanResult,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupPreviewRequest {
    pub categories: Option<Vec<CleanupCategory>>,
    pub snapshot_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryEstimate {
    pub category: CleanupCategory,
    pub count: usize,
    pub estimated_bytes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupPreview {
    pub snapshot_id: Uuid,
    pub estimated_bytes: u64,
    pub candidate_count: usize,
    pub categories: Vec<CategoryEstimate>,
    pub candidates: Vec<CleanupCandidate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupPreviewResponse {
    pub cleanup_run_id: Uuid,
    #[serde(flatten)]
    pub preview: CleanupPreview,
}
