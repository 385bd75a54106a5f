//! Read-only cleanup preview built from a stored snapshot.
//!
//! Nothing here touches the filesystem; the preview only estimates what a
//! cleanup of the selected categories would reclaim.

use std::collections::HashMap;

use uuid::Uuid;

use crate::types::{CategoryEstimate, CleanupCandidate, CleanupCategory, CleanupPreview};

/// Builds the preview for `candidates`. An empty or missing category filter
/// selects every safe category.
pub fn build_cleanup_preview(
    snapshot_id: Uuid,
    candidates: &[CleanupCandidate],
    categories: Option<&[CleanupCategory]>,
) -> CleanupPreview {
    let requested = categories.filter(|c| !c.is_empty());

    let mut deduped: Vec<CleanupCandidate> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for candidate in candidates {
        if !candidate.safe || !CleanupCategory::SAFE.contains(&candidate.category) {
            continue;
        }
        if requested.is_some_and(|r| !r.contains(&candidate.category)) {
            continue;
        }
        match index.get(candidate.path.as_str()) {
            Some(&idx) => {
                if candidate.size_bytes > deduped[idx].size_bytes {
                    deduped[idx] = candidate.clone();
                }
            }
            None => {
                index.insert(candidate.path.as_str(), deduped.len());
                deduped.push(candidate.clone());
            }
        }
    }

    deduped.sort_by(|a, b| b.size_bytes.cmp(&a.size_bytes));
    let estimated_bytes = deduped.iter().map(|c| c.size_bytes).sum();

    let mut breakdown: Vec<CategoryEstimate> = Vec::new();
    for candidate in &deduped {
        match breakdown.iter_mut().find(|e| e.category == candidate.category) {
            Some(entry) => {
                entry.count += 1;
                entry.estimated_bytes += candidate.size_bytes;
            }
            None => breakdown.push(CategoryEstimate {
                category: candidate.category,
                count: 1,
                estimated_bytes: candidate.size_bytes,
            }),
        }
    }

    CleanupPreview {
        snapshot_id,
        estimated_bytes,
        candidate_count: deduped.len(),
        categories: breakdown,
        candidates: deduped,
    }
}
