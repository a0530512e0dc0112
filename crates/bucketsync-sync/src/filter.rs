//! Exclude filter applied between discovery and upload

use std::sync::Arc;

use bucketsync_core::domain::{FileRecord, SyncSettings};
use tracing::info;

/// Whether a record continues to the uploader
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterDecision {
    Pass,
    /// Dropped; `pattern` is the first exclude pattern that matched
    Skip { pattern: String },
}

/// Matches each record's relative path against the run's exclude set
#[derive(Debug, Clone)]
pub struct ExcludeFilter {
    settings: Arc<SyncSettings>,
}

impl ExcludeFilter {
    pub fn new(settings: Arc<SyncSettings>) -> Self {
        Self { settings }
    }

    /// Decides pass or skip for one record, logging skips in verbose mode
    pub fn evaluate(&self, record: &FileRecord) -> FilterDecision {
        let path = record.relative_path().as_str();
        match self.settings.excludes().first_match(path) {
            None => FilterDecision::Pass,
            Some(pattern) => {
                if self.settings.verbose() {
                    info!(path, pattern = pattern.as_str(), "Skipping excluded file");
                }
                FilterDecision::Skip {
                    pattern: pattern.as_str().to_string(),
                }
            }
        }
    }
}
