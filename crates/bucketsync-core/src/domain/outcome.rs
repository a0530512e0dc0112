//! Per-file outcomes and the per-run report
//!
//! The uploader returns a [`FileOutcome`] for every record it handles; the
//! pipeline folds those into a [`SyncReport`]. At most
//! [`MAX_RETAINED_FAILURES`] failures are kept as text; the rest are only
//! counted, so the report stays the same size however many files fail.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::newtypes::{ObjectKey, RelativePath};

/// Failure lines kept verbatim in a [`SyncReport`]
pub const MAX_RETAINED_FAILURES: usize = 20;

/// Result of deleting the source after a successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteStatus {
    /// The source file was removed
    Deleted,
    /// Removal failed; the upload still counts as successful
    Failed(String),
}

/// Terminal state of one file that passed the filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// The object was written. `delete` is `None` when source deletion is disabled.
    Uploaded {
        key: ObjectKey,
        delete: Option<DeleteStatus>,
    },
    /// Dry run: everything was decided, nothing was opened, written or deleted
    Planned { key: ObjectKey, content_type: String },
    /// The source could not be opened at transfer time
    OpenFailed { reason: String },
    /// The storage write failed; the source was left in place
    TransferFailed { key: ObjectKey, reason: String },
}

/// Summary of a completed (or cancelled) sync run
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// Wall-clock duration of the run in milliseconds
    pub duration_ms: u64,
    /// Regular files found under the source root
    pub discovered: u64,
    /// Files dropped by an exclude pattern
    pub skipped: u64,
    /// Files written to the bucket
    pub uploaded: u64,
    /// Files that would have been written (dry run)
    pub planned: u64,
    /// Source files removed after upload
    pub deleted: u64,
    /// Source files that could not be removed after upload
    pub delete_failures: u64,
    /// Files that could not be opened for reading
    pub open_failures: u64,
    /// Files whose storage write failed
    pub transfer_failures: u64,
    /// Directory entries that could not be read during the walk
    pub walk_errors: u64,
    /// Whether the run was cut short by a shutdown signal
    pub cancelled: bool,
    /// Diagnostic lines for the first [`MAX_RETAINED_FAILURES`] failed files
    pub failures: Vec<String>,
    /// Failed files beyond the retained lines
    pub failures_omitted: u64,
}

impl SyncReport {
    /// Creates an empty report stamped with the current time
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            duration_ms: 0,
            discovered: 0,
            skipped: 0,
            uploaded: 0,
            planned: 0,
            deleted: 0,
            delete_failures: 0,
            open_failures: 0,
            transfer_failures: 0,
            walk_errors: 0,
            cancelled: false,
            failures: Vec::new(),
            failures_omitted: 0,
        }
    }

    /// Folds the outcome of one file into the counters
    pub fn record(&mut self, path: &RelativePath, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Uploaded { delete, .. } => {
                self.uploaded += 1;
                match delete {
                    Some(DeleteStatus::Deleted) => self.deleted += 1,
                    Some(DeleteStatus::Failed(reason)) => {
                        self.delete_failures += 1;
                        self.note_failure(format!("Failed to delete {path}: {reason}"));
                    }
                    None => {}
                }
            }
            FileOutcome::Planned { .. } => self.planned += 1,
            FileOutcome::OpenFailed { reason } => {
                self.open_failures += 1;
                self.note_failure(format!("Failed to open {path}: {reason}"));
            }
            FileOutcome::TransferFailed { reason, .. } => {
                self.transfer_failures += 1;
                self.note_failure(format!("Failed to transfer {path}: {reason}"));
            }
        }
    }

    fn note_failure(&mut self, line: String) {
        if self.failures.len() < MAX_RETAINED_FAILURES {
            self.failures.push(line);
        } else {
            self.failures_omitted += 1;
        }
    }

    /// Total number of per-file and per-entry problems
    pub fn failure_count(&self) -> u64 {
        self.open_failures + self.transfer_failures + self.delete_failures + self.walk_errors
    }

    /// Returns true if anything went wrong during the run
    pub fn has_failures(&self) -> bool {
        self.failure_count() > 0
    }
}

impl Default for SyncReport {
    fn default() -> Self {
        Self::new()
    }
}
