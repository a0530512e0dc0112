//! Per-run sync settings
//!
//! [`SyncSettings`] is built once from command-line input and shared
//! read-only with every pipeline stage for the duration of a run.

use super::exclude::ExcludeSet;

/// Read-only configuration of a single sync run
#[derive(Debug, Clone, Default)]
pub struct SyncSettings {
    delete_source: bool,
    excludes: ExcludeSet,
    dry_run: bool,
    verbose: bool,
}

impl SyncSettings {
    /// Creates the settings for a run
    ///
    /// A dry run always implies verbose output.
    pub fn new(delete_source: bool, excludes: ExcludeSet, dry_run: bool, verbose: bool) -> Self {
        Self {
            delete_source,
            excludes,
            dry_run,
            verbose: verbose || dry_run,
        }
    }

    /// Delete each source file after its upload succeeded (move semantics)
    pub fn delete_source(&self) -> bool {
        self.delete_source
    }

    /// Patterns whose matches are never uploaded
    pub fn excludes(&self) -> &ExcludeSet {
        &self.excludes
    }

    /// Decide and log everything, but never write or delete
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Log the per-file source to destination mapping and skipped files
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Whether a source file may be deleted after a successful write
    pub fn should_delete_after_upload(&self) -> bool {
        self.delete_source && !self.dry_run
    }
}
