//! bucketsync Sync - one-way directory to bucket pipeline
//!
//! Provides:
//! - Streaming discovery of every regular file under a source root
//! - Regex exclusion applied inline between discovery and transfer
//! - Sequential upload with optional source deletion (move semantics)
//! - Dry-run planning with no writes or deletes
//!
//! ## Modules
//!
//! - [`discovery`] - Directory walker feeding the first bounded queue
//! - [`filter`] - Exclude-pattern decision for each record
//! - [`uploader`] - Consumer writing records to an [`IObjectStore`]
//! - [`pipeline`] - Coordinator wiring the stages, cancellation and the run report
//!
//! [`IObjectStore`]: bucketsync_core::ports::IObjectStore

pub mod discovery;
pub mod filter;
pub mod pipeline;
pub mod uploader;

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a sync run
///
/// Per-file problems never surface here; they are reported as
/// [`FileOutcome`](bucketsync_core::domain::FileOutcome) values.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The source root could not be walked at all
    #[error("Cannot access source {}: {source}", path.display())]
    SourceAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A pipeline task panicked or was aborted
    #[error("Pipeline task failed: {0}")]
    TaskFailed(String),

    /// A domain-level error propagated from bucketsync-core
    #[error("Domain error: {0}")]
    Domain(#[from] bucketsync_core::domain::errors::DomainError),
}
