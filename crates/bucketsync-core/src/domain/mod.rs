//! Domain entities and business logic
//!
//! This module contains the core domain types for bucketsync:
//! - Newtypes for bucket names, key prefixes, object keys and relative paths
//! - File records produced by the discoverer
//! - Exclude pattern sets
//! - Per-run settings
//! - Per-file outcomes and the run report
//! - Domain-specific error types

pub mod errors;
pub mod exclude;
pub mod file_record;
pub mod newtypes;
pub mod outcome;
pub mod settings;

// Re-export commonly used types
pub use errors::DomainError;
pub use exclude::ExcludeSet;
pub use file_record::{FileInfo, FileRecord};
pub use newtypes::*;
pub use outcome::{DeleteStatus, FileOutcome, SyncReport, MAX_RETAINED_FAILURES};
pub use settings::SyncSettings;
