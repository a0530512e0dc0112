//! Domain error types
//!
//! This module defines error types specific to domain operations,
//! including path and key validation and pattern compilation failures.

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid path format or content
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Path is not within the source root being walked
    #[error("Path not within source root: {0}")]
    PathNotInRoot(String),

    /// Bucket name is empty or malformed
    #[error("Invalid bucket name: {0:?}")]
    InvalidBucket(String),

    /// An exclude pattern failed to compile
    #[error("Invalid exclude pattern {pattern:?}: {reason}")]
    InvalidPattern {
        /// The pattern as given on the command line
        pattern: String,
        /// Compiler message from the regex engine
        reason: String,
    },

    /// Unknown access policy name
    #[error("Invalid access policy: {0}")]
    InvalidAccessPolicy(String),

    /// Unknown server-side encryption algorithm
    #[error("Invalid server-side encryption: {0}")]
    InvalidEncryption(String),
}
