//! Object store port (driven/secondary port)
//!
//! This module defines the interface the uploader uses to write objects.
//! The primary implementation targets Amazon S3, but anything that can
//! store a byte stream under a bucket/key pair fits behind it.
//!
//! ## Design Notes
//!
//! - Returns `anyhow::Result`; the uploader turns any error into a
//!   `FileOutcome::TransferFailed` carrying its rendered chain.
//! - The request names the source by path. The store reads it from the
//!   start on every attempt, so a failed write can be re-sent.

use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::newtypes::{BucketName, ObjectKey};

// ============================================================================
// AccessPolicy
// ============================================================================

/// Canned access control applied to every written object
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessPolicy {
    /// Only the bucket owner has access
    #[default]
    Private,
    /// Anyone may read the object
    PublicRead,
    /// Any authenticated principal may read the object
    AuthenticatedRead,
    /// Object writer and bucket owner both get full control
    BucketOwnerFullControl,
}

impl AccessPolicy {
    /// Wire value of the `x-amz-acl` header
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessPolicy::Private => "private",
            AccessPolicy::PublicRead => "public-read",
            AccessPolicy::AuthenticatedRead => "authenticated-read",
            AccessPolicy::BucketOwnerFullControl => "bucket-owner-full-control",
        }
    }
}

impl Display for AccessPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private" => Ok(AccessPolicy::Private),
            "public-read" => Ok(AccessPolicy::PublicRead),
            "authenticated-read" => Ok(AccessPolicy::AuthenticatedRead),
            "bucket-owner-full-control" => Ok(AccessPolicy::BucketOwnerFullControl),
            other => Err(DomainError::InvalidAccessPolicy(other.to_string())),
        }
    }
}

// ============================================================================
// ServerSideEncryption
// ============================================================================

/// Server-side encryption requested for every written object
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServerSideEncryption {
    /// Storage-managed keys (`AES256`)
    #[default]
    #[serde(rename = "AES256")]
    Aes256,
    /// KMS-managed keys (`aws:kms`)
    #[serde(rename = "aws:kms")]
    AwsKms,
}

impl ServerSideEncryption {
    /// Wire value of the `x-amz-server-side-encryption` header
    pub fn as_str(&self) -> &'static str {
        match self {
            ServerSideEncryption::Aes256 => "AES256",
            ServerSideEncryption::AwsKms => "aws:kms",
        }
    }
}

impl Display for ServerSideEncryption {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServerSideEncryption {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AES256" => Ok(ServerSideEncryption::Aes256),
            "aws:kms" => Ok(ServerSideEncryption::AwsKms),
            other => Err(DomainError::InvalidEncryption(other.to_string())),
        }
    }
}

// ============================================================================
// PutObjectRequest
// ============================================================================

/// Everything needed to write one object
///
/// `content_length` must equal the size of `source`; a mismatch is a
/// caller error and is left to the store to reject.
#[derive(Debug, Clone)]
pub struct PutObjectRequest {
    pub bucket: BucketName,
    pub key: ObjectKey,
    /// Absolute path of the local file holding the object body
    pub source: PathBuf,
    pub content_length: u64,
    pub content_type: String,
    pub access_policy: AccessPolicy,
    pub server_side_encryption: Option<ServerSideEncryption>,
}

// ============================================================================
// IObjectStore trait
// ============================================================================

/// Port trait for object storage writes
///
/// ## Implementation Notes
///
/// - Authentication, request signing, transport-level retries and request
///   timeouts are the implementation's concern.
/// - The pipeline calls this from a single task, but implementations must
///   be `Send + Sync` so the store can be shared behind an `Arc`.
#[async_trait::async_trait]
pub trait IObjectStore: Send + Sync {
    /// Writes the request body under `bucket/key`
    ///
    /// # Errors
    /// Returns an error if the object could not be stored (network, auth,
    /// quota, length mismatch, ...)
    async fn put_object(&self, request: PutObjectRequest) -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_policy_roundtrip() {
        for policy in [
            AccessPolicy::Private,
            AccessPolicy::PublicRead,
            AccessPolicy::AuthenticatedRead,
            AccessPolicy::BucketOwnerFullControl,
        ] {
            assert_eq!(policy.as_str().parse::<AccessPolicy>().unwrap(), policy);
        }
        assert!("world-writable".parse::<AccessPolicy>().is_err());
    }

    #[test]
    fn test_defaults_match_fixed_headers() {
        assert_eq!(AccessPolicy::default().as_str(), "private");
        assert_eq!(ServerSideEncryption::default().as_str(), "AES256");
    }

    #[test]
    fn test_encryption_parse() {
        assert_eq!(
            "aws:kms".parse::<ServerSideEncryption>().unwrap(),
            ServerSideEncryption::AwsKms
        );
        assert!("aes".parse::<ServerSideEncryption>().is_err());
    }

    #[test]
    fn test_serde_names() {
        let policy: AccessPolicy = serde_yaml::from_str("public-read").unwrap();
        assert_eq!(policy, AccessPolicy::PublicRead);
        let sse: ServerSideEncryption = serde_yaml::from_str("AES256").unwrap();
        assert_eq!(sse, ServerSideEncryption::Aes256);
    }
}
