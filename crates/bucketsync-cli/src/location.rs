//! Source and destination arguments
//!
//! The source is a local directory, given as a path or a `file://` URL
//! without a host. The destination is `s3://bucket/prefix`; its host names
//! the bucket and its path becomes the key prefix.

use std::fmt;
use std::path::{Path, PathBuf};

use bucketsync_core::domain::{BucketName, DomainError, KeyPrefix};
use thiserror::Error;
use url::Url;

/// Errors in the SOURCE or DEST arguments
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocationError {
    #[error("Unsupported source scheme '{0}': expected a local path or file:// URL")]
    UnsupportedSourceScheme(String),

    #[error("file:// URLs must not name a host, got '{0}'")]
    FileHostNotAllowed(String),

    #[error("Unsupported destination scheme '{0}': expected s3://bucket/prefix")]
    UnsupportedDestinationScheme(String),

    #[error("Destination '{0}' does not name a bucket")]
    MissingBucket(String),

    #[error("Invalid URL '{input}': {reason}")]
    InvalidUrl { input: String, reason: String },

    #[error("Cannot resolve relative source path: {0}")]
    CurrentDir(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

// ============================================================================
// Source
// ============================================================================

/// Absolute local directory to sync from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    root: PathBuf,
}

impl SourceLocation {
    /// Parses a path or `file://` URL; relative paths resolve against the
    /// current directory
    pub fn parse(input: &str) -> Result<Self, LocationError> {
        let path = if input.contains("://") || input.starts_with("file:") {
            let url = Url::parse(input).map_err(|e| LocationError::InvalidUrl {
                input: input.to_string(),
                reason: e.to_string(),
            })?;
            if url.scheme() != "file" {
                return Err(LocationError::UnsupportedSourceScheme(
                    url.scheme().to_string(),
                ));
            }
            if let Some(host) = url.host_str().filter(|h| !h.is_empty()) {
                return Err(LocationError::FileHostNotAllowed(host.to_string()));
            }
            url.to_file_path().map_err(|()| LocationError::InvalidUrl {
                input: input.to_string(),
                reason: "not a local file path".into(),
            })?
        } else {
            PathBuf::from(input)
        };

        let absolute = if path.is_absolute() {
            path
        } else {
            std::env::current_dir()
                .map_err(|e| LocationError::CurrentDir(e.to_string()))?
                .join(path)
        };

        Ok(Self {
            root: absolute.components().collect(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn into_root(self) -> PathBuf {
        self.root
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file://{}", self.root.display())
    }
}

// ============================================================================
// Destination
// ============================================================================

/// Bucket and normalized key prefix to sync into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationLocation {
    bucket: BucketName,
    prefix: KeyPrefix,
}

impl DestinationLocation {
    pub fn parse(input: &str) -> Result<Self, LocationError> {
        let url = Url::parse(input).map_err(|e| match e {
            url::ParseError::RelativeUrlWithoutBase => {
                LocationError::UnsupportedDestinationScheme(String::new())
            }
            other => LocationError::InvalidUrl {
                input: input.to_string(),
                reason: other.to_string(),
            },
        })?;

        match url.scheme() {
            "s3" => {}
            "file" => {
                return Err(match url.host_str().filter(|h| !h.is_empty()) {
                    Some(host) => LocationError::FileHostNotAllowed(host.to_string()),
                    None => LocationError::UnsupportedDestinationScheme("file".into()),
                })
            }
            other => return Err(LocationError::UnsupportedDestinationScheme(other.into())),
        }

        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| LocationError::MissingBucket(input.to_string()))?;
        let bucket = BucketName::new(host)?;

        let path = urlencoding::decode(url.path()).map_err(|e| LocationError::InvalidUrl {
            input: input.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            bucket,
            prefix: KeyPrefix::normalize(&path),
        })
    }

    pub fn bucket(&self) -> &BucketName {
        &self.bucket
    }

    pub fn prefix(&self) -> &KeyPrefix {
        &self.prefix
    }

    pub fn into_parts(self) -> (BucketName, KeyPrefix) {
        (self.bucket, self.prefix)
    }
}

impl fmt::Display for DestinationLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_plain_absolute_path() {
        let source = SourceLocation::parse("/var/data/").unwrap();
        assert_eq!(source.root(), Path::new("/var/data"));
        assert_eq!(source.to_string(), "file:///var/data");
    }

    #[test]
    fn test_source_file_url() {
        let source = SourceLocation::parse("file:///var/my%20data").unwrap();
        assert_eq!(source.root(), Path::new("/var/my data"));
    }

    #[test]
    fn test_source_relative_path_is_absolutized() {
        let source = SourceLocation::parse("some/dir").unwrap();
        assert!(source.root().is_absolute());
        assert!(source.root().ends_with("some/dir"));
    }

    #[test]
    fn test_source_rejects_other_schemes() {
        assert_eq!(
            SourceLocation::parse("s3://bucket/x"),
            Err(LocationError::UnsupportedSourceScheme("s3".into()))
        );
        assert_eq!(
            SourceLocation::parse("http://example.com/x"),
            Err(LocationError::UnsupportedSourceScheme("http".into()))
        );
    }

    #[test]
    fn test_source_rejects_file_host() {
        assert_eq!(
            SourceLocation::parse("file://server/share"),
            Err(LocationError::FileHostNotAllowed("server".into()))
        );
    }

    #[test]
    fn test_destination_with_prefix() {
        let dest = DestinationLocation::parse("s3://my-bucket/data").unwrap();
        assert_eq!(dest.bucket().as_str(), "my-bucket");
        assert_eq!(dest.prefix().as_str(), "data/");
        assert_eq!(dest.to_string(), "s3://my-bucket/data/");
    }

    #[test]
    fn test_destination_prefix_normalization() {
        for (input, prefix) in [
            ("s3://b", ""),
            ("s3://b/", ""),
            ("s3://b/a/b/", "a/b/"),
            ("s3://b/my%20dir", "my dir/"),
        ] {
            let dest = DestinationLocation::parse(input).unwrap();
            assert_eq!(dest.prefix().as_str(), prefix, "input={input}");
        }
    }

    #[test]
    fn test_destination_rejects_other_schemes() {
        assert_eq!(
            DestinationLocation::parse("gs://bucket/x"),
            Err(LocationError::UnsupportedDestinationScheme("gs".into()))
        );
        assert_eq!(
            DestinationLocation::parse("bucket/x"),
            Err(LocationError::UnsupportedDestinationScheme(String::new()))
        );
        assert_eq!(
            DestinationLocation::parse("file:///tmp/out"),
            Err(LocationError::UnsupportedDestinationScheme("file".into()))
        );
    }

    #[test]
    fn test_destination_file_with_host() {
        assert_eq!(
            DestinationLocation::parse("file://host/tmp"),
            Err(LocationError::FileHostNotAllowed("host".into()))
        );
    }

    #[test]
    fn test_destination_requires_bucket() {
        assert!(matches!(
            DestinationLocation::parse("s3:///prefix"),
            Err(LocationError::MissingBucket(_))
        ));
        assert!(matches!(
            DestinationLocation::parse("s3:prefix"),
            Err(LocationError::MissingBucket(_))
        ));
    }
}
