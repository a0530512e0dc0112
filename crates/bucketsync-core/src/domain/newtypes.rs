//! Domain newtypes with validation
//!
//! This module provides strongly-typed wrappers for bucket names, key
//! prefixes, object keys and source-relative paths. Each newtype ensures
//! data validity at construction time.

use std::fmt::{self, Display, Formatter};
use std::path::{Component, Path};

use serde::{Deserialize, Serialize};

use super::errors::DomainError;

// ============================================================================
// BucketName
// ============================================================================

/// Name of the destination bucket (the host part of `s3://bucket/prefix`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BucketName(String);

impl BucketName {
    /// Create a new BucketName
    ///
    /// # Errors
    /// Returns `DomainError::InvalidBucket` if the name is empty or contains `/`
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        if name.is_empty() || name.contains('/') {
            return Err(DomainError::InvalidBucket(name));
        }
        Ok(Self(name))
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for BucketName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for BucketName {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<BucketName> for String {
    fn from(bucket: BucketName) -> Self {
        bucket.0
    }
}

// ============================================================================
// RelativePath
// ============================================================================

/// A `/`-separated path relative to the source root, e.g. `sub/c.txt`
///
/// This is the value that exclude patterns are matched against and that
/// gets appended to the key prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RelativePath(String);

impl RelativePath {
    /// Create a RelativePath from an already `/`-separated string
    ///
    /// # Errors
    /// Returns `DomainError::InvalidPath` if the string is empty, absolute,
    /// or contains `.`/`..` segments
    pub fn new(path: impl Into<String>) -> Result<Self, DomainError> {
        let path = path.into();
        if path.is_empty() || path.starts_with('/') {
            return Err(DomainError::InvalidPath(format!(
                "relative path must be non-empty and not start with '/': {path:?}"
            )));
        }
        if path.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..") {
            return Err(DomainError::InvalidPath(format!(
                "relative path contains an empty or dot segment: {path:?}"
            )));
        }
        Ok(Self(path))
    }

    /// Compute the path of `absolute` relative to `root`
    ///
    /// Strips `root` plus the separator and joins the remaining components
    /// with `/`, independent of the platform separator.
    ///
    /// # Errors
    /// Returns `DomainError::PathNotInRoot` if `absolute` is not below `root`,
    /// or `DomainError::InvalidPath` if a component is not valid UTF-8.
    pub fn from_root(root: &Path, absolute: &Path) -> Result<Self, DomainError> {
        let stripped = absolute.strip_prefix(root).map_err(|_| {
            DomainError::PathNotInRoot(format!(
                "{} is not within {}",
                absolute.display(),
                root.display()
            ))
        })?;

        let mut segments = Vec::new();
        for component in stripped.components() {
            match component {
                Component::Normal(c) => {
                    let segment = c.to_str().ok_or_else(|| {
                        DomainError::InvalidPath(format!(
                            "not valid UTF-8: {}",
                            absolute.display()
                        ))
                    })?;
                    segments.push(segment);
                }
                _ => {
                    return Err(DomainError::InvalidPath(format!(
                        "unexpected component in {}",
                        absolute.display()
                    )))
                }
            }
        }

        if segments.is_empty() {
            return Err(DomainError::InvalidPath(format!(
                "{} is the source root itself",
                absolute.display()
            )));
        }

        Ok(Self(segments.join("/")))
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the final path segment
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Returns the extension of the final segment without the dot
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        Path::new(self.file_name())
            .extension()
            .and_then(|ext| ext.to_str())
    }
}

impl Display for RelativePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for RelativePath {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RelativePath> for String {
    fn from(path: RelativePath) -> Self {
        path.0
    }
}

// ============================================================================
// KeyPrefix
// ============================================================================

/// The normalized destination prefix under which files are stored
///
/// Either empty, or a string without a leading `/` that ends in exactly
/// one `/`. Computed once per run from the destination URL path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct KeyPrefix(String);

impl KeyPrefix {
    /// Normalize a raw destination path into a key prefix
    ///
    /// `""` and `"/"` collapse to the empty prefix; otherwise leading
    /// slashes are stripped and exactly one trailing slash is ensured.
    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        let trimmed = raw.trim_start_matches('/').trim_end_matches('/');
        if trimmed.is_empty() {
            Self(String::new())
        } else {
            Self(format!("{trimmed}/"))
        }
    }

    /// Returns true if no prefix is prepended to keys
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Destination key for a file: `prefix + relative path`
    #[must_use]
    pub fn key_for(&self, relative: &RelativePath) -> ObjectKey {
        ObjectKey(format!("{}{}", self.0, relative.as_str()))
    }
}

impl Display for KeyPrefix {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// ObjectKey
// ============================================================================

/// A destination object key inside the bucket
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ObjectKey(String);

impl ObjectKey {
    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ObjectKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ObjectKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn rel(s: &str) -> RelativePath {
        RelativePath::new(s).unwrap()
    }

    // ------------------------------------------------------------------
    // KeyPrefix
    // ------------------------------------------------------------------

    #[test]
    fn test_prefix_empty_and_slash_collapse() {
        assert!(KeyPrefix::normalize("").is_empty());
        assert!(KeyPrefix::normalize("/").is_empty());
    }

    #[test]
    fn test_prefix_strips_leading_and_adds_trailing() {
        assert_eq!(KeyPrefix::normalize("data").as_str(), "data/");
        assert_eq!(KeyPrefix::normalize("/data").as_str(), "data/");
        assert_eq!(KeyPrefix::normalize("/data/").as_str(), "data/");
        assert_eq!(KeyPrefix::normalize("/a/b").as_str(), "a/b/");
    }

    #[test]
    fn test_prefix_exactly_one_trailing_slash() {
        assert_eq!(KeyPrefix::normalize("data//").as_str(), "data/");
        assert!(KeyPrefix::normalize("//").is_empty());
    }

    #[test]
    fn test_key_for_with_and_without_prefix() {
        let file = rel("x/y.txt");
        assert_eq!(KeyPrefix::normalize("/").key_for(&file).as_str(), "x/y.txt");
        assert_eq!(KeyPrefix::normalize("").key_for(&file).as_str(), "x/y.txt");
        assert_eq!(
            KeyPrefix::normalize("data").key_for(&file).as_str(),
            "data/x/y.txt"
        );
    }

    #[test]
    fn test_key_for_is_pure() {
        let prefix = KeyPrefix::normalize("/backups/2024");
        let file = rel("sub/c.txt");
        assert_eq!(prefix.key_for(&file), prefix.key_for(&file));
    }

    // ------------------------------------------------------------------
    // RelativePath
    // ------------------------------------------------------------------

    #[test]
    fn test_relative_from_root() {
        let root = PathBuf::from("/srv/source");
        let abs = PathBuf::from("/srv/source/sub/c.txt");
        let path = RelativePath::from_root(&root, &abs).unwrap();
        assert_eq!(path.as_str(), "sub/c.txt");
        assert_eq!(path.file_name(), "c.txt");
        assert_eq!(path.extension(), Some("txt"));
    }

    #[test]
    fn test_relative_from_root_outside() {
        let root = PathBuf::from("/srv/source");
        let abs = PathBuf::from("/srv/other/a.txt");
        assert!(matches!(
            RelativePath::from_root(&root, &abs),
            Err(DomainError::PathNotInRoot(_))
        ));
    }

    #[test]
    fn test_relative_from_root_is_root() {
        let root = PathBuf::from("/srv/source");
        assert!(RelativePath::from_root(&root, &root).is_err());
    }

    #[test]
    fn test_relative_rejects_invalid() {
        assert!(RelativePath::new("").is_err());
        assert!(RelativePath::new("/abs").is_err());
        assert!(RelativePath::new("a/../b").is_err());
        assert!(RelativePath::new("a//b").is_err());
    }

    #[test]
    fn test_extension_of_dotfile() {
        assert_eq!(rel(".bashrc").extension(), None);
        assert_eq!(rel("dir.d/noext").extension(), None);
        assert_eq!(rel("archive.tar.gz").extension(), Some("gz"));
    }

    // ------------------------------------------------------------------
    // BucketName
    // ------------------------------------------------------------------

    #[test]
    fn test_bucket_name_validation() {
        assert!(BucketName::new("my-bucket").is_ok());
        assert!(BucketName::new("").is_err());
        assert!(BucketName::new("a/b").is_err());
    }

    #[test]
    fn test_bucket_name_serde_roundtrip_rejects_empty() {
        let result: Result<BucketName, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }
}
