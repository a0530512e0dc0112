//! File records - the unit of work flowing through the pipeline
//!
//! A [`FileRecord`] is created by the discoverer for every regular file
//! under the source root and consumed exactly once by the uploader. It
//! carries no transfer state; outcomes are returned separately.

use std::path::{Path, PathBuf};

use super::newtypes::RelativePath;

/// Metadata captured when the file was discovered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileInfo {
    /// Size in bytes at discovery time, declared as the upload length
    pub size: u64,
}

/// One discovered file: its source-relative path, metadata, and the lazy
/// open/delete capabilities over its absolute path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    relative: RelativePath,
    absolute: PathBuf,
    info: FileInfo,
}

impl FileRecord {
    /// Creates a new FileRecord
    pub fn new(relative: RelativePath, absolute: PathBuf, info: FileInfo) -> Self {
        Self {
            relative,
            absolute,
            info,
        }
    }

    /// Path relative to the source root
    pub fn relative_path(&self) -> &RelativePath {
        &self.relative
    }

    /// Absolute path of the source file
    pub fn absolute_path(&self) -> &Path {
        &self.absolute
    }

    /// Metadata captured at discovery time
    pub fn info(&self) -> FileInfo {
        self.info
    }

    /// Opens the file for reading
    ///
    /// Fails if the file disappeared or became unreadable after discovery.
    pub async fn open(&self) -> std::io::Result<tokio::fs::File> {
        tokio::fs::File::open(&self.absolute).await
    }

    /// Removes the source file
    pub async fn delete(&self) -> std::io::Result<()> {
        tokio::fs::remove_file(&self.absolute).await
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use tokio::io::AsyncReadExt;

    use super::*;

    fn record_in(dir: &TempDir, name: &str, size: u64) -> FileRecord {
        FileRecord::new(
            RelativePath::new(name).unwrap(),
            dir.path().join(name),
            FileInfo { size },
        )
    }

    #[tokio::test]
    async fn test_open_reads_current_content() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.txt"), b"hello").unwrap();
        let record = record_in(&dir, "a.txt", 5);

        let mut file = record.open().await.unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).await.unwrap();
        assert_eq!(content, "hello");
    }

    #[tokio::test]
    async fn test_open_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let record = record_in(&dir, "gone.txt", 0);
        assert!(record.open().await.is_err());
    }

    #[tokio::test]
    async fn test_delete_removes_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.txt"), b"x").unwrap();
        let record = record_in(&dir, "a.txt", 1);

        record.delete().await.unwrap();
        assert!(!dir.path().join("a.txt").exists());
        assert!(record.delete().await.is_err());
    }

    #[test]
    fn test_record_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FileRecord>();
    }
}
