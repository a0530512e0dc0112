//! Source tree discovery
//!
//! The [`Discoverer`] walks the source root depth-first with an explicit
//! stack of pending directories and sends one [`FileRecord`] per regular
//! file into a bounded channel. A full channel suspends the walk, so the
//! number of records alive at once never depends on the size of the tree.
//!
//! Errors below the root are logged and counted; the entry (or subtree)
//! is skipped and the walk continues.

use std::path::{Path, PathBuf};

use bucketsync_core::domain::{DomainError, FileInfo, FileRecord, RelativePath};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::SyncError;

/// Counters reported by a finished walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiscoveryStats {
    /// Records handed to the channel
    pub discovered: u64,
    /// Entries that could not be read or mapped
    pub walk_errors: u64,
}

/// Producer stage: emits every regular file under `root`
#[derive(Debug, Clone)]
pub struct Discoverer {
    root: PathBuf,
}

impl Discoverer {
    /// Creates a discoverer for an absolute source root
    ///
    /// # Errors
    /// Returns `DomainError::InvalidPath` if `root` is relative
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, SyncError> {
        let root = root.into();
        if !root.is_absolute() {
            return Err(DomainError::InvalidPath(format!(
                "source root must be absolute: {}",
                root.display()
            ))
            .into());
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Verifies the root is a readable directory
    ///
    /// This is the only walk failure that aborts a run.
    pub async fn check_root(&self) -> Result<(), SyncError> {
        let source_access = |source| SyncError::SourceAccess {
            path: self.root.clone(),
            source,
        };

        let metadata = tokio::fs::metadata(&self.root)
            .await
            .map_err(source_access)?;
        if !metadata.is_dir() {
            return Err(source_access(std::io::Error::new(
                std::io::ErrorKind::Other,
                "not a directory",
            )));
        }
        let _entries = tokio::fs::read_dir(&self.root)
            .await
            .map_err(source_access)?;
        Ok(())
    }

    /// Walks the tree, sending records into `tx` until the walk completes,
    /// the receiver is dropped, or `cancel` fires
    ///
    /// `tx` is dropped on return, which closes the channel for the consumer.
    #[tracing::instrument(skip_all, fields(root = %self.root.display()))]
    pub async fn run(
        self,
        tx: mpsc::Sender<FileRecord>,
        cancel: CancellationToken,
    ) -> DiscoveryStats {
        let mut stats = DiscoveryStats::default();
        let mut pending = vec![self.root.clone()];

        'walk: while let Some(dir) = pending.pop() {
            if cancel.is_cancelled() {
                debug!("Discovery cancelled");
                break;
            }

            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(path = %dir.display(), error = %e, "Failed to read directory");
                    stats.walk_errors += 1;
                    continue;
                }
            };

            loop {
                let entry = match entries.next_entry().await {
                    Ok(Some(entry)) => entry,
                    Ok(None) => break,
                    Err(e) => {
                        warn!(path = %dir.display(), error = %e, "Failed to read directory entry");
                        stats.walk_errors += 1;
                        break;
                    }
                };

                let path = entry.path();
                let metadata = match entry_metadata(&entry).await {
                    Ok(metadata) => metadata,
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "Failed to stat entry");
                        stats.walk_errors += 1;
                        continue;
                    }
                };

                if metadata.is_dir() {
                    if entry.file_type().await.map(|t| t.is_symlink()).unwrap_or(false) {
                        debug!(path = %path.display(), "Not following directory symlink");
                    } else {
                        pending.push(path);
                    }
                    continue;
                }
                if !metadata.is_file() {
                    debug!(path = %path.display(), "Skipping special file");
                    continue;
                }

                let relative = match RelativePath::from_root(&self.root, &path) {
                    Ok(relative) => relative,
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "Skipping unmappable path");
                        stats.walk_errors += 1;
                        continue;
                    }
                };

                let record = FileRecord::new(
                    relative,
                    path,
                    FileInfo {
                        size: metadata.len(),
                    },
                );

                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        debug!("Discovery cancelled while waiting for queue space");
                        break 'walk;
                    }
                    sent = tx.send(record) => {
                        if sent.is_err() {
                            debug!("Record receiver dropped, stopping discovery");
                            break 'walk;
                        }
                        stats.discovered += 1;
                    }
                }
            }
        }

        debug!(
            discovered = stats.discovered,
            walk_errors = stats.walk_errors,
            "Discovery finished"
        );
        stats
    }
}

/// Metadata of an entry, following symlinks so links to files are uploaded
async fn entry_metadata(entry: &tokio::fs::DirEntry) -> std::io::Result<std::fs::Metadata> {
    let file_type = entry.file_type().await?;
    if file_type.is_symlink() {
        tokio::fs::metadata(entry.path()).await
    } else {
        entry.metadata().await
    }
}
