//! Upload stage
//!
//! The [`Uploader`] is the single consumer of the transfer queue. For each
//! record it computes the destination key and content type, then (unless
//! this is a dry run) opens the file, writes it through the injected
//! [`IObjectStore`] and, on success, optionally deletes the source.
//!
//! ## Failure isolation
//!
//! Every per-file problem becomes a [`FileOutcome`]; nothing here returns
//! an error to the caller. A failed open or write leaves the source file
//! untouched and processing moves on to the next record.

use std::sync::Arc;

use bucketsync_core::content_type::ContentTypeResolver;
use bucketsync_core::domain::{
    BucketName, DeleteStatus, FileOutcome, FileRecord, KeyPrefix, SyncReport, SyncSettings,
};
use bucketsync_core::ports::{AccessPolicy, IObjectStore, PutObjectRequest, ServerSideEncryption};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Where and how objects are written, fixed for the whole run
#[derive(Debug, Clone)]
pub struct UploadTarget {
    pub bucket: BucketName,
    pub prefix: KeyPrefix,
    pub content_types: ContentTypeResolver,
    pub access_policy: AccessPolicy,
    pub server_side_encryption: Option<ServerSideEncryption>,
}

impl UploadTarget {
    /// Target with the default private ACL, AES256 encryption and the
    /// standard content-type table
    pub fn new(bucket: BucketName, prefix: KeyPrefix) -> Self {
        Self {
            bucket,
            prefix,
            content_types: ContentTypeResolver::new(),
            access_policy: AccessPolicy::default(),
            server_side_encryption: Some(ServerSideEncryption::default()),
        }
    }

    pub fn with_content_types(mut self, resolver: ContentTypeResolver) -> Self {
        self.content_types = resolver;
        self
    }

    pub fn with_access_policy(mut self, policy: AccessPolicy) -> Self {
        self.access_policy = policy;
        self
    }

    pub fn with_server_side_encryption(mut self, sse: Option<ServerSideEncryption>) -> Self {
        self.server_side_encryption = sse;
        self
    }
}

/// Consumer stage writing records to object storage
pub struct Uploader {
    store: Arc<dyn IObjectStore>,
    settings: Arc<SyncSettings>,
    target: UploadTarget,
}

impl Uploader {
    pub fn new(
        store: Arc<dyn IObjectStore>,
        settings: Arc<SyncSettings>,
        target: UploadTarget,
    ) -> Self {
        Self {
            store,
            settings,
            target,
        }
    }

    /// Handles one record: open, write, then optionally delete
    ///
    /// In dry-run mode only the key and content type are computed.
    pub async fn process(&self, record: &FileRecord) -> FileOutcome {
        let relative = record.relative_path();
        let key = self.target.prefix.key_for(relative);
        let content_type = self.target.content_types.resolve(relative);

        if self.settings.verbose() {
            info!(
                content_type = %content_type,
                size = record.info().size,
                "file://{} -> s3://{}/{}",
                record.absolute_path().display(),
                self.target.bucket,
                key
            );
        }

        if self.settings.dry_run() {
            return FileOutcome::Planned { key, content_type };
        }

        if let Err(e) = record.open().await {
            error!(path = %relative, error = %e, "Failed to open source file");
            return FileOutcome::OpenFailed {
                reason: e.to_string(),
            };
        }

        let request = PutObjectRequest {
            bucket: self.target.bucket.clone(),
            key: key.clone(),
            source: record.absolute_path().to_path_buf(),
            content_length: record.info().size,
            content_type,
            access_policy: self.target.access_policy,
            server_side_encryption: self.target.server_side_encryption,
        };

        if let Err(e) = self.store.put_object(request).await {
            let reason = format!("{e:#}");
            error!(path = %relative, key = %key, error = %reason, "Failed to transfer file");
            return FileOutcome::TransferFailed { key, reason };
        }
        debug!(path = %relative, key = %key, "Uploaded");

        let delete = if self.settings.should_delete_after_upload() {
            Some(match record.delete().await {
                Ok(()) => {
                    debug!(path = %relative, "Deleted source after upload");
                    DeleteStatus::Deleted
                }
                Err(e) => {
                    warn!(path = %relative, error = %e, "Failed to delete source after upload");
                    DeleteStatus::Failed(e.to_string())
                }
            })
        } else {
            None
        };

        FileOutcome::Uploaded { key, delete }
    }

    /// Drains `rx` until it closes or `cancel` fires
    ///
    /// Cancellation is checked between records only, so an upload that has
    /// started always runs to completion. Records still queued at that
    /// point are dropped untouched.
    #[tracing::instrument(skip_all, fields(bucket = %self.target.bucket, prefix = %self.target.prefix))]
    pub async fn run(
        self,
        mut rx: mpsc::Receiver<FileRecord>,
        cancel: CancellationToken,
    ) -> SyncReport {
        let mut report = SyncReport::new();

        loop {
            let record = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(pending = rx.len(), "Upload cancelled");
                    break;
                }
                next = rx.recv() => match next {
                    Some(record) => record,
                    None => break,
                },
            };

            let outcome = self.process(&record).await;
            report.record(record.relative_path(), &outcome);
        }

        report
    }
}
