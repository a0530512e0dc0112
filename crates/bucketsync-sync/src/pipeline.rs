//! Pipeline coordinator
//!
//! Wires the three stages together for one run:
//!
//! ```text
//! Discoverer --(bounded queue)--> filter loop --(bounded queue)--> Uploader
//!  (spawned)                     (this task)                      (spawned)
//! ```
//!
//! Both queues share the same capacity. A slow uploader fills the transfer
//! queue, which stalls the filter loop, which lets the discovery queue fill
//! and suspends the walk. At most `2 * capacity` records plus the one being
//! uploaded are alive at any time.
//!
//! The run ends when discovery has finished, every discovered record has
//! been filtered, and the uploader has drained the transfer queue.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use bucketsync_core::config::DEFAULT_QUEUE_CAPACITY;
use bucketsync_core::domain::{SyncReport, SyncSettings};
use bucketsync_core::ports::IObjectStore;
use chrono::Utc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::discovery::Discoverer;
use crate::filter::{ExcludeFilter, FilterDecision};
use crate::uploader::{UploadTarget, Uploader};
use crate::SyncError;

/// Runs discovery, filtering and upload for one source root
pub struct SyncPipeline {
    store: Arc<dyn IObjectStore>,
    settings: Arc<SyncSettings>,
    target: UploadTarget,
    queue_capacity: usize,
}

impl SyncPipeline {
    pub fn new(
        store: Arc<dyn IObjectStore>,
        settings: Arc<SyncSettings>,
        target: UploadTarget,
    ) -> Self {
        Self {
            store,
            settings,
            target,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }

    /// Sets the capacity of both queues (minimum 1)
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    /// Syncs every file under `root` and returns the run report
    ///
    /// Per-file failures are counted in the report. Only an unreadable
    /// root or a crashed stage task is returned as an error. When `cancel`
    /// fires, discovery stops, the in-flight upload completes, and the
    /// report comes back with `cancelled` set.
    #[tracing::instrument(skip_all, fields(root = %root.display(), dry_run = self.settings.dry_run()))]
    pub async fn run(
        &self,
        root: PathBuf,
        cancel: CancellationToken,
    ) -> Result<SyncReport, SyncError> {
        let started_at = Utc::now();
        let clock = Instant::now();

        let discoverer = Discoverer::new(root)?;
        discoverer.check_root().await?;

        let (discovered_tx, mut discovered_rx) = mpsc::channel(self.queue_capacity);
        let (transfer_tx, transfer_rx) = mpsc::channel(self.queue_capacity);

        info!(
            bucket = %self.target.bucket,
            prefix = %self.target.prefix,
            excludes = self.settings.excludes().len(),
            "Starting sync"
        );

        let discovery = tokio::spawn(discoverer.run(discovered_tx, cancel.clone()));
        let uploader = Uploader::new(
            Arc::clone(&self.store),
            Arc::clone(&self.settings),
            self.target.clone(),
        );
        let upload = tokio::spawn(uploader.run(transfer_rx, cancel.clone()));

        let filter = ExcludeFilter::new(Arc::clone(&self.settings));
        let mut skipped = 0u64;
        while let Some(record) = discovered_rx.recv().await {
            match filter.evaluate(&record) {
                FilterDecision::Skip { .. } => skipped += 1,
                FilterDecision::Pass => {
                    if transfer_tx.send(record).await.is_err() {
                        debug!("Uploader stopped, no longer forwarding records");
                        break;
                    }
                }
            }
        }
        drop(discovered_rx);
        drop(transfer_tx);

        let mut report = upload
            .await
            .map_err(|e| SyncError::TaskFailed(format!("uploader: {e}")))?;
        let stats = discovery
            .await
            .map_err(|e| SyncError::TaskFailed(format!("discoverer: {e}")))?;

        report.started_at = started_at;
        report.duration_ms = u64::try_from(clock.elapsed().as_millis()).unwrap_or(u64::MAX);
        report.discovered = stats.discovered;
        report.walk_errors = stats.walk_errors;
        report.skipped = skipped;
        report.cancelled = cancel.is_cancelled();

        info!(
            discovered = report.discovered,
            uploaded = report.uploaded,
            planned = report.planned,
            skipped = report.skipped,
            failures = report.failure_count(),
            cancelled = report.cancelled,
            "Sync finished"
        );
        Ok(report)
    }
}
