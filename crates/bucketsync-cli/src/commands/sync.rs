//! Sync command - upload a local directory tree into a bucket
//!
//! Provides the `bucketsync sync` CLI command which:
//! 1. Parses the source directory and `s3://bucket/prefix` destination
//! 2. Builds the run settings from the flags (never changed afterwards)
//! 3. Connects the S3 object store once for the whole run
//! 4. Runs the discovery / filter / upload pipeline until done or cancelled

use std::sync::Arc;

use anyhow::Result;
use bucketsync_core::config::Config;
use bucketsync_core::content_type::ContentTypeResolver;
use bucketsync_core::domain::{ExcludeSet, SyncReport, SyncSettings};
use bucketsync_s3::client::S3Options;
use bucketsync_s3::credentials::Keys;
use bucketsync_s3::store::S3ObjectStore;
use bucketsync_sync::pipeline::SyncPipeline;
use bucketsync_sync::uploader::UploadTarget;
use clap::Args;
use regex::Regex;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::location::{DestinationLocation, SourceLocation};

/// Compiles an `--exclude` value while parsing arguments
pub fn parse_pattern(value: &str) -> Result<Regex, String> {
    Regex::new(value).map_err(|e| format!("invalid regular expression: {e}"))
}

/// Sync command with clap options
#[derive(Debug, Args)]
pub struct SyncCommand {
    /// Delete each local file after it was uploaded successfully
    #[arg(long)]
    pub delete_source: bool,

    /// Skip files whose path relative to SOURCE matches this regex (repeatable)
    #[arg(long = "exclude", value_name = "REGEX", value_parser = parse_pattern)]
    pub excludes: Vec<Regex>,

    /// Local directory, as a path or file:// URL
    #[arg(value_name = "SOURCE")]
    pub source: String,

    /// Destination, as s3://bucket/prefix
    #[arg(value_name = "DEST")]
    pub destination: String,
}

/// Options shared by every subcommand
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    pub config: Config,
    pub keys: Keys,
    pub dry_run: bool,
    pub verbose: bool,
}

impl SyncCommand {
    /// Execute the sync command
    ///
    /// Location errors and an unreadable source root come back as errors;
    /// per-file failures are only reflected in the returned report.
    pub async fn execute(&self, ctx: &RunContext, cancel: CancellationToken) -> Result<SyncReport> {
        let source = SourceLocation::parse(&self.source)?;
        let destination = DestinationLocation::parse(&self.destination)?;

        let settings = Arc::new(SyncSettings::new(
            self.delete_source,
            ExcludeSet::from_compiled(self.excludes.clone()),
            ctx.dry_run,
            ctx.verbose,
        ));

        let storage = &ctx.config.storage;
        let target = {
            let (bucket, prefix) = destination.clone().into_parts();
            UploadTarget::new(bucket, prefix)
                .with_content_types(ContentTypeResolver::with_overrides(&ctx.config.content_types))
                .with_access_policy(storage.access_policy)
                .with_server_side_encryption(storage.encryption()?)
        };

        let options = S3Options::from_storage_config(storage).with_keys(ctx.keys.clone());
        let store = Arc::new(S3ObjectStore::connect(&options).await);

        if settings.verbose() {
            info!(
                dry_run = settings.dry_run(),
                delete_source = settings.delete_source(),
                "Syncing {} -> {}",
                source,
                destination
            );
        }

        let pipeline = SyncPipeline::new(store, settings, target)
            .with_queue_capacity(ctx.config.pipeline.queue_capacity);
        let report = pipeline.run(source.into_root(), cancel).await?;
        Ok(report)
    }
}
