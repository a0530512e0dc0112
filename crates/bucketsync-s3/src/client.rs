//! S3 client configuration and creation.

use std::time::Duration;

use aws_config::meta::region::RegionProviderChain;
use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::Client;
use bucketsync_core::config::{StorageConfig, DEFAULT_MAX_ATTEMPTS, DEFAULT_TIMEOUT_SECS};
use tracing::debug;

use crate::credentials::{CredentialSource, Keys};

/// Region used when neither the options nor the environment name one.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Provider name attached to static credentials.
const CREDENTIALS_PROVIDER_NAME: &str = "bucketsync";

/// Connection options for the S3 client.
#[derive(Debug, Clone)]
pub struct S3Options {
    /// AWS region; falls back to the default chain, then `us-east-1`
    pub region: Option<String>,

    /// Custom endpoint URL for S3-compatible services
    pub endpoint: Option<String>,

    /// Use path-style addressing (implied by a custom endpoint)
    pub force_path_style: bool,

    /// Per-operation timeout in seconds
    pub timeout_secs: u64,

    /// Total attempts per request, including the first
    pub max_attempts: u32,

    /// Keys given on the command line (may be empty)
    pub keys: Keys,
}

impl Default for S3Options {
    fn default() -> Self {
        Self {
            region: None,
            endpoint: None,
            force_path_style: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            keys: Keys::default(),
        }
    }
}

impl S3Options {
    /// Options taken from the `storage` section of the configuration file.
    pub fn from_storage_config(storage: &StorageConfig) -> Self {
        Self {
            region: storage.region.clone(),
            endpoint: storage.endpoint.clone(),
            force_path_style: storage.force_path_style,
            timeout_secs: storage.timeout_secs,
            max_attempts: storage.max_attempts,
            keys: Keys::default(),
        }
    }

    /// Set the AWS region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set a custom endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_force_path_style(mut self, enabled: bool) -> Self {
        self.force_path_style = enabled;
        self
    }

    /// Set the per-operation timeout in seconds.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set keys given on the command line.
    pub fn with_keys(mut self, keys: Keys) -> Self {
        self.keys = keys;
        self
    }

    /// Whether requests address the bucket in the path.
    pub fn uses_path_style(&self) -> bool {
        self.force_path_style || self.endpoint.is_some()
    }
}

/// Create an S3 client from options.
///
/// Never fails: missing credentials surface as per-request errors.
pub async fn create_s3_client(options: &S3Options) -> Client {
    let region = RegionProviderChain::first_try(options.region.clone().map(Region::new))
        .or_default_provider()
        .or_else(Region::new(DEFAULT_REGION));

    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(region)
        .timeout_config(
            TimeoutConfig::builder()
                .operation_timeout(Duration::from_secs(options.timeout_secs))
                .build(),
        )
        .retry_config(RetryConfig::standard().with_max_attempts(options.max_attempts));

    if let Some(endpoint) = &options.endpoint {
        loader = loader.endpoint_url(endpoint);
    }

    let source = CredentialSource::resolve(options.keys.clone());
    debug!(source = source.name(), "Resolved credential source");
    if let Some(keys) = source.keys() {
        let credentials = Credentials::new(
            &keys.access_key,
            &keys.secret_key,
            keys.token.clone(),
            None,
            CREDENTIALS_PROVIDER_NAME,
        );
        loader = loader.credentials_provider(credentials);
    }

    let sdk_config = loader.load().await;
    let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
        .force_path_style(options.uses_path_style())
        .build();

    Client::from_conf(s3_config)
}
