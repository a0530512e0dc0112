//! Configuration module for bucketsync.
//!
//! Provides typed configuration structs that map to the YAML configuration file,
//! with loading, validation, defaults, and a builder pattern for programmatic use.
//!
//! The file only carries environment-level settings (where and how to talk to
//! storage, queue sizing, logging). What to sync is always given on the command line.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::ports::object_store::{AccessPolicy, ServerSideEncryption};

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for bucketsync.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub pipeline: PipelineConfig,
    /// Extension (without the dot) to MIME type overrides.
    pub content_types: HashMap<String, String>,
    pub logging: LoggingConfig,
}

/// Object storage connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Region override. `None` uses the SDK default chain.
    pub region: Option<String>,
    /// Endpoint override for S3-compatible services.
    pub endpoint: Option<String>,
    /// Address buckets as `endpoint/bucket` instead of `bucket.endpoint`.
    pub force_path_style: bool,
    /// Per-operation timeout in seconds.
    pub timeout_secs: u64,
    /// Total attempts per request, including the first.
    pub max_attempts: u32,
    /// Canned ACL applied to every object.
    pub access_policy: AccessPolicy,
    /// `AES256`, `aws:kms`, or `none` to omit the header.
    pub server_side_encryption: String,
}

/// Pipeline sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Capacity of each bounded queue between stages.
    pub queue_capacity: usize,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
}

// ---------------------------------------------------------------------------
// Config::load()
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/bucketsync/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("bucketsync")
            .join("config.yaml")
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Default per-operation timeout (seconds).
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Default attempts per storage request.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default capacity of each pipeline queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 10;

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            region: None,
            endpoint: None,
            force_path_style: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            access_policy: AccessPolicy::default(),
            server_side_encryption: ServerSideEncryption::default().as_str().to_string(),
        }
    }
}

impl StorageConfig {
    /// Parsed `server_side_encryption`; `Ok(None)` when set to `none`.
    pub fn encryption(&self) -> Result<Option<ServerSideEncryption>, DomainError> {
        if self.server_side_encryption.eq_ignore_ascii_case("none") {
            return Ok(None);
        }
        self.server_side_encryption.parse().map(Some)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config::validate()
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"storage.max_attempts"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Upper bound for `storage.max_attempts`.
const MAX_ATTEMPTS_LIMIT: u32 = 10;

/// Upper bound for `pipeline.queue_capacity`.
const QUEUE_CAPACITY_LIMIT: usize = 10_000;

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- storage ---
        if let Some(region) = &self.storage.region {
            if region.trim().is_empty() {
                errors.push(ValidationError {
                    field: "storage.region".into(),
                    message: "must not be empty when set".into(),
                });
            }
        }
        if let Some(endpoint) = &self.storage.endpoint {
            if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                errors.push(ValidationError {
                    field: "storage.endpoint".into(),
                    message: format!("must be an http:// or https:// URL, got '{endpoint}'"),
                });
            }
        }
        if self.storage.timeout_secs == 0 {
            errors.push(ValidationError {
                field: "storage.timeout_secs".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.storage.max_attempts == 0 || self.storage.max_attempts > MAX_ATTEMPTS_LIMIT {
            errors.push(ValidationError {
                field: "storage.max_attempts".into(),
                message: format!(
                    "must be between 1 and {MAX_ATTEMPTS_LIMIT}, got {}",
                    self.storage.max_attempts
                ),
            });
        }
        if let Err(e) = self.storage.encryption() {
            errors.push(ValidationError {
                field: "storage.server_side_encryption".into(),
                message: format!("{e}; expected AES256, aws:kms, or none"),
            });
        }

        // --- pipeline ---
        if self.pipeline.queue_capacity == 0
            || self.pipeline.queue_capacity > QUEUE_CAPACITY_LIMIT
        {
            errors.push(ValidationError {
                field: "pipeline.queue_capacity".into(),
                message: format!(
                    "must be between 1 and {QUEUE_CAPACITY_LIMIT}, got {}",
                    self.pipeline.queue_capacity
                ),
            });
        }

        // --- content_types ---
        let mut extensions: Vec<&String> = self.content_types.keys().collect();
        extensions.sort();
        for ext in extensions {
            let mime = &self.content_types[ext];
            if ext.trim_start_matches('.').is_empty() {
                errors.push(ValidationError {
                    field: "content_types".into(),
                    message: "extension must not be empty".into(),
                });
            }
            if !mime.contains('/') {
                errors.push(ValidationError {
                    field: format!("content_types.{ext}"),
                    message: format!("'{mime}' is not a type/subtype MIME string"),
                });
            }
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "invalid level '{}'; expected one of: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`Config`].
///
/// Starts from [`Config::default`] and lets callers override individual fields.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder pre-filled with default values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    // --- storage ---

    pub fn storage_region(mut self, region: impl Into<String>) -> Self {
        self.config.storage.region = Some(region.into());
        self
    }

    pub fn storage_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.storage.endpoint = Some(endpoint.into());
        self
    }

    pub fn storage_force_path_style(mut self, enabled: bool) -> Self {
        self.config.storage.force_path_style = enabled;
        self
    }

    pub fn storage_timeout_secs(mut self, seconds: u64) -> Self {
        self.config.storage.timeout_secs = seconds;
        self
    }

    pub fn storage_max_attempts(mut self, attempts: u32) -> Self {
        self.config.storage.max_attempts = attempts;
        self
    }

    pub fn storage_access_policy(mut self, policy: AccessPolicy) -> Self {
        self.config.storage.access_policy = policy;
        self
    }

    pub fn storage_server_side_encryption(mut self, value: impl Into<String>) -> Self {
        self.config.storage.server_side_encryption = value.into();
        self
    }

    // --- pipeline ---

    pub fn pipeline_queue_capacity(mut self, capacity: usize) -> Self {
        self.config.pipeline.queue_capacity = capacity;
        self
    }

    // --- content_types ---

    pub fn content_type(mut self, extension: impl Into<String>, mime: impl Into<String>) -> Self {
        self.config
            .content_types
            .insert(extension.into(), mime.into());
        self
    }

    // --- logging ---

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    // --- build ---

    /// Consume the builder and return the finished [`Config`].
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
