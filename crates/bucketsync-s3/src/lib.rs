//! bucketsync S3 - Amazon S3 object store adapter
//!
//! Provides:
//! - Client construction with region, endpoint, timeout and retry overrides
//! - Credential resolution (command line, environment, SDK default chain)
//! - [`store::S3ObjectStore`], the `IObjectStore` implementation
//!
//! ## Modules
//!
//! - [`client`] - `S3Options` and `create_s3_client`
//! - [`credentials`] - `Keys` and `CredentialSource`
//! - [`store`] - Streaming `PutObject` uploads

pub mod client;
pub mod credentials;
pub mod store;

use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use thiserror::Error;

/// Errors returned by S3 requests
#[derive(Debug, Error)]
pub enum S3Error {
    /// Credentials are missing, invalid, or lack permission for the request
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// The destination bucket does not exist
    #[error("No such bucket: {0}")]
    NoSuchBucket(String),

    /// Any other error reported by the service
    #[error("Service error {code}: {message}")]
    Service {
        /// S3 error code, e.g. `SlowDown`
        code: String,
        /// Message returned with the code
        message: String,
    },

    /// The request never produced a service response (DNS, TLS, timeout, ...)
    #[error("Request failed: {0}")]
    Request(String),
}

impl S3Error {
    /// Classifies an SDK error by its S3 error code
    pub(crate) fn from_sdk<E, R>(err: &SdkError<E, R>) -> Self
    where
        E: ProvideErrorMetadata + std::error::Error + 'static,
        R: std::fmt::Debug,
    {
        let Some(service) = err.as_service_error() else {
            return S3Error::Request(DisplayErrorContext(err).to_string());
        };

        let message = service
            .message()
            .map(str::to_string)
            .unwrap_or_else(|| DisplayErrorContext(err).to_string());
        match service.code() {
            Some("AccessDenied") | Some("InvalidAccessKeyId") | Some("SignatureDoesNotMatch") => {
                S3Error::AccessDenied(message)
            }
            Some("NoSuchBucket") => S3Error::NoSuchBucket(message),
            Some(code) => S3Error::Service {
                code: code.to_string(),
                message,
            },
            None => S3Error::Request(DisplayErrorContext(err).to_string()),
        }
    }
}
