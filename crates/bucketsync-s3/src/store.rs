//! Streaming uploads through `PutObject`
//!
//! The source file is handed to the SDK as a path-backed, length-bounded
//! body. File contents are never buffered in memory, and the SDK reopens
//! the file for each retry attempt.

use anyhow::Context;
use aws_sdk_s3::primitives::{ByteStream, Length};
use aws_sdk_s3::types::{ObjectCannedAcl, ServerSideEncryption as SdkServerSideEncryption};
use aws_sdk_s3::Client;
use bucketsync_core::ports::{AccessPolicy, IObjectStore, PutObjectRequest, ServerSideEncryption};
use tracing::debug;

use crate::client::{create_s3_client, S3Options};
use crate::S3Error;

/// [`IObjectStore`] backed by an S3 client, built once per run
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds the client from `options` and wraps it
    pub async fn connect(options: &S3Options) -> Self {
        Self::new(create_s3_client(options).await)
    }
}

fn canned_acl(policy: AccessPolicy) -> ObjectCannedAcl {
    match policy {
        AccessPolicy::Private => ObjectCannedAcl::Private,
        AccessPolicy::PublicRead => ObjectCannedAcl::PublicRead,
        AccessPolicy::AuthenticatedRead => ObjectCannedAcl::AuthenticatedRead,
        AccessPolicy::BucketOwnerFullControl => ObjectCannedAcl::BucketOwnerFullControl,
    }
}

fn sdk_encryption(sse: ServerSideEncryption) -> SdkServerSideEncryption {
    match sse {
        ServerSideEncryption::Aes256 => SdkServerSideEncryption::Aes256,
        ServerSideEncryption::AwsKms => SdkServerSideEncryption::AwsKms,
    }
}

#[async_trait::async_trait]
impl IObjectStore for S3ObjectStore {
    #[tracing::instrument(skip_all, fields(bucket = %request.bucket, key = %request.key, size = request.content_length))]
    async fn put_object(&self, request: PutObjectRequest) -> anyhow::Result<()> {
        let length = request.content_length;
        let content_length = i64::try_from(length)
            .with_context(|| format!("File too large to upload: {length} bytes"))?;

        let body = ByteStream::read_from()
            .path(&request.source)
            .length(Length::Exact(length))
            .build()
            .await
            .context("Failed to prepare upload body")?;

        let mut put = self
            .client
            .put_object()
            .bucket(request.bucket.as_str())
            .key(request.key.as_str())
            .body(body)
            .content_length(content_length)
            .content_type(request.content_type)
            .acl(canned_acl(request.access_policy));
        if let Some(sse) = request.server_side_encryption {
            put = put.server_side_encryption(sdk_encryption(sse));
        }

        put.send().await.map_err(|e| S3Error::from_sdk(&e))?;
        debug!("PutObject succeeded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canned_acl_wire_values() {
        for policy in [
            AccessPolicy::Private,
            AccessPolicy::PublicRead,
            AccessPolicy::AuthenticatedRead,
            AccessPolicy::BucketOwnerFullControl,
        ] {
            assert_eq!(canned_acl(policy).as_str(), policy.as_str());
        }
    }

    #[test]
    fn test_encryption_wire_values() {
        for sse in [ServerSideEncryption::Aes256, ServerSideEncryption::AwsKms] {
            assert_eq!(sdk_encryption(sse).as_str(), sse.as_str());
        }
    }
}
