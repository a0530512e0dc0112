//! Shared test helpers for S3 adapter integration tests
//!
//! Starts a wiremock server and returns an S3ObjectStore addressed at it
//! with path-style requests and static keys.

use std::path::Path;

use bucketsync_core::domain::{BucketName, KeyPrefix, RelativePath};
use bucketsync_core::ports::{AccessPolicy, PutObjectRequest, ServerSideEncryption};
use wiremock::MockServer;

use bucketsync_s3::client::S3Options;
use bucketsync_s3::credentials::Keys;
use bucketsync_s3::store::S3ObjectStore;

/// Starts a mock server and a store pointed at it.
pub async fn setup_s3_mock() -> (MockServer, S3ObjectStore) {
    setup_s3_mock_with_attempts(1).await
}

/// Same as [`setup_s3_mock`], allowing `max_attempts` tries per request.
pub async fn setup_s3_mock_with_attempts(max_attempts: u32) -> (MockServer, S3ObjectStore) {
    let server = MockServer::start().await;

    let options = S3Options::default()
        .with_region("us-east-1")
        .with_endpoint(server.uri())
        .with_max_attempts(max_attempts)
        .with_timeout(10)
        .with_keys(Keys::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY"));
    let store = S3ObjectStore::connect(&options).await;

    (server, store)
}

/// Writes `content` under `dir` and builds a request for it.
pub fn put_request(
    dir: &Path,
    bucket: &str,
    prefix: &str,
    relative: &str,
    content: &[u8],
    content_type: &str,
) -> PutObjectRequest {
    let absolute = dir.join(relative);
    std::fs::create_dir_all(absolute.parent().unwrap()).unwrap();
    std::fs::write(&absolute, content).unwrap();

    let relative = RelativePath::new(relative).unwrap();
    PutObjectRequest {
        bucket: BucketName::new(bucket).unwrap(),
        key: KeyPrefix::normalize(prefix).key_for(&relative),
        source: absolute,
        content_length: content.len() as u64,
        content_type: content_type.to_string(),
        access_policy: AccessPolicy::default(),
        server_side_encryption: Some(ServerSideEncryption::default()),
    }
}

/// S3-style XML error body.
pub fn error_body(code: &str, message: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <Error><Code>{code}</Code><Message>{message}</Message>\
         <RequestId>4442587FB7D0A2F9</RequestId></Error>"
    )
}
