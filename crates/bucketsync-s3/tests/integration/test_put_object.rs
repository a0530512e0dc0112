//! PutObject request shape and error mapping

use bucketsync_core::ports::{AccessPolicy, IObjectStore, ServerSideEncryption};
use bucketsync_s3::S3Error;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{error_body, put_request, setup_s3_mock, setup_s3_mock_with_attempts};

#[tokio::test]
async fn put_object_sends_expected_request() {
    let (server, store) = setup_s3_mock().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("PUT"))
        .and(path("/my-bucket/data/sub/c.txt"))
        .and(header("x-amz-acl", "private"))
        .and(header("x-amz-server-side-encryption", "AES256"))
        .and(header("content-type", "text/plain"))
        .respond_with(ResponseTemplate::new(200).insert_header("ETag", "\"abc\""))
        .expect(1)
        .mount(&server)
        .await;

    let request = put_request(
        dir.path(),
        "my-bucket",
        "data",
        "sub/c.txt",
        b"hello world",
        "text/plain",
    );

    store.put_object(request).await.expect("upload should succeed");
}

#[tokio::test]
async fn put_object_without_prefix_uses_relative_path() {
    let (server, store) = setup_s3_mock().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("PUT"))
        .and(path("/my-bucket/x/y.txt"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let request = put_request(dir.path(), "my-bucket", "/", "x/y.txt", b"y", "text/plain");
    store.put_object(request).await.unwrap();
}

#[tokio::test]
async fn put_object_applies_policy_and_kms() {
    let (server, store) = setup_s3_mock().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("PUT"))
        .and(path("/site/index.html"))
        .and(header("x-amz-acl", "public-read"))
        .and(header("x-amz-server-side-encryption", "aws:kms"))
        .and(header("content-type", "text/html"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut request =
        put_request(dir.path(), "site", "", "index.html", b"<html/>", "text/html");
    request.access_policy = AccessPolicy::PublicRead;
    request.server_side_encryption = Some(ServerSideEncryption::AwsKms);

    store.put_object(request).await.unwrap();
}

#[tokio::test]
async fn put_object_can_omit_encryption_header() {
    let (server, store) = setup_s3_mock().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("PUT"))
        .and(path("/b/plain.bin"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut request = put_request(
        dir.path(),
        "b",
        "",
        "plain.bin",
        b"\x00\x01",
        "application/binary",
    );
    request.server_side_encryption = None;

    store.put_object(request).await.unwrap();

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert!(!received[0]
        .headers
        .contains_key("x-amz-server-side-encryption"));
}

#[tokio::test]
async fn access_denied_is_classified() {
    let (server, store) = setup_s3_mock().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("PUT"))
        .and(path("/locked/a.txt"))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("content-type", "application/xml")
                .set_body_string(error_body("AccessDenied", "Access Denied")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let request = put_request(dir.path(), "locked", "", "a.txt", b"a", "text/plain");
    let err = store.put_object(request).await.unwrap_err();

    match err.downcast_ref::<S3Error>() {
        Some(S3Error::AccessDenied(message)) => assert_eq!(message, "Access Denied"),
        other => panic!("unexpected error: {other:?} ({err:#})"),
    }
}

#[tokio::test]
async fn missing_bucket_is_classified() {
    let (server, store) = setup_s3_mock().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("PUT"))
        .and(path("/nope/a.txt"))
        .respond_with(
            ResponseTemplate::new(404)
                .insert_header("content-type", "application/xml")
                .set_body_string(error_body(
                    "NoSuchBucket",
                    "The specified bucket does not exist",
                )),
        )
        .mount(&server)
        .await;

    let request = put_request(dir.path(), "nope", "", "a.txt", b"a", "text/plain");
    let err = store.put_object(request).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<S3Error>(),
        Some(S3Error::NoSuchBucket(_))
    ));
    assert!(format!("{err:#}").contains("does not exist"));
}

#[tokio::test]
async fn transient_server_error_is_retried() {
    let (server, store) = setup_s3_mock_with_attempts(3).await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("PUT"))
        .and(path("/b/a.txt"))
        .respond_with(
            ResponseTemplate::new(500)
                .insert_header("content-type", "application/xml")
                .set_body_string(error_body("InternalError", "oops")),
        )
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/b/a.txt"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let request = put_request(dir.path(), "b", "", "a.txt", b"retry me", "text/plain");
    store.put_object(request).await.expect("second attempt should succeed");

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 2);
    assert!(received[1]
        .body
        .windows(b"retry me".len())
        .any(|chunk| chunk == b"retry me"));
}

#[tokio::test]
async fn single_attempt_does_not_retry() {
    let (server, store) = setup_s3_mock().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("PUT"))
        .and(path("/b/a.txt"))
        .respond_with(
            ResponseTemplate::new(500)
                .insert_header("content-type", "application/xml")
                .set_body_string(error_body("InternalError", "oops")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let request = put_request(dir.path(), "b", "", "a.txt", b"a", "text/plain");
    assert!(store.put_object(request).await.is_err());
}
