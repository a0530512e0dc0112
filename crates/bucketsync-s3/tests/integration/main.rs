//! Integration tests for bucketsync-s3
//!
//! Uses wiremock to stand in for an S3-compatible endpoint and verifies
//! the PutObject requests produced by S3ObjectStore.

mod common;

mod test_put_object;
