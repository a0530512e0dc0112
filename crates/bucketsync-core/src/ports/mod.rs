//! Port definitions (hexagonal architecture interfaces)
//!
//! Ports are interfaces that the pipeline depends on, but whose
//! implementations live in adapter crates.
//!
//! ## Ports Overview
//!
//! - [`IObjectStore`] - Object storage writes (Amazon S3 and compatibles)

pub mod object_store;

pub use object_store::{AccessPolicy, IObjectStore, PutObjectRequest, ServerSideEncryption};
