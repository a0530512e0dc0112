//! bucketsync Core - Domain types and port definitions
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain types** - `FileRecord`, `KeyPrefix`, `ObjectKey`, `ExcludeSet`, `SyncSettings`, `SyncReport`
//! - **Port definitions** - Traits for adapters: `IObjectStore`
//! - **Content types** - extension based MIME resolution with user overrides
//! - **Configuration** - the YAML configuration file model
//!
//! # Architecture
//!
//! The domain module holds pure logic with no I/O beyond the lazy
//! open/delete capabilities of a [`domain::FileRecord`]. Ports define the
//! trait interfaces that adapter crates implement; the pipeline in
//! `bucketsync-sync` only ever talks to storage through them.

pub mod config;
pub mod content_type;
pub mod domain;
pub mod ports;
