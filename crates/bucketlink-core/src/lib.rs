//! bucketlink Core - Domain logic and business rules
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain types** - `RelativeKey`, `Hatch`, `FileRecord`, `TreeSnapshot`,
//!   `SyncPlan`, `Action`
//! - **Sync policy** - the push/pull × safe/unsafe table that turns a diff
//!   of two trees into an ordered plan of copy/rename/delete actions
//! - **Port definitions** - Traits for adapters: `IObjectStore`, `ILocalTree`
//! - **Configuration** - typed YAML configuration with defaults
//!
//! # Architecture
//!
//! This crate follows the hexagonal (ports & adapters) architecture pattern.
//! The domain module contains pure diff/plan logic with no I/O dependencies.
//! Ports define trait interfaces that adapter crates implement: the S3
//! object store lives in `bucketlink-store` and the local filesystem tree
//! in `bucketlink-sync`.

pub mod config;
pub mod domain;
pub mod ports;
