//! Object store port (driven/secondary port)
//!
//! This module defines the interface for the remote side of a sync. The
//! primary implementation targets S3, but the trait is backend-agnostic:
//! anything that can list keyed objects with content signatures and
//! copy/delete them can stand in (the engine tests use an in-memory fake).
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because errors at port boundaries are
//!   adapter-specific and don't need domain-level classification.
//! - `rename` is part of the port even though object stores have no native
//!   rename; the adapter implements it as copy + delete. Keeping it here
//!   lets the engine treat both sides symmetrically.
//! - `list` returns the full keyspace; there is no pagination at the port
//!   level. Paging through the backend's listing API is the adapter's job.

use crate::domain::newtypes::RelativeKey;
use crate::domain::record::FileRecord;

/// Port trait for remote object storage operations
#[async_trait::async_trait]
pub trait IObjectStore: Send + Sync {
    /// Enumerate every object in the bucket as key + content hatch.
    async fn list(&self) -> anyhow::Result<Vec<FileRecord>>;

    /// Fetch an object's content.
    async fn get(&self, key: &RelativeKey) -> anyhow::Result<Vec<u8>>;

    /// Store an object, replacing any existing object at the key.
    async fn put(&self, key: &RelativeKey, data: &[u8]) -> anyhow::Result<()>;

    /// Move an object to a new key (copy + delete underneath).
    ///
    /// The source must exist; the target is overwritten if present.
    async fn rename(&self, from: &RelativeKey, to: &RelativeKey) -> anyhow::Result<()>;

    /// Remove an object.
    async fn delete(&self, key: &RelativeKey) -> anyhow::Result<()>;
}
