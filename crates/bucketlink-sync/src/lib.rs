//! bucketlink Sync - full-rescan synchronization engine
//!
//! Provides:
//! - The [`engine::SyncEngine`] orchestrating snapshot → diff → plan → apply
//! - The local filesystem adapter implementing the `ILocalTree` port
//! - Ignore-pattern filtering applied to both sides of the diff
//! - Per-run reports with per-key failure isolation
//!
//! ## Modules
//!
//! - [`engine`] - push/pull entry points and plan execution
//! - [`tree`] - local filesystem adapter (recursive scan, MD5 hatches,
//!   atomic writes)
//! - [`ignore`] - compiled glob rules excluding keys from the diff
//! - [`report`] - the per-run [`report::SyncReport`]

pub mod engine;
pub mod ignore;
pub mod report;
pub mod tree;

use bucketlink_core::domain::{DomainError, RelativeKey};
use thiserror::Error;

use crate::report::SyncReport;

/// Errors that can occur during synchronization operations
#[derive(Debug, Error)]
pub enum SyncError {
    /// Missing or invalid configuration (bucket, credentials)
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Local root missing or not a directory
    #[error("local root error: {0}")]
    Path(String),

    /// One side of the diff could not be enumerated
    #[error("failed to enumerate {side} tree: {source}")]
    Enumeration {
        side: &'static str,
        #[source]
        source: anyhow::Error,
    },

    /// A single copy/rename/delete failed
    #[error("transfer failed for '{key}': {source}")]
    Transfer {
        key: RelativeKey,
        #[source]
        source: anyhow::Error,
    },

    /// The computed plan violates its own invariants
    #[error("conflict: {0}")]
    Conflict(#[from] DomainError),

    /// The plan ran to the end but some keys failed
    #[error("sync finished with {} failed key(s) out of {}", report.failures.len(), report.keys)]
    Partial { report: Box<SyncReport> },
}
