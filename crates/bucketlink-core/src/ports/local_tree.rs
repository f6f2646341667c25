//! Local tree port (driven/secondary port)
//!
//! This module defines the interface for the local side of a sync: a
//! directory tree addressed by the same `/`-separated relative keys the
//! object store uses. Converting keys to OS paths is the adapter's job;
//! the engine never sees a `PathBuf`.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because filesystem errors are adapter-specific.
//! - `scan` walks recursively and hashes file content, so it is the
//!   expensive call; each sync run performs exactly one scan per side.
//! - `write` must be atomic (temp file + rename) so a crash mid-download
//!   never leaves a half-written file that would hash as a phantom change
//!   on the next run.

use crate::domain::newtypes::RelativeKey;
use crate::domain::record::FileRecord;

/// Port trait for local filesystem tree operations
#[async_trait::async_trait]
pub trait ILocalTree: Send + Sync {
    /// Enumerate every file under the root as key + content hatch.
    async fn scan(&self) -> anyhow::Result<Vec<FileRecord>>;

    /// Read a file's content.
    async fn read(&self, key: &RelativeKey) -> anyhow::Result<Vec<u8>>;

    /// Write a file atomically, creating parent directories as needed.
    async fn write(&self, key: &RelativeKey, data: &[u8]) -> anyhow::Result<()>;

    /// Move a file to a new key within the root.
    async fn rename(&self, from: &RelativeKey, to: &RelativeKey) -> anyhow::Result<()>;

    /// Remove a file, pruning directories left empty.
    async fn delete(&self, key: &RelativeKey) -> anyhow::Result<()>;
}
