//! Local filesystem adapter (secondary/driven adapter)
//!
//! Implements [`ILocalTree`] using `tokio::fs` for async file operations.
//!
//! ## Design Decisions
//!
//! - **Atomic writes**: Uses write-to-temp + rename to avoid partial writes
//!   on crash or power loss. A half-written file would hash as a phantom
//!   change on the next scan.
//! - **MD5 hatches**: The content signature is the lowercase-hex MD5 of the
//!   file bytes, directly comparable to the ETag of a single-part S3 upload.
//! - **Keys, not paths**: Every public method speaks `/`-separated
//!   [`RelativeKey`]s; OS separators exist only inside this module.
//! - **Directory pruning**: Deleting a file removes parent directories left
//!   empty, up to (but never including) the root.

use std::path::{Path, PathBuf};

use md5::{Digest, Md5};
use tracing::{debug, instrument, warn};

use bucketlink_core::domain::newtypes::{Hatch, LocalRoot, RelativeKey};
use bucketlink_core::domain::record::FileRecord;
use bucketlink_core::domain::DomainError;
use bucketlink_core::ports::local_tree::ILocalTree;

use crate::SyncError;

/// Compute the hatch for a byte buffer.
pub fn content_hatch(data: &[u8]) -> Result<Hatch, DomainError> {
    let digest = Md5::digest(data);
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    Hatch::new(hex)
}

/// Adapter that bridges the [`ILocalTree`] port to the real filesystem.
#[derive(Debug, Clone)]
pub struct LocalTree {
    root: LocalRoot,
}

impl LocalTree {
    /// Open an existing root directory.
    ///
    /// Fails with a path error when the root is missing or not a directory.
    pub fn open(root: LocalRoot) -> Result<Self, SyncError> {
        let meta = std::fs::metadata(root.as_path())
            .map_err(|e| SyncError::Path(format!("'{root}': {e}")))?;
        if !meta.is_dir() {
            return Err(SyncError::Path(format!("'{root}' is not a directory")));
        }
        Ok(Self { root })
    }

    /// Create the root directory (and parents) if needed, then open it.
    pub fn ensure_root(root: LocalRoot) -> Result<Self, SyncError> {
        std::fs::create_dir_all(root.as_path())
            .map_err(|e| SyncError::Path(format!("creating '{root}': {e}")))?;
        Self::open(root)
    }

    /// The root this tree operates under.
    #[must_use]
    pub fn root(&self) -> &LocalRoot {
        &self.root
    }

    /// Derive the relative key for an absolute path under the root.
    fn key_for(&self, path: &Path) -> anyhow::Result<RelativeKey> {
        let relative = path.strip_prefix(self.root.as_path())?;
        let mut segments = Vec::new();
        for component in relative.components() {
            let os = component.as_os_str();
            let segment = os
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("non-UTF-8 path segment in '{}'", path.display()))?;
            segments.push(segment);
        }
        Ok(RelativeKey::new(segments.join("/"))?)
    }
}

#[async_trait::async_trait]
impl ILocalTree for LocalTree {
    #[instrument(skip(self), fields(root = %self.root))]
    async fn scan(&self) -> anyhow::Result<Vec<FileRecord>> {
        let mut pending = vec![self.root.as_path().to_path_buf()];
        let mut records = Vec::new();

        while let Some(dir) = pending.pop() {
            let mut entries = tokio::fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                let file_type = entry.file_type().await?;
                if file_type.is_dir() {
                    pending.push(path);
                    continue;
                }
                if !file_type.is_file() {
                    debug!(path = %path.display(), "skipping non-regular file");
                    continue;
                }
                match self.key_for(&path) {
                    Ok(key) => {
                        let data = tokio::fs::read(&path).await?;
                        records.push(FileRecord::new(key, content_hatch(&data)?));
                    }
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "skipping unrepresentable path");
                    }
                }
            }
        }

        debug!(files = records.len(), "local scan complete");
        Ok(records)
    }

    #[instrument(skip(self), fields(key = %key))]
    async fn read(&self, key: &RelativeKey) -> anyhow::Result<Vec<u8>> {
        let data = tokio::fs::read(self.root.join_key(key)).await?;
        debug!(bytes = data.len(), "file read complete");
        Ok(data)
    }

    #[instrument(skip(self, data), fields(key = %key, bytes = data.len()))]
    async fn write(&self, key: &RelativeKey, data: &[u8]) -> anyhow::Result<()> {
        let target = self.root.join_key(key);

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Write to a temporary file in the same directory so rename is
        // atomic (same filesystem).
        let tmp_path = {
            let mut p = target.as_os_str().to_owned();
            p.push(".tmp");
            PathBuf::from(p)
        };

        tokio::fs::write(&tmp_path, data).await?;
        tokio::fs::rename(&tmp_path, &target).await?;

        debug!("write complete");
        Ok(())
    }

    #[instrument(skip(self), fields(from = %from, to = %to))]
    async fn rename(&self, from: &RelativeKey, to: &RelativeKey) -> anyhow::Result<()> {
        let source = self.root.join_key(from);
        let target = self.root.join_key(to);

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::rename(&source, &target).await?;

        debug!("rename complete");
        Ok(())
    }

    #[instrument(skip(self), fields(key = %key))]
    async fn delete(&self, key: &RelativeKey) -> anyhow::Result<()> {
        let path = self.root.join_key(key);
        tokio::fs::remove_file(&path).await?;

        // Prune directories the delete left empty, stopping at the root.
        let mut dir = path.parent();
        while let Some(d) = dir {
            if d == self.root.as_path() {
                break;
            }
            let mut entries = match tokio::fs::read_dir(d).await {
                Ok(entries) => entries,
                Err(_) => break,
            };
            if entries.next_entry().await?.is_some() {
                break;
            }
            tokio::fs::remove_dir(d).await?;
            debug!(dir = %d.display(), "pruned empty directory");
            dir = d.parent();
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> RelativeKey {
        RelativeKey::new(s).unwrap()
    }

    fn open_tree(dir: &tempfile::TempDir) -> LocalTree {
        let root = LocalRoot::new(dir.path().to_path_buf()).unwrap();
        LocalTree::open(root).unwrap()
    }

    #[test]
    fn test_content_hatch_known_digest() {
        // md5("a")
        let hatch = content_hatch(b"a").unwrap();
        assert_eq!(hatch.as_str(), "0cc175b9c0f1b6a831c399e269772661");
    }

    #[test]
    fn test_open_missing_root_fails() {
        let root = LocalRoot::new(PathBuf::from("/nonexistent/bucketlink-test")).unwrap();
        assert!(matches!(LocalTree::open(root), Err(SyncError::Path(_))));
    }

    #[test]
    fn test_ensure_root_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let root = LocalRoot::new(dir.path().join("new/nested")).unwrap();
        let tree = LocalTree::ensure_root(root).unwrap();
        assert!(tree.root().as_path().is_dir());
    }

    #[tokio::test]
    async fn test_scan_empty_root() {
        let dir = tempfile::tempdir().unwrap();
        let tree = open_tree(&dir);
        assert!(tree.scan().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_write_read_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let tree = open_tree(&dir);

        tree.write(&key("a.txt"), b"hello").await.unwrap();
        assert_eq!(tree.read(&key("a.txt")).await.unwrap(), b"hello");

        // No temp file left behind.
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn test_scan_nested_keys_use_forward_slashes() {
        let dir = tempfile::tempdir().unwrap();
        let tree = open_tree(&dir);

        tree.write(&key("sub1/1deep.file"), b"one").await.unwrap();
        tree.write(&key("sub1/sub2/2deep.file"), b"two")
            .await
            .unwrap();

        let mut keys: Vec<String> = tree
            .scan()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.key.as_str().to_string())
            .collect();
        keys.sort();
        assert_eq!(keys, vec!["sub1/1deep.file", "sub1/sub2/2deep.file"]);
    }

    #[tokio::test]
    async fn test_scan_hatches_content() {
        let dir = tempfile::tempdir().unwrap();
        let tree = open_tree(&dir);

        tree.write(&key("a.txt"), b"a").await.unwrap();
        let records = tree.scan().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].hatch.as_str(),
            "0cc175b9c0f1b6a831c399e269772661"
        );
    }

    #[tokio::test]
    async fn test_rename_creates_target_parent() {
        let dir = tempfile::tempdir().unwrap();
        let tree = open_tree(&dir);

        tree.write(&key("a.txt"), b"data").await.unwrap();
        tree.rename(&key("a.txt"), &key("archive/a_1.txt"))
            .await
            .unwrap();

        assert!(tree.read(&key("a.txt")).await.is_err());
        assert_eq!(tree.read(&key("archive/a_1.txt")).await.unwrap(), b"data");
    }

    #[tokio::test]
    async fn test_delete_prunes_empty_directories() {
        let dir = tempfile::tempdir().unwrap();
        let tree = open_tree(&dir);

        tree.write(&key("sub1/sub2/deep.file"), b"x").await.unwrap();
        tree.delete(&key("sub1/sub2/deep.file")).await.unwrap();

        assert!(!dir.path().join("sub1").exists());
        assert!(dir.path().exists());
    }

    #[tokio::test]
    async fn test_delete_keeps_nonempty_directories() {
        let dir = tempfile::tempdir().unwrap();
        let tree = open_tree(&dir);

        tree.write(&key("sub/one.txt"), b"1").await.unwrap();
        tree.write(&key("sub/two.txt"), b"2").await.unwrap();
        tree.delete(&key("sub/one.txt")).await.unwrap();

        assert!(dir.path().join("sub").exists());
        assert_eq!(tree.read(&key("sub/two.txt")).await.unwrap(), b"2");
    }

    #[tokio::test]
    async fn test_write_overwrites_existing() {
        let dir = tempfile::tempdir().unwrap();
        let tree = open_tree(&dir);

        tree.write(&key("a.txt"), b"old").await.unwrap();
        tree.write(&key("a.txt"), b"new").await.unwrap();
        assert_eq!(tree.read(&key("a.txt")).await.unwrap(), b"new");
    }
}
