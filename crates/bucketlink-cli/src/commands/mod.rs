//! CLI subcommands and shared adapter wiring

pub mod completions;
pub mod config;
pub mod pull;
pub mod push;
pub mod status;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use bucketlink_core::config::Config;
use bucketlink_store::S3ObjectStore;
use bucketlink_sync::engine::SyncEngine;
use bucketlink_sync::ignore::IgnoreRules;
use bucketlink_sync::tree::LocalTree;

use crate::CliOptions;

/// Load configuration, honoring an explicit `--config` path.
///
/// A missing default config file falls back to defaults; a missing
/// explicitly-given file is an error.
pub(crate) fn load_config(opts: &CliOptions) -> Result<Config> {
    match &opts.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading config from '{}'", path.display())),
        None => Ok(Config::load_or_default(&Config::default_path())),
    }
}

/// Wire up both adapters and the engine for a sync run.
pub(crate) async fn build_engine(
    config: &Config,
    create_bucket: bool,
    create_root: bool,
) -> Result<SyncEngine> {
    let bucket = config.bucket_name()?;
    let root = config.local_root()?;

    info!(bucket = %bucket, root = %root, "linking local tree to bucket");

    let tree = if create_root || config.sync.create_root {
        LocalTree::ensure_root(root)?
    } else {
        LocalTree::open(root)?
    };

    let store = S3ObjectStore::connect(&config.bucket, bucket).await;
    store
        .ensure_bucket(create_bucket || config.bucket.create_missing)
        .await?;

    Ok(
        SyncEngine::new(Arc::new(tree), Arc::new(store))
            .with_ignore(IgnoreRules::compile(&config.sync.ignore)),
    )
}
