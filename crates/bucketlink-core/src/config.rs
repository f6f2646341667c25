//! Configuration module for bucketlink.
//!
//! Provides typed configuration structs that map to the YAML configuration
//! file, with loading, validation and defaults. Credentials are never part
//! of this file; they come from the standard AWS environment/profile chain.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::newtypes::{BucketName, LocalRoot};
use crate::domain::DomainError;

/// Top-level configuration for bucketlink.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bucket: BucketConfig,
    pub sync: SyncConfig,
    pub logging: LoggingConfig,
}

/// Remote bucket settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BucketConfig {
    /// Name of the S3 bucket this tree is linked to.
    pub name: String,
    /// AWS region override. Falls back to the environment's region.
    pub region: Option<String>,
    /// Endpoint URL override, for S3-compatible stores.
    pub endpoint: Option<String>,
    /// Create the bucket on first use instead of failing when it is absent.
    pub create_missing: bool,
}

/// Local tree settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Root directory of the local mirror.
    pub root: PathBuf,
    /// Glob patterns for keys excluded from both sides of the diff.
    pub ignore: Vec<String>,
    /// Create the root directory instead of failing when it is absent.
    pub create_root: bool,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
}

impl Default for BucketConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            region: None,
            endpoint: None,
            create_missing: false,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            root: dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("~"))
                .join("bucketlink"),
            ignore: Vec::new(),
            create_root: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/bucketlink/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("bucketlink")
            .join("config.yaml")
    }

    /// The configured bucket name, validated.
    pub fn bucket_name(&self) -> Result<BucketName, DomainError> {
        if self.bucket.name.is_empty() {
            return Err(DomainError::InvalidBucketName(
                "no bucket configured; set bucket.name".to_string(),
            ));
        }
        BucketName::new(self.bucket.name.clone())
    }

    /// The configured local root, validated.
    pub fn local_root(&self) -> Result<LocalRoot, DomainError> {
        LocalRoot::new(self.sync.root.clone())
    }
}
