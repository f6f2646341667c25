//! Error types for the S3 store adapter

use thiserror::Error;

/// Errors that can occur while talking to the object store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Missing or invalid credentials, region, or bucket settings
    #[error("bucket configuration error: {0}")]
    Configuration(String),

    /// The configured bucket does not exist
    #[error("bucket '{0}' does not exist (enable bucket.create_missing to create it)")]
    BucketMissing(String),

    /// A single request against the store failed
    #[error("object store request failed: {0}")]
    Request(String),
}
