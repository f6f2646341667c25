//! Domain error types
//!
//! This module defines error types specific to domain operations:
//! validation failures for keys, hatches and bucket names, and plan
//! consistency violations.

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid relative key format or content
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Invalid content signature
    #[error("Invalid hatch: {0}")]
    InvalidHatch(String),

    /// Invalid bucket name
    #[error("Invalid bucket name: {0}")]
    InvalidBucketName(String),

    /// Local root is not an absolute path
    #[error("Invalid local root: {0}")]
    InvalidRoot(String),

    /// A computed plan violates its own invariants
    /// (e.g. two renames targeting the same key)
    #[error("Inconsistent plan: {0}")]
    PlanInconsistency(String),

    /// ID parsing error
    #[error("Invalid ID format: {0}")]
    InvalidId(String),
}
