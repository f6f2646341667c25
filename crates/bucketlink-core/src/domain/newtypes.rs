//! Domain newtypes with validation
//!
//! This module provides strongly-typed wrappers for domain identifiers and
//! values. Each newtype ensures data validity at construction time.
//!
//! Paths are the subtle one: a [`RelativeKey`] is always `/`-separated and
//! always relative, regardless of the operating system. OS separators are
//! converted at the filesystem adapter boundary only, never inside the
//! domain.

use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::DomainError;

// ============================================================================
// RelativeKey
// ============================================================================

/// A normalized relative path identifying a file on either side of a sync.
///
/// Invariants, enforced at construction:
/// - non-empty, no leading or trailing `/`
/// - `/`-separated; backslashes are rejected
/// - no empty, `.` or `..` segments
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelativeKey(String);

impl RelativeKey {
    /// Create a validated key from a `/`-separated relative path.
    pub fn new(key: impl Into<String>) -> Result<Self, DomainError> {
        let key = key.into();
        if key.is_empty() {
            return Err(DomainError::InvalidKey("empty key".to_string()));
        }
        if key.contains('\\') {
            return Err(DomainError::InvalidKey(format!(
                "backslash in key '{key}'; keys are /-separated"
            )));
        }
        if key.starts_with('/') || key.ends_with('/') {
            return Err(DomainError::InvalidKey(format!(
                "key '{key}' must not start or end with '/'"
            )));
        }
        for segment in key.split('/') {
            if segment.is_empty() || segment == "." || segment == ".." {
                return Err(DomainError::InvalidKey(format!(
                    "invalid segment '{segment}' in key '{key}'"
                )));
            }
        }
        Ok(Self(key))
    }

    /// Build a key that is already known to satisfy the invariants.
    ///
    /// Only for construction from validated parts (see [`super::namer`]).
    pub(crate) fn from_validated(key: String) -> Self {
        Self(key)
    }

    /// The key as a `/`-separated string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The final path segment (the file name).
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// The directory portion of the key, if any.
    #[must_use]
    pub fn parent(&self) -> Option<&str> {
        self.0.rfind('/').map(|pos| &self.0[..pos])
    }

    /// Replace the file name, keeping the directory portion.
    ///
    /// `name` must itself be a valid single segment.
    pub fn with_file_name(&self, name: &str) -> Result<Self, DomainError> {
        let full = match self.parent() {
            Some(dir) => format!("{dir}/{name}"),
            None => name.to_string(),
        };
        Self::new(full)
    }

    /// Path segments, in order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }
}

impl Display for RelativeKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RelativeKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

// ============================================================================
// Hatch (content signature)
// ============================================================================

/// An opaque content signature used to detect whether two same-named files
/// differ in content.
///
/// Locally this is the lowercase-hex MD5 digest of the file content;
/// remotely it is the S3 ETag with surrounding quotes stripped. Single-part
/// uploads make the two directly comparable. Multipart uploads produce
/// composite ETags (`<hex>-<parts>`) that never equal a plain digest, so
/// such objects always classify as changed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hatch(String);

impl Hatch {
    /// Create a hatch from a signature string.
    pub fn new(signature: impl Into<String>) -> Result<Self, DomainError> {
        let signature = signature.into();
        if signature.is_empty() {
            return Err(DomainError::InvalidHatch("empty signature".to_string()));
        }
        if signature
            .chars()
            .any(|c| c.is_whitespace() || c == '"' || c == '\'')
        {
            return Err(DomainError::InvalidHatch(format!(
                "signature '{signature}' contains whitespace or quotes"
            )));
        }
        Ok(Self(signature))
    }

    /// Create a hatch from a raw S3 ETag header value.
    ///
    /// ETags arrive wrapped in double quotes (`"d41d8c..."`).
    pub fn from_etag(etag: &str) -> Result<Self, DomainError> {
        Self::new(etag.trim_matches('"'))
    }

    /// The signature as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this signature came from a multipart upload.
    #[must_use]
    pub fn is_composite(&self) -> bool {
        self.0.contains('-')
    }
}

impl Display for Hatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// BucketName
// ============================================================================

/// A validated S3 bucket name.
///
/// Enforces the conservative subset of the S3 naming rules: 3-63 characters,
/// lowercase letters, digits, `-` and `.`, starting and ending alphanumeric.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BucketName(String);

impl BucketName {
    /// Create a validated bucket name.
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        if name.len() < 3 || name.len() > 63 {
            return Err(DomainError::InvalidBucketName(format!(
                "'{name}' must be 3-63 characters"
            )));
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
        {
            return Err(DomainError::InvalidBucketName(format!(
                "'{name}' may only contain lowercase letters, digits, '-' and '.'"
            )));
        }
        let first = name.chars().next().unwrap_or(' ');
        let last = name.chars().last().unwrap_or(' ');
        if !first.is_ascii_alphanumeric() || !last.is_ascii_alphanumeric() {
            return Err(DomainError::InvalidBucketName(format!(
                "'{name}' must start and end with a letter or digit"
            )));
        }
        Ok(Self(name))
    }

    /// The bucket name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for BucketName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BucketName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

// ============================================================================
// LocalRoot
// ============================================================================

/// The absolute path of the local directory being synced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalRoot(PathBuf);

impl LocalRoot {
    /// Create a local root from an absolute path.
    pub fn new(path: PathBuf) -> Result<Self, DomainError> {
        if !path.is_absolute() {
            return Err(DomainError::InvalidRoot(format!(
                "'{}' is not an absolute path",
                path.display()
            )));
        }
        Ok(Self(path))
    }

    /// The root as a `Path`.
    #[must_use]
    pub fn as_path(&self) -> &std::path::Path {
        &self.0
    }

    /// Resolve a key to an absolute path under this root.
    ///
    /// This is where `/`-separated keys become OS paths.
    #[must_use]
    pub fn join_key(&self, key: &RelativeKey) -> PathBuf {
        let mut path = self.0.clone();
        for segment in key.segments() {
            path.push(segment);
        }
        path
    }
}

impl Display for LocalRoot {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

// ============================================================================
// RunId
// ============================================================================

/// Identifier for a single sync run, stamped into the run report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(Uuid);

impl RunId {
    /// Create a new random RunId
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the inner UUID value
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RunId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RunId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| DomainError::InvalidId(format!("Invalid RunId: {e}")))
    }
}
