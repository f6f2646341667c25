//! Ignore-pattern filtering
//!
//! Compiles the `sync.ignore` glob patterns from configuration and decides
//! which keys stay out of the diff entirely. A pattern matches against the
//! full `/`-separated key and against the bare file name, so `.DS_Store`
//! excludes that file at any depth without requiring `**/` prefixes.
//!
//! Invalid patterns are logged and skipped, never fatal.

use glob::Pattern;
use tracing::{debug, warn};

use bucketlink_core::domain::RelativeKey;

/// Compiled ignore rules
#[derive(Debug, Default)]
pub struct IgnoreRules {
    patterns: Vec<Pattern>,
}

impl IgnoreRules {
    /// Rules that ignore nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Compile a list of glob patterns, skipping invalid ones.
    #[must_use]
    pub fn compile(patterns: &[String]) -> Self {
        let compiled: Vec<Pattern> = patterns
            .iter()
            .filter_map(|raw| match Pattern::new(raw) {
                Ok(p) => Some(p),
                Err(e) => {
                    warn!(pattern = %raw, error = %e, "Skipping invalid ignore pattern");
                    None
                }
            })
            .collect();

        debug!(rules_count = compiled.len(), "Ignore rules compiled");
        Self { patterns: compiled }
    }

    /// Whether a key is excluded from the sync.
    #[must_use]
    pub fn is_ignored(&self, key: &RelativeKey) -> bool {
        self.patterns
            .iter()
            .any(|p| p.matches(key.as_str()) || p.matches(key.file_name()))
    }

    /// Number of compiled rules
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
