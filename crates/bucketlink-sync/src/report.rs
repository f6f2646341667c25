//! Per-run sync reports
//!
//! Nothing persists across runs, so the report is the only record a run
//! leaves behind: what was kept, copied, renamed and deleted, and which
//! keys failed. The CLI renders it; partial failures carry it inside the
//! error value.

use std::fmt::{self, Display, Formatter};

use chrono::{DateTime, Utc};
use serde::Serialize;

use bucketlink_core::domain::{ConflictMode, Direction, RelativeKey, RunId};

/// A single failed action, with the rest of its key's actions skipped.
#[derive(Debug, Clone, Serialize)]
pub struct ActionFailure {
    pub key: RelativeKey,
    pub action: String,
    pub error: String,
}

/// Summary of a completed synchronization run
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub run_id: RunId,
    pub direction: Direction,
    pub mode: ConflictMode,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Number of keys in the plan
    pub keys: usize,
    pub kept: u32,
    pub copied: u32,
    pub renamed: u32,
    pub deleted: u32,
    pub failures: Vec<ActionFailure>,
}

impl SyncReport {
    /// True when every action applied cleanly.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Wall-clock duration of the run in milliseconds.
    #[must_use]
    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

impl Display for SyncReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): {} copied, {} renamed, {} deleted, {} kept",
            self.direction, self.mode, self.copied, self.renamed, self.deleted, self.kept
        )?;
        if !self.failures.is_empty() {
            write!(f, ", {} failed", self.failures.len())?;
        }
        Ok(())
    }
}
