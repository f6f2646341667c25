//! Full-rescan synchronization engine
//!
//! The [`SyncEngine`] orchestrates bidirectional synchronization between a
//! local tree and a remote object store.
//!
//! ## Sync Flow
//!
//! 1. **Snapshot**: scan the local tree and list the bucket
//! 2. **Diff**: classify every key into match / mismatch / one-sided
//! 3. **Plan**: apply the policy table for (direction, mode)
//! 4. **Apply**: execute actions sequentially, one key at a time
//!
//! A failed action aborts the remaining actions for its key but the run
//! continues with independent keys. The run's [`SyncReport`] records every
//! outcome; when any key failed the report travels inside
//! [`SyncError::Partial`] rather than being silently swallowed.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use bucketlink_core::domain::plan::{Action, SyncPlan};
use bucketlink_core::domain::policy::{build_plan, ConflictMode, Direction};
use bucketlink_core::domain::record::{classify, Relation, TreeSnapshot};
use bucketlink_core::domain::{RelativeKey, RunId};
use bucketlink_core::ports::{ILocalTree, IObjectStore};

use crate::ignore::IgnoreRules;
use crate::report::{ActionFailure, SyncReport};
use crate::SyncError;

/// Orchestrates snapshot → diff → plan → apply against the two ports.
pub struct SyncEngine {
    local: Arc<dyn ILocalTree>,
    remote: Arc<dyn IObjectStore>,
    ignore: IgnoreRules,
}

impl SyncEngine {
    pub fn new(local: Arc<dyn ILocalTree>, remote: Arc<dyn IObjectStore>) -> Self {
        Self {
            local,
            remote,
            ignore: IgnoreRules::empty(),
        }
    }

    /// Replace the ignore rules applied to both snapshots.
    #[must_use]
    pub fn with_ignore(mut self, ignore: IgnoreRules) -> Self {
        self.ignore = ignore;
        self
    }

    /// Make the bucket match the local tree.
    pub async fn push(&self, safe: bool) -> Result<SyncReport, SyncError> {
        self.sync(Direction::Push, ConflictMode::from_safe_flag(safe))
            .await
    }

    /// Make the local tree match the bucket.
    pub async fn pull(&self, safe: bool) -> Result<SyncReport, SyncError> {
        self.sync(Direction::Pull, ConflictMode::from_safe_flag(safe))
            .await
    }

    /// Compute the plan without applying it (dry runs).
    pub async fn plan(
        &self,
        direction: Direction,
        mode: ConflictMode,
    ) -> Result<SyncPlan, SyncError> {
        let (local, remote) = self.snapshots().await?;
        Ok(build_plan(&local, &remote, direction, mode)?)
    }

    /// Classify every key without planning anything (status display).
    pub async fn classify(&self) -> Result<Vec<(RelativeKey, Relation)>, SyncError> {
        let (local, remote) = self.snapshots().await?;
        Ok(classify(&local, &remote))
    }

    async fn sync(&self, direction: Direction, mode: ConflictMode) -> Result<SyncReport, SyncError> {
        let plan = self.plan(direction, mode).await?;
        info!(
            %direction,
            %mode,
            keys = plan.len(),
            mutations = plan.mutation_count(),
            "plan computed"
        );
        self.apply(plan).await
    }

    async fn snapshots(&self) -> Result<(TreeSnapshot, TreeSnapshot), SyncError> {
        let local_records = self
            .local
            .scan()
            .await
            .map_err(|source| SyncError::Enumeration {
                side: "local",
                source,
            })?;
        let remote_records = self
            .remote
            .list()
            .await
            .map_err(|source| SyncError::Enumeration {
                side: "remote",
                source,
            })?;

        let mut local = TreeSnapshot::from_records(local_records);
        let mut remote = TreeSnapshot::from_records(remote_records);
        if !self.ignore.is_empty() {
            local.retain(|key| !self.ignore.is_ignored(key));
            remote.retain(|key| !self.ignore.is_ignored(key));
        }

        debug!(
            local_files = local.len(),
            remote_objects = remote.len(),
            "snapshots taken"
        );
        Ok((local, remote))
    }

    /// Execute a plan action by action.
    pub async fn apply(&self, plan: SyncPlan) -> Result<SyncReport, SyncError> {
        let run_id = RunId::new();
        let started_at = Utc::now();

        let mut kept = 0u32;
        let mut copied = 0u32;
        let mut renamed = 0u32;
        let mut deleted = 0u32;
        let mut failures = Vec::new();

        for step in &plan.steps {
            for action in &step.actions {
                match self.apply_action(action).await {
                    Ok(()) => match action {
                        Action::Keep { .. } => kept += 1,
                        Action::CopyLocalToRemote { .. } | Action::CopyRemoteToLocal { .. } => {
                            copied += 1;
                        }
                        Action::RenameLocal { .. } | Action::RenameRemote { .. } => renamed += 1,
                        Action::DeleteLocal { .. } | Action::DeleteRemote { .. } => deleted += 1,
                    },
                    Err(source) => {
                        // Abort the rest of this key's actions; in safe mode
                        // the overwriting copy must never run after a failed
                        // preserving rename.
                        let err = SyncError::Transfer {
                            key: step.key.clone(),
                            source,
                        };
                        warn!(key = %step.key, action = %action, error = %err, "action failed");
                        failures.push(ActionFailure {
                            key: step.key.clone(),
                            action: action.to_string(),
                            error: err.to_string(),
                        });
                        break;
                    }
                }
            }
        }

        let report = SyncReport {
            run_id,
            direction: plan.direction,
            mode: plan.mode,
            started_at,
            finished_at: Utc::now(),
            keys: plan.len(),
            kept,
            copied,
            renamed,
            deleted,
            failures,
        };

        if report.is_clean() {
            info!(%run_id, %report, "sync complete");
            Ok(report)
        } else {
            warn!(%run_id, %report, "sync completed with failures");
            Err(SyncError::Partial {
                report: Box::new(report),
            })
        }
    }

    async fn apply_action(&self, action: &Action) -> anyhow::Result<()> {
        match action {
            Action::Keep { .. } => Ok(()),
            Action::CopyLocalToRemote { key } => {
                let data = self.local.read(key).await?;
                self.remote.put(key, &data).await
            }
            Action::CopyRemoteToLocal { key } => {
                let data = self.remote.get(key).await?;
                self.local.write(key, &data).await
            }
            Action::RenameLocal { from, to } => self.local.rename(from, to).await,
            Action::RenameRemote { from, to } => self.remote.rename(from, to).await,
            Action::DeleteLocal { key } => self.local.delete(key).await,
            Action::DeleteRemote { key } => self.remote.delete(key).await,
        }
    }
}
