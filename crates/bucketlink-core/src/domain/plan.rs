//! Sync plans
//!
//! A [`SyncPlan`] is the ordered list of actions computed from a diff.
//! Actions are grouped per key into [`PlanStep`]s so a failure can abort
//! the rest of one key's actions without touching independent keys.
//!
//! Within a step the order is significant: in safe mode the preserving
//! rename always precedes the overwriting copy.

use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};

use serde::Serialize;

use super::errors::DomainError;
use super::newtypes::RelativeKey;
use super::policy::{ConflictMode, Direction};

/// A single reconciliation action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Both sides already agree; nothing to do.
    Keep { key: RelativeKey },
    /// Upload the local file, overwriting any remote object at the key.
    CopyLocalToRemote { key: RelativeKey },
    /// Download the remote object, overwriting any local file at the key.
    CopyRemoteToLocal { key: RelativeKey },
    /// Move a local file to a revision name.
    RenameLocal { from: RelativeKey, to: RelativeKey },
    /// Move a remote object to a revision name (copy + delete).
    RenameRemote { from: RelativeKey, to: RelativeKey },
    /// Remove a local file.
    DeleteLocal { key: RelativeKey },
    /// Remove a remote object.
    DeleteRemote { key: RelativeKey },
}

impl Action {
    /// True for [`Action::Keep`].
    #[must_use]
    pub fn is_keep(&self) -> bool {
        matches!(self, Action::Keep { .. })
    }

    /// The rename target, for rename actions.
    #[must_use]
    pub fn rename_target(&self) -> Option<&RelativeKey> {
        match self {
            Action::RenameLocal { to, .. } | Action::RenameRemote { to, .. } => Some(to),
            _ => None,
        }
    }

    fn is_copy(&self) -> bool {
        matches!(
            self,
            Action::CopyLocalToRemote { .. } | Action::CopyRemoteToLocal { .. }
        )
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Action::Keep { key } => write!(f, "keep {key}"),
            Action::CopyLocalToRemote { key } => write!(f, "copy local -> remote {key}"),
            Action::CopyRemoteToLocal { key } => write!(f, "copy remote -> local {key}"),
            Action::RenameLocal { from, to } => write!(f, "rename local {from} -> {to}"),
            Action::RenameRemote { from, to } => write!(f, "rename remote {from} -> {to}"),
            Action::DeleteLocal { key } => write!(f, "delete local {key}"),
            Action::DeleteRemote { key } => write!(f, "delete remote {key}"),
        }
    }
}

/// The actions for one key, applied in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanStep {
    pub key: RelativeKey,
    pub actions: Vec<Action>,
}

/// An ordered set of actions reconciling the two trees.
#[derive(Debug, Clone, Serialize)]
pub struct SyncPlan {
    pub direction: Direction,
    pub mode: ConflictMode,
    pub steps: Vec<PlanStep>,
}

impl SyncPlan {
    /// Number of keys in the plan.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of actions that would change either side.
    #[must_use]
    pub fn mutation_count(&self) -> usize {
        self.steps
            .iter()
            .flat_map(|step| &step.actions)
            .filter(|action| !action.is_keep())
            .count()
    }

    /// True when the plan changes nothing (every action is Keep).
    #[must_use]
    pub fn is_mutation_free(&self) -> bool {
        self.mutation_count() == 0
    }

    /// Check the plan's own invariants.
    ///
    /// - rename targets are unique, and collide with no key in the plan
    /// - within a step, renames precede the overwriting copy
    pub fn validate(&self) -> Result<(), DomainError> {
        let keys: BTreeSet<&RelativeKey> = self.steps.iter().map(|step| &step.key).collect();
        let mut targets: BTreeSet<&RelativeKey> = BTreeSet::new();

        for step in &self.steps {
            let mut copy_seen = false;
            for action in &step.actions {
                if action.is_copy() {
                    copy_seen = true;
                }
                if let Some(target) = action.rename_target() {
                    if copy_seen {
                        return Err(DomainError::PlanInconsistency(format!(
                            "rename to '{target}' ordered after an overwriting copy"
                        )));
                    }
                    if keys.contains(target) {
                        return Err(DomainError::PlanInconsistency(format!(
                            "rename target '{target}' collides with an existing key"
                        )));
                    }
                    if !targets.insert(target) {
                        return Err(DomainError::PlanInconsistency(format!(
                            "duplicate rename target '{target}'"
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

impl Display for SyncPlan {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({}) plan:", self.direction, self.mode)?;
        for step in &self.steps {
            for action in &step.actions {
                writeln!(f, "  {action}")?;
            }
        }
        Ok(())
    }
}
