//! The sync policy table
//!
//! [`build_plan`] turns a classified diff into a [`SyncPlan`] by applying
//! one row of the policy table per key:
//!
//! | mode         | match | hatch mismatch              | local only   | remote only  |
//! |--------------|-------|-----------------------------|--------------|--------------|
//! | push, safe   | keep  | rename old remote, upload   | upload       | rename remote|
//! | push, unsafe | keep  | upload (discard old remote) | upload       | delete remote|
//! | pull, safe   | keep  | rename old local, download  | rename local | download     |
//! | pull, unsafe | keep  | download (discard old local)| delete local | download     |
//!
//! Safe mode preserves every file that would otherwise be overwritten or
//! pruned, under a revision name that collides with nothing in either
//! snapshot nor with another target in the same plan. Unsafe mode discards
//! them; it is a destructive prune of files absent from the authoritative
//! side and must be requested explicitly.

use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use super::errors::DomainError;
use super::namer::RevisionNamer;
use super::plan::{Action, PlanStep, SyncPlan};
use super::record::{classify, Relation, TreeSnapshot};

/// Which side is authoritative for this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Local is authoritative; the bucket is made to match it.
    Push,
    /// The bucket is authoritative; the local tree is made to match it.
    Pull,
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Push => write!(f, "push"),
            Direction::Pull => write!(f, "pull"),
        }
    }
}

/// What happens to files the authoritative side would displace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictMode {
    /// Preserve superseded files under a revision name.
    Safe,
    /// Discard superseded files.
    Unsafe,
}

impl ConflictMode {
    /// Map the public `safe: bool` argument onto the mode.
    #[must_use]
    pub fn from_safe_flag(safe: bool) -> Self {
        if safe {
            ConflictMode::Safe
        } else {
            ConflictMode::Unsafe
        }
    }
}

impl Display for ConflictMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ConflictMode::Safe => write!(f, "safe"),
            ConflictMode::Unsafe => write!(f, "unsafe"),
        }
    }
}

/// Apply the policy table to the diff of the two snapshots.
///
/// The returned plan is validated: rename targets are collision-free and
/// every preserving rename precedes its overwriting copy.
pub fn build_plan(
    local: &TreeSnapshot,
    remote: &TreeSnapshot,
    direction: Direction,
    mode: ConflictMode,
) -> Result<SyncPlan, DomainError> {
    // Every name taken on either side; rename targets are added as they
    // are chosen so two conflicts can never claim the same revision name.
    let mut taken: BTreeSet<_> = local.keys().chain(remote.keys()).cloned().collect();

    let mut steps = Vec::new();
    for (key, relation) in classify(local, remote) {
        let actions = match (direction, mode, relation) {
            (_, _, Relation::Matching) => vec![Action::Keep { key: key.clone() }],

            (Direction::Push, ConflictMode::Safe, Relation::HatchMismatch) => {
                let to = RevisionNamer::next_available(&key, |k| taken.contains(k));
                taken.insert(to.clone());
                vec![
                    Action::RenameRemote {
                        from: key.clone(),
                        to,
                    },
                    Action::CopyLocalToRemote { key: key.clone() },
                ]
            }
            (Direction::Push, ConflictMode::Unsafe, Relation::HatchMismatch) => {
                vec![Action::CopyLocalToRemote { key: key.clone() }]
            }
            (Direction::Push, _, Relation::LocalOnly) => {
                vec![Action::CopyLocalToRemote { key: key.clone() }]
            }
            (Direction::Push, ConflictMode::Safe, Relation::RemoteOnly) => {
                let to = RevisionNamer::next_available(&key, |k| taken.contains(k));
                taken.insert(to.clone());
                vec![Action::RenameRemote {
                    from: key.clone(),
                    to,
                }]
            }
            (Direction::Push, ConflictMode::Unsafe, Relation::RemoteOnly) => {
                vec![Action::DeleteRemote { key: key.clone() }]
            }

            (Direction::Pull, ConflictMode::Safe, Relation::HatchMismatch) => {
                let to = RevisionNamer::next_available(&key, |k| taken.contains(k));
                taken.insert(to.clone());
                vec![
                    Action::RenameLocal {
                        from: key.clone(),
                        to,
                    },
                    Action::CopyRemoteToLocal { key: key.clone() },
                ]
            }
            (Direction::Pull, ConflictMode::Unsafe, Relation::HatchMismatch) => {
                vec![Action::CopyRemoteToLocal { key: key.clone() }]
            }
            (Direction::Pull, ConflictMode::Safe, Relation::LocalOnly) => {
                let to = RevisionNamer::next_available(&key, |k| taken.contains(k));
                taken.insert(to.clone());
                vec![Action::RenameLocal {
                    from: key.clone(),
                    to,
                }]
            }
            (Direction::Pull, ConflictMode::Unsafe, Relation::LocalOnly) => {
                vec![Action::DeleteLocal { key: key.clone() }]
            }
            (Direction::Pull, _, Relation::RemoteOnly) => {
                vec![Action::CopyRemoteToLocal { key: key.clone() }]
            }
        };
        steps.push(PlanStep { key, actions });
    }

    let plan = SyncPlan {
        direction,
        mode,
        steps,
    };
    plan.validate()?;
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::newtypes::{Hatch, RelativeKey};
    use crate::domain::record::FileRecord;

    fn key(s: &str) -> RelativeKey {
        RelativeKey::new(s).unwrap()
    }

    fn snapshot(entries: &[(&str, &str)]) -> TreeSnapshot {
        TreeSnapshot::from_records(
            entries
                .iter()
                .map(|(k, h)| FileRecord::new(key(k), Hatch::new(*h).unwrap()))
                .collect(),
        )
    }

    fn actions_for<'a>(plan: &'a SyncPlan, k: &str) -> &'a [Action] {
        &plan
            .steps
            .iter()
            .find(|step| step.key.as_str() == k)
            .expect("key missing from plan")
            .actions
    }

    #[test]
    fn test_one_sided_trees_copy_only() {
        // Nothing to prune or preserve on the receiving side: the plan is
        // pure copies in both modes.
        let files = snapshot(&[("a.txt", "h1"), ("sub/b.txt", "h2")]);
        let empty = TreeSnapshot::new();

        for mode in [ConflictMode::Safe, ConflictMode::Unsafe] {
            let push = build_plan(&files, &empty, Direction::Push, mode).unwrap();
            assert!(push.steps.iter().all(|s| s
                .actions
                .iter()
                .all(|a| matches!(a, Action::CopyLocalToRemote { .. }))));

            let pull = build_plan(&empty, &files, Direction::Pull, mode).unwrap();
            assert!(pull.steps.iter().all(|s| s
                .actions
                .iter()
                .all(|a| matches!(a, Action::CopyRemoteToLocal { .. }))));
        }
    }

    #[test]
    fn test_matching_is_always_keep() {
        let both = snapshot(&[("a.txt", "h1"), ("sub/b.txt", "h2")]);
        for direction in [Direction::Push, Direction::Pull] {
            for mode in [ConflictMode::Safe, ConflictMode::Unsafe] {
                let plan = build_plan(&both, &both, direction, mode).unwrap();
                assert!(plan.is_mutation_free(), "{direction} {mode}");
                assert_eq!(plan.len(), 2);
            }
        }
    }

    #[test]
    fn test_push_to_empty_remote_is_copy() {
        let local = snapshot(&[("a.txt", "h1")]);
        let plan = build_plan(
            &local,
            &TreeSnapshot::new(),
            Direction::Push,
            ConflictMode::Safe,
        )
        .unwrap();

        assert_eq!(
            actions_for(&plan, "a.txt"),
            &[Action::CopyLocalToRemote { key: key("a.txt") }]
        );
    }

    #[test]
    fn test_push_safe_conflict_renames_then_copies() {
        let local = snapshot(&[("a.txt", "h1")]);
        let remote = snapshot(&[("a.txt", "h2")]);
        let plan = build_plan(&local, &remote, Direction::Push, ConflictMode::Safe).unwrap();

        assert_eq!(
            actions_for(&plan, "a.txt"),
            &[
                Action::RenameRemote {
                    from: key("a.txt"),
                    to: key("a_1.txt"),
                },
                Action::CopyLocalToRemote { key: key("a.txt") },
            ]
        );
    }

    #[test]
    fn test_push_unsafe_conflict_overwrites() {
        let local = snapshot(&[("a.txt", "h1")]);
        let remote = snapshot(&[("a.txt", "h2")]);
        let plan = build_plan(&local, &remote, Direction::Push, ConflictMode::Unsafe).unwrap();

        assert_eq!(
            actions_for(&plan, "a.txt"),
            &[Action::CopyLocalToRemote { key: key("a.txt") }]
        );
    }

    #[test]
    fn test_push_safe_remote_only_is_renamed() {
        let remote = snapshot(&[("orphan.txt", "h9")]);
        let plan = build_plan(
            &TreeSnapshot::new(),
            &remote,
            Direction::Push,
            ConflictMode::Safe,
        )
        .unwrap();

        assert_eq!(
            actions_for(&plan, "orphan.txt"),
            &[Action::RenameRemote {
                from: key("orphan.txt"),
                to: key("orphan_1.txt"),
            }]
        );
    }

    #[test]
    fn test_push_unsafe_remote_only_is_deleted() {
        let remote = snapshot(&[("orphan.txt", "h9")]);
        let plan = build_plan(
            &TreeSnapshot::new(),
            &remote,
            Direction::Push,
            ConflictMode::Unsafe,
        )
        .unwrap();

        assert_eq!(
            actions_for(&plan, "orphan.txt"),
            &[Action::DeleteRemote {
                key: key("orphan.txt")
            }]
        );
    }

    #[test]
    fn test_pull_safe_conflict_renames_then_copies() {
        let local = snapshot(&[("a.txt", "h1")]);
        let remote = snapshot(&[("a.txt", "h2")]);
        let plan = build_plan(&local, &remote, Direction::Pull, ConflictMode::Safe).unwrap();

        assert_eq!(
            actions_for(&plan, "a.txt"),
            &[
                Action::RenameLocal {
                    from: key("a.txt"),
                    to: key("a_1.txt"),
                },
                Action::CopyRemoteToLocal { key: key("a.txt") },
            ]
        );
    }

    #[test]
    fn test_pull_unsafe_conflict_overwrites_local() {
        let local = snapshot(&[("a.txt", "h1")]);
        let remote = snapshot(&[("a.txt", "h2")]);
        let plan = build_plan(&local, &remote, Direction::Pull, ConflictMode::Unsafe).unwrap();

        assert_eq!(
            actions_for(&plan, "a.txt"),
            &[Action::CopyRemoteToLocal { key: key("a.txt") }]
        );
    }

    #[test]
    fn test_pull_safe_local_only_is_renamed() {
        let local = snapshot(&[("mine.txt", "h1")]);
        let plan = build_plan(
            &local,
            &TreeSnapshot::new(),
            Direction::Pull,
            ConflictMode::Safe,
        )
        .unwrap();

        assert_eq!(
            actions_for(&plan, "mine.txt"),
            &[Action::RenameLocal {
                from: key("mine.txt"),
                to: key("mine_1.txt"),
            }]
        );
    }

    #[test]
    fn test_pull_unsafe_local_only_is_deleted() {
        let local = snapshot(&[("mine.txt", "h1")]);
        let plan = build_plan(
            &local,
            &TreeSnapshot::new(),
            Direction::Pull,
            ConflictMode::Unsafe,
        )
        .unwrap();

        assert_eq!(
            actions_for(&plan, "mine.txt"),
            &[Action::DeleteLocal {
                key: key("mine.txt")
            }]
        );
    }

    #[test]
    fn test_rename_target_avoids_names_taken_on_either_side() {
        // a_1.txt already exists remotely; the revision for a.txt must
        // skip to a_2.txt.
        let local = snapshot(&[("a.txt", "h1")]);
        let remote = snapshot(&[("a.txt", "h2"), ("a_1.txt", "h3")]);
        let plan = build_plan(&local, &remote, Direction::Push, ConflictMode::Safe).unwrap();

        let rename = &actions_for(&plan, "a.txt")[0];
        assert_eq!(
            rename.rename_target().map(RelativeKey::as_str),
            Some("a_2.txt")
        );
    }

    #[test]
    fn test_rename_targets_unique_across_plan() {
        // Two conflicting keys whose natural revision names would collide
        // with nothing; make sure each gets its own target anyway.
        let local = snapshot(&[("a.txt", "h1"), ("b.txt", "h2")]);
        let remote = snapshot(&[("a.txt", "h8"), ("b.txt", "h9")]);
        let plan = build_plan(&local, &remote, Direction::Push, ConflictMode::Safe).unwrap();

        let targets: Vec<_> = plan
            .steps
            .iter()
            .flat_map(|s| &s.actions)
            .filter_map(Action::rename_target)
            .collect();
        assert_eq!(targets.len(), 2);
        assert_ne!(targets[0], targets[1]);
    }

    #[test]
    fn test_full_fixture_push_safe() {
        // One file per relation, as in the classification fixture.
        let local = snapshot(&[
            ("hash_same", "h1"),
            ("hash_different", "h2"),
            ("local_only", "h3"),
        ]);
        let remote = snapshot(&[
            ("hash_same", "h1"),
            ("hash_different", "h9"),
            ("remote_only", "h4"),
        ]);

        let plan = build_plan(&local, &remote, Direction::Push, ConflictMode::Safe).unwrap();

        assert_eq!(
            actions_for(&plan, "hash_same"),
            &[Action::Keep {
                key: key("hash_same")
            }]
        );
        assert_eq!(actions_for(&plan, "hash_different").len(), 2);
        assert_eq!(
            actions_for(&plan, "local_only"),
            &[Action::CopyLocalToRemote {
                key: key("local_only")
            }]
        );
        assert_eq!(
            actions_for(&plan, "remote_only"),
            &[Action::RenameRemote {
                from: key("remote_only"),
                to: key("remote_only_1"),
            }]
        );
    }

    #[test]
    fn test_subdirectory_keys_keep_directory_in_rename() {
        let local = snapshot(&[("sub1/deep.file", "h1")]);
        let remote = snapshot(&[("sub1/deep.file", "h2")]);
        let plan = build_plan(&local, &remote, Direction::Pull, ConflictMode::Safe).unwrap();

        let rename = &actions_for(&plan, "sub1/deep.file")[0];
        assert_eq!(
            rename.rename_target().map(RelativeKey::as_str),
            Some("sub1/deep_1.file")
        );
    }
}
