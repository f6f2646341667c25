//! File records and diff classification
//!
//! A [`FileRecord`] is the unit both adapters produce when enumerating a
//! tree: a relative key plus a content signature. Two records with the same
//! key and hatch are matching; same key with differing hatches is a name
//! conflict; a key present on one side only is local-only or remote-only.
//!
//! [`classify`] computes the relation for every key present in either
//! snapshot. Each run recomputes the full diff from scratch; there is no
//! manifest or incremental index.

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use serde::Serialize;

use super::newtypes::{Hatch, RelativeKey};

/// A file observed on one side of the sync: relative key + content hatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    pub key: RelativeKey,
    pub hatch: Hatch,
}

impl FileRecord {
    #[must_use]
    pub fn new(key: RelativeKey, hatch: Hatch) -> Self {
        Self { key, hatch }
    }

    /// True iff both key and hatch are equal.
    #[must_use]
    pub fn matches(&self, other: &FileRecord) -> bool {
        self.key == other.key && self.hatch == other.hatch
    }

    /// True iff the keys are equal but the hatches differ.
    #[must_use]
    pub fn is_name_conflict(&self, other: &FileRecord) -> bool {
        self.key == other.key && self.hatch != other.hatch
    }
}

/// An enumerated tree, keyed for diffing. Keys iterate in sorted order.
#[derive(Debug, Clone, Default)]
pub struct TreeSnapshot {
    entries: BTreeMap<RelativeKey, Hatch>,
}

impl TreeSnapshot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from enumerated records. Later duplicates win,
    /// matching what a listing of a real tree would produce.
    #[must_use]
    pub fn from_records(records: Vec<FileRecord>) -> Self {
        let mut snapshot = Self::new();
        for record in records {
            snapshot.insert(record);
        }
        snapshot
    }

    pub fn insert(&mut self, record: FileRecord) {
        self.entries.insert(record.key, record.hatch);
    }

    #[must_use]
    pub fn hatch(&self, key: &RelativeKey) -> Option<&Hatch> {
        self.entries.get(key)
    }

    #[must_use]
    pub fn contains(&self, key: &RelativeKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &RelativeKey> {
        self.entries.keys()
    }

    /// Drop every entry whose key fails the predicate.
    pub fn retain(&mut self, mut keep: impl FnMut(&RelativeKey) -> bool) {
        self.entries.retain(|key, _| keep(key));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Relationship of a key across the two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    /// Present on both sides with equal hatches
    Matching,
    /// Present on both sides with differing hatches
    HatchMismatch,
    /// Present locally only
    LocalOnly,
    /// Present remotely only
    RemoteOnly,
}

impl Display for Relation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let label = match self {
            Relation::Matching => "in sync",
            Relation::HatchMismatch => "changed",
            Relation::LocalOnly => "local only",
            Relation::RemoteOnly => "remote only",
        };
        write!(f, "{label}")
    }
}

/// Classify every key present in either snapshot, in sorted key order.
#[must_use]
pub fn classify(local: &TreeSnapshot, remote: &TreeSnapshot) -> Vec<(RelativeKey, Relation)> {
    let mut result = Vec::with_capacity(local.len() + remote.len());

    for (key, local_hatch) in &local.entries {
        let relation = match remote.hatch(key) {
            Some(remote_hatch) if remote_hatch == local_hatch => Relation::Matching,
            Some(_) => Relation::HatchMismatch,
            None => Relation::LocalOnly,
        };
        result.push((key.clone(), relation));
    }

    for key in remote.keys() {
        if !local.contains(key) {
            result.push((key.clone(), Relation::RemoteOnly));
        }
    }

    result.sort_by(|(a, _), (b, _)| a.cmp(b));
    result
}
