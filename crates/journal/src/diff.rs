//! Snapshot diffing
//!
//! Arrays are matched by identity key and maps by key. In both cases a value
//! counts as modified when it differs structurally, so nested image payloads
//! and nested item fields are compared in full.

use crate::commit::CommitId;
use crate::log::CommitLog;
use crate::Result;
use ahash::{AHashMap, AHashSet};
use serde::Serialize;
use std::collections::BTreeMap;
use tally_core::Item;

/// Something with a stable identity across snapshots
pub trait Identified {
    fn identity(&self) -> String;
}

impl Identified for Item {
    fn identity(&self) -> String {
        Item::identity(self)
    }
}

/// Changes between two ordered collections
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayDiff<T> {
    /// In the new collection only (new order)
    pub added: Vec<T>,
    /// In the old collection only (old order)
    pub removed: Vec<T>,
    /// In both, with a different value (new version, new order)
    pub modified: Vec<T>,
}

impl<T> ArrayDiff<T> {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }
}

/// Changes between two keyed maps
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MapDiff {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub modified: Vec<String>,
}

impl MapDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }
}

/// Differences between two commits
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitDiff {
    pub inventory_diff: ArrayDiff<Item>,
    pub images_diff: MapDiff,
}

impl CommitDiff {
    pub fn is_empty(&self) -> bool {
        self.inventory_diff.is_empty() && self.images_diff.is_empty()
    }
}

/// Compare two collections by identity
///
/// When an identity appears more than once in `old`, its first occurrence
/// is the one compared against.
pub fn diff_arrays<T: Identified + PartialEq + Clone>(old: &[T], new: &[T]) -> ArrayDiff<T> {
    let mut old_index: AHashMap<String, &T> = AHashMap::with_capacity(old.len());
    for item in old {
        old_index.entry(item.identity()).or_insert(item);
    }

    let mut new_ids: AHashSet<String> = AHashSet::with_capacity(new.len());
    let mut added = Vec::new();
    let mut modified = Vec::new();

    for item in new {
        let id = item.identity();
        match old_index.get(&id) {
            None => added.push(item.clone()),
            Some(previous) if *previous != item => modified.push(item.clone()),
            Some(_) => {}
        }
        new_ids.insert(id);
    }

    let removed = old
        .iter()
        .filter(|item| !new_ids.contains(&item.identity()))
        .cloned()
        .collect();

    ArrayDiff { added, removed, modified }
}

/// Compare two maps by key
pub fn diff_maps<V: PartialEq>(old: &BTreeMap<String, V>, new: &BTreeMap<String, V>) -> MapDiff {
    let mut diff = MapDiff::default();

    for (key, value) in new {
        match old.get(key) {
            None => diff.added.push(key.clone()),
            Some(previous) if previous != value => diff.modified.push(key.clone()),
            Some(_) => {}
        }
    }

    diff.removed = old
        .keys()
        .filter(|key| !new.contains_key(*key))
        .cloned()
        .collect();

    diff
}

impl CommitLog {
    /// Diff the snapshots stored in two commits
    pub fn diff(&self, from: &CommitId, to: &CommitId) -> Result<CommitDiff> {
        let old = self.get(from)?;
        let new = self.get(to)?;

        Ok(CommitDiff {
            inventory_diff: diff_arrays(&old.data.inventory, &new.data.inventory),
            images_diff: diff_maps(&old.data.images, &new.data.images),
        })
    }
}
