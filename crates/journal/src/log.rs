//! Capacity-bounded commit log
//!
//! The whole log is stored as one record, most recent commit first. The
//! first entry is HEAD and becomes the parent of the next commit. When the
//! log grows past `sync.maxCommits` the oldest entries are dropped.

use crate::commit::{Commit, CommitId};
use crate::snapshot::{compress, decompress};
use crate::{JournalError, Result};
use parking_lot::Mutex;
use std::sync::Arc;
use tally_core::kv::{load_json, store_json};
use tally_core::{keys, ConfigStore, Dataset, DatasetStore, PersistentKv};
use tracing::info;

/// Shortest prefix accepted when resolving a commit reference
const MIN_PREFIX_LEN: usize = 4;

/// Ordered commit history
pub struct CommitLog {
    kv: Arc<dyn PersistentKv>,
    config: ConfigStore,
    datasets: DatasetStore,
    /// Serializes read-modify-write cycles on the log record
    write_lock: Mutex<()>,
}

impl CommitLog {
    pub fn new(kv: Arc<dyn PersistentKv>) -> Self {
        Self {
            config: ConfigStore::new(kv.clone()),
            datasets: DatasetStore::new(kv.clone()),
            kv,
            write_lock: Mutex::new(()),
        }
    }

    /// All commits, most recent first
    pub fn list(&self) -> Result<Vec<Commit>> {
        Ok(load_json(self.kv.as_ref(), keys::COMMITS)?.unwrap_or_default())
    }

    /// Number of commits in the log
    pub fn count(&self) -> Result<usize> {
        Ok(self.list()?.len())
    }

    /// The most recent commit
    pub fn head(&self) -> Result<Option<Commit>> {
        Ok(self.list()?.into_iter().next())
    }

    /// Look up a commit by exact ID
    pub fn get(&self, id: &CommitId) -> Result<Commit> {
        self.list()?
            .into_iter()
            .find(|c| &c.id == id)
            .ok_or_else(|| JournalError::NotFound(id.to_string()))
    }

    /// Record a commit of `dataset`, or of the working dataset when `None`
    ///
    /// Returns the new commit's ID. An unreadable log fails the commit rather
    /// than being overwritten.
    pub fn commit(&self, message: &str, author: &str, dataset: Option<&Dataset>) -> Result<CommitId> {
        let _guard = self.write_lock.lock();

        let config = self.config.effective();
        let snapshot = match dataset {
            Some(dataset) => compress(dataset),
            None => compress(&self.datasets.read()),
        };

        let mut commits = self.list()?;
        let parent = commits.first().map(|c| c.id.clone());
        let commit = Commit::new(message, author, config.repository.branch, parent, snapshot);
        let id = commit.id.clone();

        commits.insert(0, commit);
        commits.truncate(config.sync.max_commits.max(1));
        store_json(self.kv.as_ref(), keys::COMMITS, &commits)?;

        info!("Committed {} - {}", id.short(), message);
        Ok(id)
    }

    /// Restore the working dataset from a commit
    ///
    /// Does not create a commit. On `NotFound` the working dataset is left
    /// untouched.
    pub fn checkout(&self, id: &CommitId) -> Result<Dataset> {
        let commit = self.get(id)?;
        let restored = decompress(&commit.data);
        let stored = self.datasets.write(restored, &self.config.active_branch())?;

        info!("Checked out {}", id.short());
        Ok(stored)
    }

    /// Replace the whole log
    pub fn replace(&self, commits: &[Commit]) -> Result<()> {
        let _guard = self.write_lock.lock();
        store_json(self.kv.as_ref(), keys::COMMITS, commits)?;
        Ok(())
    }

    /// Apply `f` to the stored log under the write lock and persist the result
    pub(crate) fn rewrite<T>(&self, f: impl FnOnce(Vec<Commit>) -> (Vec<Commit>, T)) -> Result<T> {
        let _guard = self.write_lock.lock();
        let (commits, out) = f(self.list()?);
        store_json(self.kv.as_ref(), keys::COMMITS, &commits)?;
        Ok(out)
    }

    /// Resolve a user-supplied reference to a commit ID
    ///
    /// Supports:
    /// - `HEAD` and `HEAD~N` (N commits before HEAD)
    /// - Full IDs
    /// - Unique ID prefixes of at least four characters
    pub fn resolve(&self, reference: &str) -> Result<CommitId> {
        let commits = self.list()?;

        if let Some(rest) = reference.strip_prefix("HEAD") {
            let back = if rest.is_empty() {
                Some(0)
            } else {
                rest.strip_prefix('~').and_then(|n| n.parse::<usize>().ok())
            };
            if let Some(back) = back {
                return commits
                    .get(back)
                    .map(|c| c.id.clone())
                    .ok_or_else(|| JournalError::NotFound(reference.to_string()));
            }
        }

        if let Some(commit) = commits.iter().find(|c| c.id.as_str() == reference) {
            return Ok(commit.id.clone());
        }

        if reference.len() >= MIN_PREFIX_LEN {
            let matching: Vec<_> = commits
                .iter()
                .filter(|c| c.id.as_str().starts_with(reference))
                .collect();

            match matching.len() {
                0 => {}
                1 => return Ok(matching[0].id.clone()),
                n => {
                    return Err(JournalError::Ambiguous {
                        reference: reference.to_string(),
                        matches: n,
                    })
                }
            }
        }

        Err(JournalError::NotFound(reference.to_string()))
    }
}
