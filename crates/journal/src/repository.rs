//! Repository facade
//!
//! Ties the config, working dataset and commit log to one injected
//! key-value handle. There is no process-wide state: two repositories over
//! two stores are fully independent.

use crate::commit::{Commit, CommitId};
use crate::diff::CommitDiff;
use crate::log::CommitLog;
use crate::{Result, AUTO_AUTHOR};
use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use std::sync::Arc;
use tally_core::{ConfigStore, Dataset, DatasetStore, PersistentKv, RepositoryConfig};
use tracing::warn;

/// Snapshot of repository state for display
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryStatus {
    pub branch: String,
    pub last_commit: Option<Commit>,
    pub total_commits: usize,
    /// Size of the stored dataset encoding in bytes
    pub data_size: usize,
    pub auto_commit: bool,
    pub last_modified: Option<DateTime<Utc>>,
}

/// A versioned dataset repository
#[derive(Clone)]
pub struct Repository {
    config: ConfigStore,
    datasets: DatasetStore,
    log: Arc<CommitLog>,
}

impl Repository {
    /// Open a repository over `kv`, seeding the default config on first use
    pub fn open(kv: Arc<dyn PersistentKv>) -> Result<Self> {
        let repo = Self {
            config: ConfigStore::new(kv.clone()),
            datasets: DatasetStore::new(kv.clone()),
            log: Arc::new(CommitLog::new(kv)),
        };
        repo.config.initialize()?;
        Ok(repo)
    }

    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    pub fn datasets(&self) -> &DatasetStore {
        &self.datasets
    }

    pub fn log(&self) -> &CommitLog {
        &self.log
    }

    /// Current config, defaults when unreadable
    pub fn settings(&self) -> RepositoryConfig {
        self.config.effective()
    }

    /// Replace the working dataset
    ///
    /// With `trigger_commit` set and auto-commit enabled, an "Auto save"
    /// commit is recorded after the write. A failed auto-save commit is
    /// logged and does not fail the save. Returns the commit ID if one was made.
    pub fn save(&self, dataset: Dataset, trigger_commit: bool) -> Result<Option<CommitId>> {
        let config = self.config.effective();
        self.datasets.write(dataset, &config.repository.branch)?;

        if !(trigger_commit && config.sync.auto_commit) {
            return Ok(None);
        }

        let message = format!("Auto save: {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
        match self.log.commit(&message, AUTO_AUTHOR, None) {
            Ok(id) => Ok(Some(id)),
            Err(e) => {
                warn!("Auto-save commit failed: {}", e);
                Ok(None)
            }
        }
    }

    /// Commit the working dataset
    pub fn commit(&self, message: &str, author: &str) -> Result<CommitId> {
        self.log.commit(message, author, None)
    }

    /// Restore the working dataset from `id`
    pub fn checkout(&self, id: &CommitId) -> Result<Dataset> {
        self.log.checkout(id)
    }

    /// Diff two commits
    pub fn diff(&self, from: &CommitId, to: &CommitId) -> Result<CommitDiff> {
        self.log.diff(from, to)
    }

    /// Retention sweep using the configured age threshold
    pub fn cleanup(&self) -> Result<usize> {
        self.log.cleanup(self.config.effective().sync.retention_days)
    }

    /// Summarize the repository
    pub fn status(&self) -> Result<RepositoryStatus> {
        let config = self.config.effective();
        let commits = self.log.list()?;
        let dataset = self.datasets.read();

        Ok(RepositoryStatus {
            branch: config.repository.branch,
            total_commits: commits.len(),
            last_commit: commits.into_iter().next(),
            data_size: self.datasets.stored_size()?,
            auto_commit: config.sync.auto_commit,
            last_modified: dataset.last_modified,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::{Item, MemoryKv, SledKv};

    fn repo() -> Repository {
        Repository::open(Arc::new(MemoryKv::new())).unwrap()
    }

    fn stock(items: &[(i64, i64)]) -> Dataset {
        Dataset::new(
            items.iter().map(|&(id, qty)| Item::new(id).with("qty", qty)).collect(),
            Default::default(),
        )
    }

    #[test]
    fn test_open_seeds_config_without_committing() {
        let repo = repo();
        assert!(repo.config().get().unwrap().is_some());
        assert_eq!(repo.log().count().unwrap(), 0);
    }

    #[test]
    fn test_save_with_auto_commit() {
        let repo = repo();
        let id = repo.save(stock(&[(1, 5)]), true).unwrap().unwrap();

        let commit = repo.log().get(&id).unwrap();
        assert_eq!(commit.author, "auto");
        assert!(commit.message.starts_with("Auto save: "));
        assert_eq!(commit.data.inventory.len(), 1);
    }

    #[test]
    fn test_save_respects_policy_and_flag() {
        let repo = repo();
        assert!(repo.save(stock(&[(1, 5)]), false).unwrap().is_none());

        let mut config = repo.settings();
        config.sync.auto_commit = false;
        repo.config().set(&config).unwrap();
        assert!(repo.save(stock(&[(1, 6)]), true).unwrap().is_none());

        assert_eq!(repo.log().count().unwrap(), 0);
        assert_eq!(repo.datasets().read().inventory[0].fields["qty"], 6);
    }

    #[test]
    fn test_save_stamps_configured_branch() {
        let repo = repo();
        let mut config = repo.settings();
        config.repository.branch = "warehouse-b".to_string();
        repo.config().set(&config).unwrap();

        repo.save(stock(&[(1, 1)]), true).unwrap();
        assert_eq!(repo.datasets().read().branch.as_deref(), Some("warehouse-b"));
        assert_eq!(repo.log().head().unwrap().unwrap().branch, "warehouse-b");
    }

    #[test]
    fn test_commit_checkout_roundtrip_is_lossy_outside_snapshot() {
        let repo = repo();
        let mut dataset = stock(&[(1, 5), (2, 2)]);
        dataset.images.insert("1".to_string(), serde_json::json!("data:image/png;base64,AAAA"));
        dataset.extra.insert("notes".to_string(), serde_json::json!("kept out of commits"));
        repo.save(dataset.clone(), false).unwrap();

        let id = repo.commit("snapshot", "user").unwrap();
        repo.save(stock(&[]), false).unwrap();

        let restored = repo.checkout(&id).unwrap();
        assert_eq!(restored.inventory, dataset.inventory);
        assert_eq!(restored.images, dataset.images);
        assert!(!restored.extra.contains_key("notes"));
    }

    #[test]
    fn test_status() {
        let repo = repo();
        let empty = repo.status().unwrap();
        assert_eq!(empty.total_commits, 0);
        assert!(empty.last_commit.is_none());
        assert!(empty.last_modified.is_none());
        assert_eq!(empty.data_size, 0);

        repo.save(stock(&[(1, 5)]), true).unwrap();
        let status = repo.status().unwrap();
        assert_eq!(status.branch, "main");
        assert_eq!(status.total_commits, 1);
        assert!(status.auto_commit);
        assert!(status.last_modified.is_some());
        assert!(status.data_size > 0);
        assert_eq!(status.last_commit.unwrap().author, "auto");
    }

    #[test]
    fn test_repositories_are_isolated() {
        let a = repo();
        let b = repo();
        a.commit("only in a", "user").unwrap();
        assert_eq!(a.log().count().unwrap(), 1);
        assert_eq!(b.log().count().unwrap(), 0);
    }

    #[test]
    fn test_history_survives_reopen_on_disk() {
        let temp_dir = tempfile::tempdir().unwrap();

        let first_id = {
            let repo = Repository::open(Arc::new(SledKv::open(temp_dir.path()).unwrap())).unwrap();
            repo.save(stock(&[(1, 5)]), false).unwrap();
            repo.commit("persisted", "user").unwrap()
        };

        let repo = Repository::open(Arc::new(SledKv::open(temp_dir.path()).unwrap())).unwrap();
        let head = repo.log().head().unwrap().unwrap();
        assert_eq!(head.id, first_id);
        assert_eq!(head.message, "persisted");
        assert_eq!(repo.datasets().read().inventory, stock(&[(1, 5)]).inventory);

        let second = repo.commit("after reopen", "user").unwrap();
        assert_eq!(repo.log().get(&second).unwrap().parent, Some(first_id));
    }

    #[test]
    fn test_cleanup_uses_configured_retention() {
        let repo = repo();
        let mut old = Commit::new("old", "user", "main", None, Default::default());
        old.timestamp = Utc::now() - chrono::Duration::days(10);
        repo.log().replace(&[old]).unwrap();

        let mut config = repo.settings();
        config.sync.retention_days = 7;
        repo.config().set(&config).unwrap();

        assert_eq!(repo.cleanup().unwrap(), 1);
        assert_eq!(repo.log().count().unwrap(), 0);
    }
}
