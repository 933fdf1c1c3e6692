//! Periodic auto-commit for tally repositories
//!
//! The scheduler owns one tokio task. Each tick commits the working dataset
//! unless its inventory is empty, so an idle repository does not fill its
//! history with no-op snapshots. Tick failures are logged and the loop keeps
//! running.

use chrono::Local;
use journal::{CommitId, Repository, AUTO_AUTHOR};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Result of a single auto-commit attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// A commit was recorded
    Committed(CommitId),
    /// The inventory was empty
    SkippedEmpty,
    /// The commit failed; already logged
    Failed,
}

/// Run one auto-commit attempt against `repo`
pub fn tick(repo: &Repository) -> TickOutcome {
    let dataset = repo.datasets().read();
    if dataset.is_empty() {
        debug!("Auto-commit skipped: inventory is empty");
        return TickOutcome::SkippedEmpty;
    }

    let message = format!("Auto commit: {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    match repo.log().commit(&message, AUTO_AUTHOR, Some(&dataset)) {
        Ok(id) => TickOutcome::Committed(id),
        Err(e) => {
            warn!("Auto-commit failed: {}", e);
            TickOutcome::Failed
        }
    }
}

/// Shortest period the scheduler will tick at
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

struct Running {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

/// Periodic auto-commit task
///
/// `start` must be called from within a tokio runtime. Dropping the
/// scheduler stops the task.
pub struct AutoCommitScheduler {
    repo: Repository,
    interval: Duration,
    running: Option<Running>,
}

impl AutoCommitScheduler {
    /// Create a scheduler with an explicit period
    ///
    /// Periods shorter than [`MIN_INTERVAL`] are raised to it.
    pub fn new(repo: Repository, interval: Duration) -> Self {
        if interval < MIN_INTERVAL {
            warn!("Auto-commit interval {:?} too short, using {:?}", interval, MIN_INTERVAL);
        }
        Self {
            repo,
            interval: interval.max(MIN_INTERVAL),
            running: None,
        }
    }

    /// Create a scheduler using the repository's configured commit interval
    pub fn from_config(repo: Repository) -> Self {
        let interval = repo.settings().sync.commit_interval;
        Self::new(repo, interval)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether a task is currently scheduled
    pub fn is_running(&self) -> bool {
        self.running.as_ref().is_some_and(|r| !r.task.is_finished())
    }

    /// Start ticking; replaces any task already running
    ///
    /// The first tick fires one full interval after this call.
    pub fn start(&mut self) {
        self.stop();

        let (shutdown, mut shutdown_rx) = oneshot::channel();
        let repo = self.repo.clone();
        let period = self.interval;
        let mut timer = interval_at(Instant::now() + period, period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!("Starting auto-commit (interval: {:?})", period);

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = &mut shutdown_rx => break,
                    _ = timer.tick() => {
                        if let TickOutcome::Committed(id) = tick(&repo) {
                            debug!("Auto-commit recorded {}", id.short());
                        }
                    }
                }
            }
            debug!("Auto-commit task exited");
        });

        self.running = Some(Running { shutdown, task });
    }

    /// Cancel the task; a no-op when not running
    pub fn stop(&mut self) {
        if let Some(running) = self.running.take() {
            // The task may already have exited; nothing to do then
            let _ = running.shutdown.send(());
            info!("Stopped auto-commit");
        }
    }
}

impl Drop for AutoCommitScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tally_core::{keys, Dataset, Item, MemoryKv, PersistentKv};
    use tokio::time::sleep;

    const PERIOD: Duration = Duration::from_secs(60);

    fn repo_with(items: Vec<Item>) -> Repository {
        let repo = Repository::open(Arc::new(MemoryKv::new())).unwrap();
        repo.save(Dataset::new(items, Default::default()), false).unwrap();
        repo
    }

    #[test]
    fn test_tick_skips_empty_inventory() {
        let repo = repo_with(vec![]);
        assert_eq!(tick(&repo), TickOutcome::SkippedEmpty);
        assert_eq!(repo.log().count().unwrap(), 0);
    }

    #[test]
    fn test_tick_commits_as_auto() {
        let repo = repo_with(vec![Item::new(1).with("qty", 3)]);
        let TickOutcome::Committed(id) = tick(&repo) else {
            panic!("expected a commit");
        };

        let commit = repo.log().get(&id).unwrap();
        assert_eq!(commit.author, "auto");
        assert!(commit.message.starts_with("Auto commit: "));
    }

    #[test]
    fn test_tick_reports_failure() {
        let kv = Arc::new(MemoryKv::new());
        let repo = Repository::open(kv.clone()).unwrap();
        repo.save(Dataset::new(vec![Item::new(1)], Default::default()), false).unwrap();
        kv.set(keys::COMMITS, "{broken").unwrap();

        assert_eq!(tick(&repo), TickOutcome::Failed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_commits_once_per_interval() {
        let repo = repo_with(vec![Item::new(1)]);
        let mut scheduler = AutoCommitScheduler::new(repo.clone(), PERIOD);
        scheduler.start();
        assert!(scheduler.is_running());

        // Nothing fires before the first full interval
        sleep(PERIOD - Duration::from_secs(1)).await;
        assert_eq!(repo.log().count().unwrap(), 0);

        sleep(PERIOD * 2 + Duration::from_secs(2)).await;
        assert_eq!(repo.log().count().unwrap(), 3);

        scheduler.stop();
        sleep(PERIOD * 5).await;
        assert_eq!(repo.log().count().unwrap(), 3);
        assert!(!scheduler.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_dataset_never_commits() {
        let repo = repo_with(vec![]);
        let mut scheduler = AutoCommitScheduler::new(repo.clone(), PERIOD);
        scheduler.start();

        sleep(PERIOD * 4 + Duration::from_secs(1)).await;
        assert_eq!(repo.log().count().unwrap(), 0);
        scheduler.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_do_not_halt_the_loop() {
        let kv = Arc::new(MemoryKv::new());
        let repo = Repository::open(kv.clone()).unwrap();
        repo.save(Dataset::new(vec![Item::new(1)], Default::default()), false).unwrap();
        kv.set(keys::COMMITS, "{broken").unwrap();

        let mut scheduler = AutoCommitScheduler::new(repo.clone(), PERIOD);
        scheduler.start();
        sleep(PERIOD * 2 + Duration::from_secs(1)).await;
        assert!(scheduler.is_running());

        // Once storage recovers the next tick succeeds
        kv.delete(keys::COMMITS).unwrap();
        sleep(PERIOD).await;
        assert_eq!(repo.log().count().unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_replaces_task_and_stop_is_idempotent() {
        let repo = repo_with(vec![Item::new(1)]);
        let mut scheduler = AutoCommitScheduler::new(repo.clone(), PERIOD);

        scheduler.stop();
        scheduler.start();
        scheduler.start();

        sleep(PERIOD + Duration::from_secs(1)).await;
        // Only one task is ticking
        assert_eq!(repo.log().count().unwrap(), 1);

        scheduler.stop();
        scheduler.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_is_clamped() {
        let repo = repo_with(vec![Item::new(1)]);

        // Bypasses validation, as a hand-edited store would
        let mut config = repo.settings();
        config.sync.commit_interval = Duration::ZERO;
        repo.config().set(&config).unwrap();

        let mut scheduler = AutoCommitScheduler::from_config(repo.clone());
        assert_eq!(scheduler.interval(), MIN_INTERVAL);

        scheduler.start();
        sleep(Duration::from_millis(5)).await;
        assert!(scheduler.is_running());
        assert!(repo.log().count().unwrap() >= 1);
        scheduler.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_from_config_uses_commit_interval() {
        let repo = repo_with(vec![Item::new(1)]);
        let mut config = repo.settings();
        config.sync.commit_interval = Duration::from_secs(10);
        repo.config().set(&config).unwrap();

        let mut scheduler = AutoCommitScheduler::from_config(repo.clone());
        assert_eq!(scheduler.interval(), Duration::from_secs(10));

        scheduler.start();
        sleep(Duration::from_secs(31)).await;
        assert_eq!(repo.log().count().unwrap(), 3);
    }
}
