//! Retention sweeps
//!
//! Age-based cleanup of the commit log. This is separate from the capacity
//! cap enforced on every commit: a sweep keeps every commit newer than the
//! cutoff no matter how many there are.

use crate::log::CommitLog;
use crate::{Commit, Result};
use chrono::{DateTime, Duration, Utc};
use tracing::info;

/// Retention policy configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Commits older than this many days are removed (default: 30)
    pub retention_days: u32,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self { retention_days: 30 }
    }
}

impl RetentionPolicy {
    pub fn new(retention_days: u32) -> Self {
        Self { retention_days }
    }

    /// Oldest timestamp that survives a sweep run at `now`
    ///
    /// A window reaching past the earliest representable time keeps everything.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        Duration::try_days(i64::from(self.retention_days))
            .and_then(|window| now.checked_sub_signed(window))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Split `commits` into the ones to keep and the number removed
    ///
    /// Order of the kept commits is preserved.
    pub fn sweep(&self, commits: Vec<Commit>, now: DateTime<Utc>) -> (Vec<Commit>, usize) {
        let cutoff = self.cutoff(now);
        let before = commits.len();
        let kept: Vec<Commit> = commits.into_iter().filter(|c| c.timestamp >= cutoff).collect();
        let removed = before - kept.len();
        (kept, removed)
    }
}

impl CommitLog {
    /// Remove commits older than `retention_days` days and persist the result
    ///
    /// Returns the number of commits removed.
    pub fn cleanup(&self, retention_days: u32) -> Result<usize> {
        let policy = RetentionPolicy::new(retention_days);
        let now = Utc::now();
        let removed = self.rewrite(|commits| policy.sweep(commits, now))?;

        info!(
            "Cleanup removed {} commits older than {}",
            removed,
            policy.cutoff(now).to_rfc3339()
        );
        Ok(removed)
    }
}
