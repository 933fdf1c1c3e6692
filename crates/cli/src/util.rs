//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use journal::{Commit, CommitId, Repository};
use owo_colors::OwoColorize;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tally_core::SledKv;

/// Directory holding a repository's database
pub const TALLY_DIR: &str = ".tally";

/// Find repository root by walking up from cwd to find .tally/
pub fn find_repo_root() -> Result<PathBuf> {
    let mut current = std::env::current_dir()
        .context("Failed to get current directory")?;

    loop {
        let tally_dir = current.join(TALLY_DIR);
        if tally_dir.exists() && tally_dir.is_dir() {
            return Ok(current);
        }

        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => anyhow::bail!("Not a tally repository (no {} directory found)", TALLY_DIR),
        }
    }
}

/// Open the repository stored under `repo_root`
pub fn open_repository(repo_root: &Path) -> Result<Repository> {
    let kv = SledKv::open(&repo_root.join(TALLY_DIR))
        .context("Failed to open repository database")?;
    Repository::open(Arc::new(kv)).context("Failed to initialize repository")
}

/// Find and open the enclosing repository
pub fn open_current() -> Result<Repository> {
    let repo_root = find_repo_root()
        .context("Failed to find repository")?;
    open_repository(&repo_root)
}

/// Resolve a commit reference, with a readable error
pub fn resolve(repo: &Repository, reference: &str) -> Result<CommitId> {
    repo.log()
        .resolve(reference)
        .with_context(|| format!("Unknown commit reference '{}'", reference))
}

/// Read a file, or stdin when the path is "-"
pub fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("Failed to read stdin")?;
        return Ok(input);
    }

    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))
}

/// Format timestamp as relative time ("2 hours ago")
pub fn format_relative_time(ts: DateTime<Utc>) -> String {
    format_relative_to(ts, Utc::now())
}

fn format_relative_to(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(ts);
    let seconds = elapsed.num_seconds();

    if seconds < 0 {
        "in the future".to_string()
    } else if seconds < 60 {
        format!("{} seconds ago", seconds)
    } else if seconds < 3600 {
        format!("{} minutes ago", seconds / 60)
    } else if seconds < 86400 {
        format!("{} hours ago", seconds / 3600)
    } else if seconds < 604800 {
        format!("{} days ago", seconds / 86400)
    } else {
        format!("{} weeks ago", seconds / 604800)
    }
}

/// Format timestamp in local time ("2024-01-03 14:30:00")
pub fn format_absolute_time(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Format byte size in human-readable format
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Display a commit on one line
pub fn display_commit_compact(commit: &Commit, is_head: bool) {
    let marker = if is_head { "*" } else { " " };
    println!(
        "{} {} {} {} - {} ({} items)",
        marker.green(),
        commit.id.short().yellow(),
        format_relative_time(commit.timestamp).dimmed(),
        commit.author.cyan(),
        commit.message,
        commit.data.summary.inventory_count
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1024), "1.00 KB");
        assert_eq!(format_size(1024 * 1024), "1.00 MB");
        assert_eq!(format_size(1024 * 1024 * 1024), "1.00 GB");
        assert_eq!(format_size(1536), "1.50 KB");
    }

    #[test]
    fn test_format_relative_time() {
        let now = Utc::now();

        assert_eq!(format_relative_to(now, now), "0 seconds ago");
        assert_eq!(format_relative_to(now - Duration::hours(1), now), "1 hours ago");
        assert_eq!(format_relative_to(now - Duration::days(1), now), "1 days ago");
        assert_eq!(format_relative_to(now - Duration::days(15), now), "2 weeks ago");
        assert_eq!(format_relative_to(now + Duration::minutes(5), now), "in the future");
    }

    #[test]
    fn test_read_input_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("data.json");
        std::fs::write(&path, "{\"inventory\": []}").unwrap();

        assert_eq!(read_input(&path).unwrap(), "{\"inventory\": []}");
        assert!(read_input(&temp_dir.path().join("missing.json")).is_err());
    }
}
