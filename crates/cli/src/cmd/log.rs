//! Show commit history

use crate::util;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;

const DEFAULT_LIMIT: usize = 20;

pub async fn run(limit: Option<usize>) -> Result<()> {
    let repo = util::open_current()?;
    let commits = repo.log().list().context("Failed to read commit log")?;

    if commits.is_empty() {
        println!("{}", "No commits yet".dimmed());
        return Ok(());
    }

    let limit = limit.unwrap_or(DEFAULT_LIMIT);
    println!("{}", format!("Commit History ({} total)", commits.len()).bold());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();

    for (i, commit) in commits.iter().take(limit).enumerate() {
        util::display_commit_compact(commit, i == 0);
    }

    if commits.len() > limit {
        println!();
        println!(
            "{}",
            format!("... {} more (use --limit to show more)", commits.len() - limit).dimmed()
        );
    }
    Ok(())
}
