//! Run the auto-commit scheduler in the foreground

use crate::util;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use scheduler::AutoCommitScheduler;

pub async fn run() -> Result<()> {
    let repo = util::open_current()?;
    let config = repo.settings();

    if !config.sync.auto_commit {
        println!(
            "{}",
            "Auto-commit is disabled (sync.auto_commit = false); nothing to do".yellow()
        );
        return Ok(());
    }

    let mut scheduler = AutoCommitScheduler::from_config(repo);
    scheduler.start();

    println!(
        "{} every {}s. Press Ctrl+C to stop.",
        "Auto-committing".green(),
        scheduler.interval().as_secs()
    );

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;

    scheduler.stop();
    println!("Stopped");
    Ok(())
}
