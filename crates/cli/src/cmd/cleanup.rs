//! Remove commits past the retention window

use crate::util;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;

pub async fn run(days: Option<u32>) -> Result<()> {
    let repo = util::open_current()?;
    let days = days.unwrap_or_else(|| repo.settings().sync.retention_days);

    let before = repo.log().count()?;
    let removed = repo
        .log()
        .cleanup(days)
        .context("Failed to clean up commit log")?;

    if removed == 0 {
        println!("{}", format!("No commits older than {} days", days).dimmed());
        return Ok(());
    }

    println!(
        "{} {} of {} commits older than {} days",
        "Removed".green(),
        removed.to_string().bold(),
        before,
        days
    );
    Ok(())
}
