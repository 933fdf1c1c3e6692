//! Show repository status

use crate::util;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;

pub async fn run() -> Result<()> {
    let repo_root = util::find_repo_root()
        .context("Failed to find repository")?;
    let repo = util::open_repository(&repo_root)?;

    let status = repo.status().context("Failed to read repository status")?;
    let dataset = repo.datasets().read();

    println!("{}", "Repository Status".bold());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();

    println!("Repository:    {}", repo_root.display().to_string().cyan());
    println!("Branch:        {}", status.branch);
    println!(
        "Auto-commit:   {}",
        if status.auto_commit { "on".green().to_string() } else { "off".yellow().to_string() }
    );
    println!();

    println!("Working dataset:");
    println!("  Items:       {}", dataset.inventory.len());
    println!("  Images:      {}", dataset.images.len());
    println!("  Size:        {}", util::format_size(status.data_size as u64));
    match status.last_modified {
        Some(ts) => println!(
            "  Modified:    {} ({})",
            util::format_relative_time(ts),
            util::format_absolute_time(ts).dimmed()
        ),
        None => println!("  Modified:    {}", "never".dimmed()),
    }
    println!();

    println!("Latest commit:");
    if let Some(commit) = &status.last_commit {
        println!("  ID:          {}", commit.id.short().yellow());
        println!("  Message:     {}", commit.message);
        println!("  Author:      {}", commit.author);
        println!(
            "  Time:        {} ({})",
            util::format_relative_time(commit.timestamp),
            util::format_absolute_time(commit.timestamp).dimmed()
        );
    } else {
        println!("  {}", "No commits yet".dimmed());
        println!("  {}", "Tip: Record one with 'tally commit -m <message>'".dimmed());
    }
    println!();

    println!("Total commits: {}", status.total_commits);
    Ok(())
}
