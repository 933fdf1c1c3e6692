//! Restore the working dataset from a commit

use crate::util;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;

pub async fn run(reference: &str) -> Result<()> {
    let repo = util::open_current()?;
    let id = util::resolve(&repo, reference)?;

    let dataset = repo.checkout(&id).context("Failed to check out commit")?;

    println!("{} {}", "Checked out".green(), id.short().yellow());
    println!(
        "  {} items, {} images restored",
        dataset.inventory.len(),
        dataset.images.len()
    );
    println!("  {}", "The working dataset was replaced; no commit was recorded".dimmed());
    Ok(())
}
