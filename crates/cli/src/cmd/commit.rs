//! Record a commit of the working dataset

use crate::util;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;

pub async fn run(message: &str, author: Option<String>) -> Result<()> {
    let repo = util::open_current()?;
    let author = author.unwrap_or_else(|| repo.settings().user.name);

    let id = repo.commit(message, &author).context("Failed to create commit")?;
    let commit = repo.log().get(&id)?;

    println!(
        "{} {} {}",
        "Committed".green(),
        id.short().yellow(),
        commit.message
    );
    println!(
        "  {} items, {} images",
        commit.data.summary.inventory_count, commit.data.summary.image_count
    );
    Ok(())
}
