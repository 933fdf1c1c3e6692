//! Replace the working dataset from a JSON file

use crate::util;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::path::Path;
use tally_core::Dataset;

pub async fn run(file: &Path, no_commit: bool) -> Result<()> {
    let repo = util::open_current()?;
    let input = util::read_input(file)?;
    let dataset: Dataset = serde_json::from_str(&input)
        .with_context(|| format!("{} is not a valid dataset", file.display()))?;

    let items = dataset.inventory.len();
    let images = dataset.images.len();
    let committed = repo
        .save(dataset, !no_commit)
        .context("Failed to save dataset")?;

    println!("{} {} items, {} images", "Saved".green(), items, images);
    if let Some(id) = committed {
        println!("  Auto-save commit {}", id.short().yellow());
    }
    Ok(())
}
