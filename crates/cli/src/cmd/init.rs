//! Initialize a tally repository

use crate::util::{self, TALLY_DIR};
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::env;

/// Message of the commit recorded by `init`
const INITIAL_MESSAGE: &str = "Initial commit";
/// Author tag of the commit recorded by `init`
const INITIAL_AUTHOR: &str = "system";

pub async fn run() -> Result<()> {
    let current_dir = env::current_dir()?;
    let tally_dir = current_dir.join(TALLY_DIR);

    if tally_dir.exists() {
        anyhow::bail!(
            "Repository already initialized at {}",
            tally_dir.display()
        );
    }

    println!("Initializing tally repository at {}", current_dir.display());

    std::fs::create_dir_all(&tally_dir)
        .with_context(|| format!("Failed to create {}", tally_dir.display()))?;

    let repo = util::open_repository(&current_dir)?;
    let config = repo.settings();

    if repo.log().count()? == 0 {
        let id = repo
            .commit(INITIAL_MESSAGE, INITIAL_AUTHOR)
            .context("Failed to record initial commit")?;
        println!("Created initial commit {}", id.short().yellow());
    }

    println!();
    println!("  Name:        {}", config.repository.name.cyan());
    println!("  Branch:      {}", config.repository.branch);
    println!("  Auto-commit: {}", if config.sync.auto_commit { "on" } else { "off" });
    println!();
    println!("Next steps:");
    println!("  - Run 'tally save <file>' to load a dataset");
    println!("  - Run 'tally status' to check repository status");
    Ok(())
}
