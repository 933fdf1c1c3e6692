//! Import a repository document

use crate::util;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::path::Path;

pub async fn run(file: &Path) -> Result<()> {
    let repo = util::open_current()?;
    let document = util::read_input(file)?;

    let report = repo
        .import(&document)
        .context("Failed to import repository document")?;

    println!("{}", "Import complete".green());
    println!("  Config:  {}", if report.config { "replaced" } else { "unchanged" });
    println!("  Data:    {}", if report.data { "replaced" } else { "unchanged" });
    match report.commits {
        Some(n) => println!("  Commits: {} imported", n),
        None => println!("  Commits: unchanged"),
    }
    Ok(())
}
