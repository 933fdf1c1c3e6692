//! Export the repository as a JSON document

use crate::util;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::path::PathBuf;

pub async fn run(output: Option<PathBuf>) -> Result<()> {
    let repo = util::open_current()?;
    let document = repo.export().context("Failed to export repository")?;

    match output {
        Some(path) => {
            std::fs::write(&path, &document)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "{} repository to {} ({})",
                "Exported".green(),
                path.display(),
                util::format_size(document.len() as u64)
            );
        }
        None => println!("{}", document),
    }
    Ok(())
}
