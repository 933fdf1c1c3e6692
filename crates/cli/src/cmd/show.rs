//! Show details of a single commit

use crate::util;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;

pub async fn run(reference: &str) -> Result<()> {
    let repo = util::open_current()?;
    let id = util::resolve(&repo, reference)?;
    let commit = repo.log().get(&id).context("Failed to load commit")?;

    println!("{} {}", "commit".yellow(), commit.id.as_str().yellow());
    println!("Author:  {}", commit.author);
    println!(
        "Date:    {} ({})",
        util::format_absolute_time(commit.timestamp),
        util::format_relative_time(commit.timestamp).dimmed()
    );
    println!("Branch:  {}", commit.branch);
    match &commit.parent {
        Some(parent) => println!("Parent:  {}", parent.short()),
        None => println!("Parent:  {}", "(root)".dimmed()),
    }
    println!();
    println!("    {}", commit.message);
    println!();

    let summary = &commit.data.summary;
    println!(
        "{} items, {} images",
        summary.inventory_count.to_string().bold(),
        summary.image_count.to_string().bold()
    );
    for item in &commit.data.inventory {
        let fields = serde_json::to_string(&item.fields)?;
        println!("  {} {}", item.id.to_string().cyan(), fields.dimmed());
    }
    Ok(())
}
