//! Show diff between commits

use crate::util;
use anyhow::{Context, Result};
use journal::Commit;
use owo_colors::OwoColorize;
use tally_core::Item;

pub async fn run(from: &str, to: &str, json: bool) -> Result<()> {
    let repo = util::open_current()?;
    let from_id = util::resolve(&repo, from)?;
    let to_id = util::resolve(&repo, to)?;

    let diff = repo.diff(&from_id, &to_id).context("Failed to compute diff")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&diff)?);
        return Ok(());
    }

    let from_commit = repo.log().get(&from_id)?;
    let to_commit = repo.log().get(&to_id)?;

    println!("{}", "Diff Summary".bold());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();
    print_endpoint("From", &from_commit);
    print_endpoint("To", &to_commit);
    println!();

    if diff.is_empty() {
        println!("{}", "No changes between commits".dimmed());
        return Ok(());
    }

    let inventory = &diff.inventory_diff;
    if !inventory.added.is_empty() {
        println!("{} Added ({} items)", "A".green().bold(), inventory.added.len());
        for item in &inventory.added {
            println!("  {} {}", "+".green(), describe(item));
        }
        println!();
    }

    if !inventory.removed.is_empty() {
        println!("{} Removed ({} items)", "D".red().bold(), inventory.removed.len());
        for item in &inventory.removed {
            println!("  {} {}", "-".red(), describe(item));
        }
        println!();
    }

    if !inventory.modified.is_empty() {
        println!("{} Modified ({} items)", "M".yellow().bold(), inventory.modified.len());
        for item in &inventory.modified {
            println!("  {} {}", "~".yellow(), describe(item));
        }
        println!();
    }

    let images = &diff.images_diff;
    if !images.is_empty() {
        println!("{}", "Images".bold());
        for key in &images.added {
            println!("  {} {}", "+".green(), key);
        }
        for key in &images.removed {
            println!("  {} {}", "-".red(), key);
        }
        for key in &images.modified {
            println!("  {} {}", "~".yellow(), key);
        }
        println!();
    }

    println!(
        "{}",
        format!(
            "Total: {} added, {} removed, {} modified",
            inventory.added.len().to_string().green(),
            inventory.removed.len().to_string().red(),
            inventory.modified.len().to_string().yellow()
        ).dimmed()
    );
    Ok(())
}

fn print_endpoint(label: &str, commit: &Commit) {
    println!(
        "{:<5} {} {} {}",
        format!("{}:", label),
        commit.id.short().yellow(),
        commit.message,
        util::format_relative_time(commit.timestamp).dimmed()
    );
}

fn describe(item: &Item) -> String {
    let fields = serde_json::to_string(&item.fields).unwrap_or_default();
    format!("{} {}", item.id, fields.dimmed())
}
