//! Configuration management command
//!
//! Reads and edits the repository configuration stored alongside the data.

use crate::util;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::time::Duration;
use tally_core::RepositoryConfig;

/// Keys accepted by `get` and `set`
const KEYS: &[&str] = &[
    "repository.name",
    "repository.description",
    "repository.branch",
    "repository.created",
    "repository.version",
    "user.name",
    "user.email",
    "sync.auto_commit",
    "sync.commit_interval_secs",
    "sync.max_commits",
    "sync.retention_days",
];

/// List all configuration values
pub async fn run_list() -> Result<()> {
    let repo = util::open_current()?;
    let config = repo.settings();

    println!("{}", "Repository Configuration".bold());
    println!();

    println!("{}", "[repository]".yellow());
    println!("  {} = {}", "name".cyan(), config.repository.name);
    println!("  {} = {}", "description".cyan(), config.repository.description);
    println!("  {} = {}", "branch".cyan(), config.repository.branch);
    println!(
        "  {} = {} {}",
        "created".cyan(),
        config.repository.created.to_rfc3339(),
        "(read-only)".dimmed()
    );
    println!(
        "  {} = {} {}",
        "version".cyan(),
        config.repository.version,
        "(read-only)".dimmed()
    );

    println!("\n{}", "[user]".yellow());
    println!("  {} = {}", "name".cyan(), config.user.name);
    println!("  {} = {}", "email".cyan(), config.user.email);

    let interval = config.sync.commit_interval.as_secs();
    println!("\n{}", "[sync]".yellow());
    println!("  {} = {}", "auto_commit".cyan(), config.sync.auto_commit);
    println!(
        "  {} = {} {}",
        "commit_interval_secs".cyan(),
        interval,
        format!("({} min)", interval / 60).dimmed()
    );
    println!("  {} = {}", "max_commits".cyan(), config.sync.max_commits);
    println!("  {} = {}", "retention_days".cyan(), config.sync.retention_days);

    println!("\n{}", "Valid Ranges:".bold());
    println!("  commit_interval_secs: 1-86400");
    println!("  max_commits: 1-100,000");
    println!("  retention_days: 1-3650");

    Ok(())
}

/// Get a single configuration value
pub async fn run_get(key: &str) -> Result<()> {
    let repo = util::open_current()?;
    println!("{}", get_value(&repo.settings(), key)?);
    Ok(())
}

/// Set a configuration value
pub async fn run_set(key: &str, value: &str) -> Result<()> {
    let repo = util::open_current()?;
    let mut config = repo.settings();

    set_value(&mut config, key, value)?;

    // Validate before saving
    config.validate()
        .context("Invalid configuration value")?;

    repo.config().set(&config)
        .context("Failed to save configuration")?;

    println!("{} {} = {}", "✓".green(), key.cyan(), value);
    Ok(())
}

fn get_value(config: &RepositoryConfig, key: &str) -> Result<String> {
    let value = match key {
        "repository.name" => config.repository.name.clone(),
        "repository.description" => config.repository.description.clone(),
        "repository.branch" => config.repository.branch.clone(),
        "repository.created" => config.repository.created.to_rfc3339(),
        "repository.version" => config.repository.version.clone(),
        "user.name" => config.user.name.clone(),
        "user.email" => config.user.email.clone(),
        "sync.auto_commit" => config.sync.auto_commit.to_string(),
        "sync.commit_interval_secs" => config.sync.commit_interval.as_secs().to_string(),
        "sync.max_commits" => config.sync.max_commits.to_string(),
        "sync.retention_days" => config.sync.retention_days.to_string(),
        _ => return Err(unknown_key(key)),
    };
    Ok(value)
}

fn set_value(config: &mut RepositoryConfig, key: &str, value: &str) -> Result<()> {
    match key {
        "repository.name" => config.repository.name = value.to_string(),
        "repository.description" => config.repository.description = value.to_string(),
        "repository.branch" => config.repository.branch = value.to_string(),
        "user.name" => config.user.name = value.to_string(),
        "user.email" => config.user.email = value.to_string(),
        "sync.auto_commit" => {
            config.sync.auto_commit = value.parse::<bool>()
                .context("Invalid value: must be 'true' or 'false'")?;
        }
        "sync.commit_interval_secs" => {
            let secs: u64 = value.parse()
                .context("Invalid value: must be a positive integer")?;
            config.sync.commit_interval = Duration::from_secs(secs);
        }
        "sync.max_commits" => {
            config.sync.max_commits = value.parse::<usize>()
                .context("Invalid value: must be a positive integer")?;
        }
        "sync.retention_days" => {
            config.sync.retention_days = value.parse::<u32>()
                .context("Invalid value: must be a positive integer")?;
        }
        "repository.created" | "repository.version" => {
            anyhow::bail!("{} is read-only", key)
        }
        _ => return Err(unknown_key(key)),
    }
    Ok(())
}

fn unknown_key(key: &str) -> anyhow::Error {
    anyhow::anyhow!("Unknown config key: {}. Available keys: {}", key, KEYS.join(", "))
}
