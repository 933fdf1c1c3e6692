//! Tally CLI - tally command

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

mod cmd;
mod util;

/// Tally - Versioned snapshots for a single inventory dataset
#[derive(Parser)]
#[command(name = "tally")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Print debug logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a repository in the current directory
    Init,
    /// Show repository status
    Status,
    /// Show commit history
    Log {
        /// Number of commits to show (default: 20)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show a single commit
    Show {
        /// Commit ID, unique prefix, HEAD or HEAD~N
        commit: String,
    },
    /// Replace the working dataset with the contents of a JSON file
    Save {
        /// Dataset file ("-" for stdin)
        file: PathBuf,
        /// Do not record an auto-save commit
        #[arg(long)]
        no_commit: bool,
    },
    /// Commit the working dataset
    Commit {
        /// Commit message
        #[arg(short, long)]
        message: String,
        /// Author tag (default: configured user name)
        #[arg(long)]
        author: Option<String>,
    },
    /// Restore the working dataset from a commit
    Checkout {
        /// Commit ID, unique prefix, HEAD or HEAD~N
        commit: String,
    },
    /// Show differences between two commits
    Diff {
        /// Older commit
        from: String,
        /// Newer commit
        to: String,
        /// Print the diff as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove commits older than the retention window
    Cleanup {
        /// Retention window in days (default: configured value)
        #[arg(long)]
        days: Option<u32>,
    },
    /// Export the whole repository as JSON
    Export {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Import a previously exported repository document
    Import {
        /// Document file ("-" for stdin)
        file: PathBuf,
    },
    /// Run periodic auto-commit in the foreground until interrupted
    Watch,
    /// View and edit repository configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// List all configuration values
    List,
    /// Print one configuration value
    Get {
        /// Dotted key, e.g. sync.max_commits
        key: String,
    },
    /// Change one configuration value
    Set {
        /// Dotted key, e.g. sync.max_commits
        key: String,
        /// New value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so exported documents on stdout stay clean
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    match cli.command {
        Commands::Init => cmd::init::run().await,
        Commands::Status => cmd::status::run().await,
        Commands::Log { limit } => cmd::log::run(limit).await,
        Commands::Show { commit } => cmd::show::run(&commit).await,
        Commands::Save { file, no_commit } => cmd::save::run(&file, no_commit).await,
        Commands::Commit { message, author } => cmd::commit::run(&message, author).await,
        Commands::Checkout { commit } => cmd::checkout::run(&commit).await,
        Commands::Diff { from, to, json } => cmd::diff::run(&from, &to, json).await,
        Commands::Cleanup { days } => cmd::cleanup::run(days).await,
        Commands::Export { output } => cmd::export::run(output).await,
        Commands::Import { file } => cmd::import::run(&file).await,
        Commands::Watch => cmd::watch::run().await,
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::List => cmd::config::run_list().await,
            ConfigCommands::Get { key } => cmd::config::run_get(&key).await,
            ConfigCommands::Set { key, value } => cmd::config::run_set(&key, &value).await,
        },
    }
}
