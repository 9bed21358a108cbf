//! tagprune CLI - drop redundant image tags implied by more specific ones.
//!
//! Reads tag collections (a JSON list of tags or a tag -> score object) and
//! writes them back without the tags another present tag already implies.
//!
//! # Usage
//!
//! ```bash
//! # Resolve one collection from stdin
//! echo '["long_hair", "very_long_hair"]' | tagprune resolve -
//!
//! # Resolve a directory of tag files
//! tagprune resolve ./tags/ --format jsonl --output resolved.jsonl
//!
//! # Inspect the relationship dataset
//! tagprune relations show very_long_hair
//!
//! # View configuration
//! tagprune config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// tagprune - drop redundant image tags implied by more specific ones.
#[derive(Parser, Debug)]
#[command(name = "tagprune")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Drop redundant tags from one or more tag collections
    Resolve(cli::resolve::ResolveArgs),

    /// Inspect the tag relationship dataset
    Relations(cli::relations::RelationsArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let config = match tagprune_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `tagprune config path`."
            );
            tagprune_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("tagprune v{}", tagprune_core::VERSION);

    match cli.command {
        Commands::Resolve(args) => cli::resolve::execute(args, config).await,
        Commands::Relations(args) => cli::relations::execute(args, config),
        Commands::Config(args) => cli::config::execute(args),
    }
}
