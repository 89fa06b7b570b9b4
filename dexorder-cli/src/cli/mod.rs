//! Command line interface

pub mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;
use commands::{CheckCommands, ReorderCommands, ShowCommands};

#[derive(Parser, Debug)]
#[command(name = "dexorder")]
#[command(about = "Compute display order for species, forms and pokemon")]
#[command(version)]
pub struct Cli {
    /// SQLite database to operate on (overrides config and DEXORDER_DATABASE)
    #[arg(long, short = 'd', global = true, value_name = "PATH")]
    pub database: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create or upgrade the database schema
    Migrate,
    /// Recompute and store the order of every family, variant and entity
    Reorder(ReorderCommands),
    /// Compare stored orders with a fresh computation
    Check(CheckCommands),
    /// Print stored orders in display order
    Show(ShowCommands),
}

/// Dispatch the parsed command
pub async fn run(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Migrate => commands::migrate::handle_migrate_command(config).await,
        Commands::Reorder(args) => commands::reorder::handle_reorder_command(args, config).await,
        Commands::Check(args) => commands::check::handle_check_command(args, config).await,
        Commands::Show(args) => commands::show::handle_show_command(args, config).await,
    }
}
