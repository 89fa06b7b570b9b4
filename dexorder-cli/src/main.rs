mod cli;
mod config;
mod db;
mod services;

use anyhow::Result;
use clap::Parser;
use is_terminal::IsTerminal;

use cli::Cli;
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before reading config so DEXORDER_DATABASE can come from it
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::load()?.with_database(cli.database.clone());

    init_logging(&config, cli.verbose);

    if cli.no_color || !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    log::debug!("Using database {}", config.database.display());

    cli::run(cli.command, &config).await
}

/// RUST_LOG wins over both the config file and --verbose
fn init_logging(config: &Config, verbose: bool) {
    let default_level = if verbose { "debug" } else { config.log_level.as_str() };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}
