//! Schema migration command

use anyhow::Result;
use colored::*;

use crate::config::Config;
use crate::db;

pub async fn handle_migrate_command(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    db::migrate(&pool).await?;
    pool.close().await;

    println!(
        "Schema up to date: {}",
        config.database.display().to_string().bright_green()
    );
    Ok(())
}
