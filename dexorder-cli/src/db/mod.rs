//! SQLite storage holding the families, variants and entities tables

pub mod repository;

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::time::Duration;

use crate::config::Config;

/// Open the configured database, creating the file if needed
pub async fn connect(config: &Config) -> Result<SqlitePool> {
    if let Some(parent) = config.database.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create database directory: {}", parent.display())
            })?;
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(&config.database)
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(config.busy_timeout_secs));

    log::debug!("Opening database {}", config.database.display());

    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to open database: {}", config.database.display()))
}

/// Apply pending schema migrations
pub async fn migrate(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to run database migrations")?;
    Ok(())
}

/// Migrated in-memory database for tests
#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory database");
    migrate(&pool).await.expect("migrations");
    pool
}

/// Insert fixture rows: families `(id, chain, baby)`, entities `(id, family)`,
/// variants `(id, entity, identifier, priority, default)`
#[cfg(test)]
pub async fn seed(
    pool: &SqlitePool,
    families: &[(i64, i64, bool)],
    entities: &[(i64, i64)],
    variants: &[(i64, i64, &str, i64, bool)],
) {
    for (id, chain_id, is_baby) in families {
        sqlx::query("INSERT INTO families (id, chain_id, is_baby) VALUES (?, ?, ?)")
            .bind(*id)
            .bind(*chain_id)
            .bind(*is_baby as i64)
            .execute(pool)
            .await
            .expect("insert family");
    }
    for (id, family_id) in entities {
        sqlx::query("INSERT INTO entities (id, family_id) VALUES (?, ?)")
            .bind(*id)
            .bind(*family_id)
            .execute(pool)
            .await
            .expect("insert entity");
    }
    for (id, entity_id, identifier, priority, is_default) in variants {
        sqlx::query(
            "INSERT INTO variants (id, entity_id, identifier, priority, is_default)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(*id)
        .bind(*entity_id)
        .bind(*identifier)
        .bind(*priority)
        .bind(*is_default as i64)
        .execute(pool)
        .await
        .expect("insert variant");
    }
}
