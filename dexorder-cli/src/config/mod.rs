//! Application configuration
//!
//! Settings come from `<config_dir>/dexorder/config.toml`, then the
//! environment (`.env` included), then command line flags.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable overriding the database path
pub const DATABASE_ENV: &str = "DEXORDER_DATABASE";

const APP_DIR: &str = "dexorder";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite database holding the families, variants and entities tables
    pub database: PathBuf,
    /// Default log filter when RUST_LOG is unset
    pub log_level: String,
    /// How long to wait on a locked database before failing
    pub busy_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_data_dir().join("pokedex.sqlite"),
            log_level: "info".to_string(),
            busy_timeout_secs: 5,
        }
    }
}

impl Config {
    /// Load the config file if present and apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = match config_file_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };

        if let Ok(database) = std::env::var(DATABASE_ENV) {
            config.database = PathBuf::from(database);
        }

        Ok(config)
    }

    /// Parse a TOML config file; missing keys take their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid config TOML")
    }

    /// Apply the `--database` flag
    pub fn with_database(mut self, database: Option<PathBuf>) -> Self {
        if let Some(database) = database {
            self.database = database;
        }
        self
    }
}

/// Path of the config file (~/.config/dexorder/config.toml on Linux)
pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}
