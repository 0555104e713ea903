//! Runtime configuration for catalog hosts.
//!
//! # Responsibility
//! - Resolve database, asset and logging locations from the environment.
//!
//! # Invariants
//! - Every setting has a default suitable for local use.
//! - A configured log level is always one `init_logging` accepts.

use crate::logging::{default_log_level, normalize_level};
use std::path::PathBuf;
use thiserror::Error;

pub const DB_PATH_ENV: &str = "CHARCAT_DB_PATH";
pub const ASSET_DIR_ENV: &str = "CHARCAT_ASSET_DIR";
pub const LOG_LEVEL_ENV: &str = "CHARCAT_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "CHARCAT_LOG_DIR";

pub const DEFAULT_DB_PATH: &str = "charcat.sqlite3";
pub const DEFAULT_ASSET_DIR: &str = "uploads";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} has unsupported log level `{value}`")]
    InvalidLogLevel { var: &'static str, value: String },
    #[error("{var} must not be blank")]
    BlankPath { var: &'static str },
}

/// Catalog host configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub db_path: PathBuf,
    /// Directory holding sprite files.
    pub asset_dir: PathBuf,
    pub log_level: &'static str,
    /// File logging is disabled when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            asset_dir: PathBuf::from(DEFAULT_ASSET_DIR),
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl CatalogConfig {
    /// Loads configuration from process environment variables.
    ///
    /// | Env Var             | Default                      |
    /// |---------------------|------------------------------|
    /// | `CHARCAT_DB_PATH`   | `charcat.sqlite3`            |
    /// | `CHARCAT_ASSET_DIR` | `uploads`                    |
    /// | `CHARCAT_LOG_LEVEL` | `debug` (debug) / `info`     |
    /// | `CHARCAT_LOG_DIR`   | unset, file logging disabled |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// Unset variables take their defaults; set-but-blank paths are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup(DB_PATH_ENV) {
            config.db_path = non_blank_path(DB_PATH_ENV, &value)?;
        }
        if let Some(value) = lookup(ASSET_DIR_ENV) {
            config.asset_dir = non_blank_path(ASSET_DIR_ENV, &value)?;
        }
        if let Some(value) = lookup(LOG_LEVEL_ENV) {
            config.log_level =
                normalize_level(&value).map_err(|_| ConfigError::InvalidLogLevel {
                    var: LOG_LEVEL_ENV,
                    value,
                })?;
        }
        if let Some(value) = lookup(LOG_DIR_ENV) {
            config.log_dir = Some(non_blank_path(LOG_DIR_ENV, &value)?);
        }

        Ok(config)
    }
}

fn non_blank_path(var: &'static str, value: &str) -> Result<PathBuf, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::BlankPath { var });
    }
    Ok(PathBuf::from(trimmed))
}
