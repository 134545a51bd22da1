use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;

const STORAGE_FILE_NAME: &str = "cms.redb";

#[derive(Debug, Deserialize, Clone)]
pub struct CmsConfig {
    /// Directory holding the storage database file. Must be absolute.
    pub database_path: String,
    pub log_level: String,
}

impl CmsConfig {
    /// Loads configuration from an `.env` file: `DATABASE_PATH` (required,
    /// absolute) and `LOG_LEVEL` (defaults to "info").
    pub fn from_env(env_path: &Path) -> Result<Self, config::ConfigError> {
        dotenvy::from_path(env_path).map_err(|e| {
            config::ConfigError::Message(format!(
                "Failed to load .env file from '{}'. Error: {}",
                env_path.display(),
                e
            ))
        })?;

        let database_path = env::var("DATABASE_PATH").map_err(|_| {
            config::ConfigError::Message(
                "Environment variable 'DATABASE_PATH' is not set in your .env file.".to_string(),
            )
        })?;

        if Path::new(&database_path).is_relative() {
            return Err(config::ConfigError::Message(format!(
                "The 'DATABASE_PATH' in your .env file is a relative path ('{}'). It must be absolute.",
                database_path
            )));
        }

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let builder = config::Config::builder()
            .set_override("database_path", database_path)?
            .set_override("log_level", log_level)?
            .build()?;

        builder.try_deserialize()
    }

    /// Direct construction for embedding and tests, skipping the `.env`
    /// machinery.
    pub fn with_database_path(database_path: impl Into<String>) -> Self {
        Self {
            database_path: database_path.into(),
            log_level: "info".to_string(),
        }
    }

    /// Full path to the storage database file inside the configured
    /// directory.
    pub fn storage_db_path(&self) -> PathBuf {
        PathBuf::from(&self.database_path).join(STORAGE_FILE_NAME)
    }
}
