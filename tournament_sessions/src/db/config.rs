//! Database configuration module.
//!
//! Connection pool settings for the PostgreSQL store.

use std::{env, str::FromStr};
use thiserror::Error;

/// Database configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DatabaseConfigError {
    /// Required variable not set
    #[error("{0} must be set")]
    Missing(&'static str),

    /// Variable set but unparseable
    #[error("{var} has invalid value '{value}'")]
    Invalid { var: &'static str, value: String },
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub database_url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,

    /// Connection timeout in seconds
    pub connection_timeout_secs: u64,

    /// Idle connection timeout in seconds
    pub idle_timeout_secs: u64,

    /// Maximum connection lifetime in seconds
    pub max_lifetime_secs: u64,
}

fn env_or<T: FromStr>(var: &'static str, default: T) -> Result<T, DatabaseConfigError> {
    match env::var(var) {
        Ok(value) => value
            .parse()
            .map_err(|_| DatabaseConfigError::Invalid { var, value }),
        Err(_) => Ok(default),
    }
}

impl DatabaseConfig {
    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `DATABASE_URL`: PostgreSQL connection string
    /// - `DB_MAX_CONNECTIONS`: Maximum pool size (default: 10)
    /// - `DB_MIN_CONNECTIONS`: Minimum pool size (default: 1)
    /// - `DB_CONNECTION_TIMEOUT`: Connection timeout in seconds (default: 10)
    /// - `DB_IDLE_TIMEOUT`: Idle timeout in seconds (default: 600)
    /// - `DB_MAX_LIFETIME`: Max lifetime in seconds (default: 1800)
    ///
    /// # Returns
    ///
    /// * `Result<DatabaseConfig, DatabaseConfigError>` - Configuration or the first bad variable
    pub fn from_env() -> Result<Self, DatabaseConfigError> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| DatabaseConfigError::Missing("DATABASE_URL"))?;

        Ok(Self {
            database_url,
            max_connections: env_or("DB_MAX_CONNECTIONS", 10)?,
            min_connections: env_or("DB_MIN_CONNECTIONS", 1)?,
            connection_timeout_secs: env_or("DB_CONNECTION_TIMEOUT", 10)?,
            idle_timeout_secs: env_or("DB_IDLE_TIMEOUT", 600)?,
            max_lifetime_secs: env_or("DB_MAX_LIFETIME", 1800)?,
        })
    }

    /// Create a default configuration for development
    ///
    /// Uses `postgres://postgres@localhost/tournaments` as the database URL
    pub fn development() -> Self {
        Self {
            database_url: "postgres://postgres@localhost/tournaments".to_string(),
            max_connections: 10,
            min_connections: 1,
            connection_timeout_secs: 10,
            idle_timeout_secs: 600,
            max_lifetime_secs: 1800,
        }
    }

    /// Replace the connection URL
    pub fn with_url(mut self, database_url: impl Into<String>) -> Self {
        self.database_url = database_url.into();
        self
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::development()
    }
}
