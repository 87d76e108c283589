//! Generator configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use tournament_sessions::db::{DatabaseConfig, DatabaseConfigError};
use tournament_sessions::generation::{
    DEFAULT_BREAK_MINUTES, DEFAULT_SESSION_DURATION, GenerationRequest,
};
use tournament_sessions::tournament::VenueId;

/// Complete generator configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Database configuration
    pub database: DatabaseConfig,
    /// Scheduling defaults for generation requests
    pub schedule: ScheduleConfig,
}

/// Lowest-precedence scheduling values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleConfig {
    /// Session length in minutes
    pub session_duration_minutes: u32,
    /// Break between sessions on one field
    pub break_minutes: u32,
    /// Fields played in parallel
    pub parallel_fields: u32,
    /// Rounds per individual ranking session
    pub number_of_rounds: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            session_duration_minutes: DEFAULT_SESSION_DURATION,
            break_minutes: DEFAULT_BREAK_MINUTES,
            parallel_fields: 1,
            number_of_rounds: 1,
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `database_url_override` - Optional database URL override (from CLI args)
    ///
    /// # Returns
    ///
    /// * `Result<GeneratorConfig, ConfigError>` - Loaded configuration or error
    ///
    /// # Errors
    ///
    /// Returns error if required variables are missing or invalid
    pub fn from_env(database_url_override: Option<String>) -> Result<Self, ConfigError> {
        let database = match (DatabaseConfig::from_env(), database_url_override) {
            (Ok(config), Some(url)) => config.with_url(url),
            (Ok(config), None) => config,
            (Err(DatabaseConfigError::Missing(_)), Some(url)) => {
                DatabaseConfig::development().with_url(url)
            }
            (Err(DatabaseConfigError::Missing(var)), None) => {
                return Err(ConfigError::MissingRequired {
                    var: var.to_string(),
                    hint: "Set it in .env or pass --db-url".to_string(),
                });
            }
            (Err(e), _) => return Err(e.into()),
        };

        let defaults = ScheduleConfig::default();
        let schedule = ScheduleConfig {
            session_duration_minutes: parse_env_or(
                "TS_SESSION_DURATION",
                defaults.session_duration_minutes,
            ),
            break_minutes: parse_env_or("TS_BREAK_MINUTES", defaults.break_minutes),
            parallel_fields: parse_env_or("TS_PARALLEL_FIELDS", defaults.parallel_fields),
            number_of_rounds: parse_env_or("TS_NUMBER_OF_ROUNDS", defaults.number_of_rounds),
        };

        Ok(GeneratorConfig { database, schedule })
    }

    /// Validate configuration after loading
    ///
    /// # Returns
    ///
    /// * `Result<(), ConfigError>` - Success or validation error
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.schedule.session_duration_minutes == 0 {
            return Err(ConfigError::Invalid {
                var: "TS_SESSION_DURATION".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.schedule.parallel_fields == 0 {
            return Err(ConfigError::Invalid {
                var: "TS_PARALLEL_FIELDS".to_string(),
                reason: "Must be at least 1".to_string(),
            });
        }

        if self.schedule.number_of_rounds == 0 {
            return Err(ConfigError::Invalid {
                var: "TS_NUMBER_OF_ROUNDS".to_string(),
                reason: "Must be at least 1".to_string(),
            });
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigError::Invalid {
                var: "DB_MIN_CONNECTIONS".to_string(),
                reason: format!(
                    "Cannot exceed max connections ({})",
                    self.database.max_connections
                ),
            });
        }

        Ok(())
    }

    /// Generation request for the configured defaults
    pub fn request(&self, venue_ids: Vec<VenueId>) -> GenerationRequest {
        GenerationRequest {
            parallel_fields: self.schedule.parallel_fields,
            session_duration_minutes: self.schedule.session_duration_minutes,
            break_minutes: self.schedule.break_minutes,
            number_of_rounds: self.schedule.number_of_rounds,
            venue_ids,
        }
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },

    #[error(transparent)]
    Database(#[from] DatabaseConfigError),
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
