//! Database module providing PostgreSQL connection pooling and repositories.
//!
//! The engine only touches storage through the traits in [`repository`].
//! [`PgTournamentStore`] implements them over a `PgPool`; [`InMemoryStore`]
//! implements them over process memory for tests, benches and dry runs.

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

pub mod config;
pub mod errors;
pub mod memory;
pub mod postgres;
pub mod repository;
pub mod timeouts;

pub use config::{DatabaseConfig, DatabaseConfigError};
pub use errors::{RepositoryError, RepositoryResult};
pub use memory::InMemoryStore;
pub use postgres::PgTournamentStore;
pub use repository::{
    EnrollmentRepository, LifecycleRepository, SessionRepository, TournamentRepository,
    VenueScheduleRepository,
};
pub use timeouts::{TimeoutError, TimeoutResult, with_default_timeout, with_timeout};

/// Database connection pool wrapper
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool
    ///
    /// # Arguments
    ///
    /// * `config` - Database configuration
    ///
    /// # Returns
    ///
    /// * `Result<Database, sqlx::Error>` - Database instance or error
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use tournament_sessions::db::{Database, DatabaseConfig};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let config = DatabaseConfig::from_env()?;
    ///     let db = Database::new(&config).await?;
    ///     db.health_check().await?;
    ///     Ok(())
    /// }
    /// ```
    pub async fn new(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
            .connect(&config.database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Repository store sharing this pool
    pub fn store(&self) -> PgTournamentStore {
        PgTournamentStore::new(self.pool.clone())
    }

    /// Check if the database connection is healthy
    ///
    /// # Returns
    ///
    /// * `TimeoutResult<()>` - Ok if healthy, error otherwise
    pub async fn health_check(&self) -> TimeoutResult<()> {
        with_default_timeout(async {
            sqlx::query("SELECT 1").execute(&self.pool).await?;
            Ok::<_, sqlx::Error>(())
        })
        .await
    }

    /// Close the database connection pool
    pub async fn close(self) {
        self.pool.close().await;
    }
}
