//! Repository error types.

use std::time::Duration;
use thiserror::Error;

use super::timeouts::TimeoutError;
use crate::tournament::{ParseEnumError, TournamentId};

/// Repository errors
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Query exceeded its time budget
    #[error("Database operation timed out after {0:?}")]
    Timeout(Duration),

    /// Stored row could not be mapped to a model
    #[error("Invalid stored value: {0}")]
    InvalidValue(#[from] ParseEnumError),

    /// Stored JSON column could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Tournament row missing
    #[error("Tournament not found: {0}")]
    TournamentNotFound(TournamentId),

    /// Row changed underneath an update
    #[error("Concurrent modification of tournament {0}")]
    Conflict(TournamentId),
}

impl From<TimeoutError> for RepositoryError {
    fn from(err: TimeoutError) -> Self {
        match err {
            TimeoutError::Timeout(duration) => RepositoryError::Timeout(duration),
            TimeoutError::Database(e) => RepositoryError::Database(e),
        }
    }
}

impl RepositoryError {
    /// Client-safe message that does not leak SQL details
    pub fn client_message(&self) -> String {
        match self {
            RepositoryError::Database(_)
            | RepositoryError::Serialization(_)
            | RepositoryError::InvalidValue(_) => "Internal server error".to_string(),
            RepositoryError::Timeout(_) => "Database is busy, please retry".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_conversion() {
        let err: RepositoryError = TimeoutError::Timeout(Duration::from_secs(5)).into();
        assert!(matches!(err, RepositoryError::Timeout(d) if d.as_secs() == 5));
    }

    #[test]
    fn test_client_message_hides_database_details() {
        let err = RepositoryError::Database(sqlx::Error::RowNotFound);
        assert_eq!(err.client_message(), "Internal server error");

        let err = RepositoryError::TournamentNotFound(7);
        assert_eq!(err.client_message(), "Tournament not found: 7");
    }
}
