//! Generation error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Session generation errors
///
/// Only storage failures are errors; rejected requests come back as a
/// [`super::GenerationOutcome`] with `success == false`.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Storage failure (nothing was committed)
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl GenerationError {
    /// Client-safe message that does not leak SQL details
    pub fn client_message(&self) -> String {
        match self {
            GenerationError::Repository(e) => e.client_message(),
        }
    }
}

/// Result type for generation operations
pub type GenerationResult<T> = Result<T, GenerationError>;
