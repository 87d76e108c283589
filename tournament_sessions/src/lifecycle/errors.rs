//! Lifecycle error types.

use thiserror::Error;

use super::status::TournamentStatus;
use crate::db::RepositoryError;

fn status_name(status: &Option<TournamentStatus>) -> &'static str {
    status.as_ref().map_or("NEW", TournamentStatus::as_str)
}

/// Rejected status change; the message is shown to the operator verbatim
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// Edge is not part of the lifecycle graph
    #[error("Invalid status transition: {} -> {to}", status_name(from))]
    NotAllowed {
        from: Option<TournamentStatus>,
        to: TournamentStatus,
    },

    /// Edge exists but its business rule does not hold
    #[error("{0}")]
    GuardFailed(String),
}

/// Lifecycle manager errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Storage failure
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Result type for lifecycle operations
pub type LifecycleResult<T> = Result<T, LifecycleError>;
