//! Lifecycle manager: loads the guard inputs, validates, and applies a status change.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{
    errors::{LifecycleResult, TransitionError},
    guards::{LifecycleSnapshot, validate_transition},
    status::{StatusHistoryEntry, TournamentStatus, is_rollback},
};
use crate::db::{
    EnrollmentRepository, LifecycleRepository, RepositoryError, SessionRepository,
    TournamentRepository,
};
use crate::tournament::TournamentId;

/// Result of a transition attempt, shown to the operator as-is
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionOutcome {
    pub success: bool,
    pub message: String,
    /// Status after the attempt
    pub status: Option<TournamentStatus>,
}

impl TransitionOutcome {
    fn rejected(message: impl Into<String>, status: Option<TournamentStatus>) -> Self {
        Self {
            success: false,
            message: message.into(),
            status,
        }
    }
}

/// Lifecycle manager
pub struct LifecycleManager<S> {
    store: Arc<S>,
}

impl<S> Clone for LifecycleManager<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> LifecycleManager<S>
where
    S: TournamentRepository + SessionRepository + EnrollmentRepository + LifecycleRepository,
{
    /// Create a new lifecycle manager
    ///
    /// # Arguments
    ///
    /// * `store` - Repository implementation
    ///
    /// # Returns
    ///
    /// * `LifecycleManager` - New manager instance
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Build the guard snapshot for a tournament
    ///
    /// # Returns
    ///
    /// * `LifecycleResult<Option<(Option<TournamentStatus>, LifecycleSnapshot)>>` -
    ///   Current status and snapshot, or `None` if the tournament does not exist
    pub async fn snapshot(
        &self,
        tournament_id: TournamentId,
    ) -> LifecycleResult<Option<(Option<TournamentStatus>, LifecycleSnapshot)>> {
        let Some(tournament) = self.store.find_tournament(tournament_id).await? else {
            return Ok(None);
        };
        let sessions = self.store.session_count(tournament_id).await?;
        let enrollments = self.store.active_enrollment_count(tournament_id).await?;

        Ok(Some((
            tournament.status,
            LifecycleSnapshot::from_tournament(&tournament, sessions, enrollments),
        )))
    }

    /// Move a tournament to `to`
    ///
    /// Guard failures and unknown edges come back as `Ok` with `success == false`;
    /// only storage failures are errors.
    ///
    /// # Arguments
    ///
    /// * `tournament_id` - Tournament ID
    /// * `to` - Target status
    /// * `reason` - Optional operator note stored in the history
    ///
    /// # Returns
    ///
    /// * `LifecycleResult<TransitionOutcome>` - Outcome or storage error
    pub async fn transition(
        &self,
        tournament_id: TournamentId,
        to: TournamentStatus,
        reason: Option<String>,
    ) -> LifecycleResult<TransitionOutcome> {
        let Some((from, snapshot)) = self.snapshot(tournament_id).await? else {
            return Ok(TransitionOutcome::rejected(
                format!("Tournament {tournament_id} not found"),
                None,
            ));
        };

        if let Err(err) = validate_transition(from, to, &snapshot) {
            log::info!(
                "Rejected transition for tournament {}: {}",
                tournament_id,
                err
            );
            return Ok(TransitionOutcome::rejected(err.to_string(), from));
        }

        if is_rollback(from, to) {
            log::warn!(
                "Rolling tournament {} back from IN_PROGRESS to ENROLLMENT_CLOSED ({} active enrollments, {} sessions)",
                tournament_id,
                snapshot.active_enrollments,
                snapshot.session_count
            );
        }

        let entry = StatusHistoryEntry {
            from,
            to,
            changed_at: Utc::now(),
            reason,
        };

        match self.store.apply_transition(tournament_id, from, &entry).await {
            Ok(()) => {}
            Err(RepositoryError::Conflict(_)) => {
                return Ok(TransitionOutcome::rejected(
                    "Tournament status changed concurrently, reload and retry",
                    from,
                ));
            }
            Err(e) => return Err(e.into()),
        }

        log::info!(
            "Tournament {} status {} -> {}",
            tournament_id,
            from.map_or("NEW", |s| s.as_str()),
            to
        );

        Ok(TransitionOutcome {
            success: true,
            message: format!("Tournament status changed to {to}"),
            status: Some(to),
        })
    }

    /// Validate without applying
    pub async fn check(
        &self,
        tournament_id: TournamentId,
        to: TournamentStatus,
    ) -> LifecycleResult<Result<(), TransitionError>> {
        match self.snapshot(tournament_id).await? {
            Some((from, snapshot)) => Ok(validate_transition(from, to, &snapshot)),
            None => Ok(Err(TransitionError::GuardFailed(format!(
                "Tournament {tournament_id} not found"
            )))),
        }
    }

    /// Status history, oldest first
    pub async fn history(
        &self,
        tournament_id: TournamentId,
    ) -> LifecycleResult<Vec<StatusHistoryEntry>> {
        Ok(self.store.status_history(tournament_id).await?)
    }
}
