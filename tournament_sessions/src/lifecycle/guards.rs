//! Business-rule guards evaluated on specific lifecycle edges.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::TransitionError;
use super::status::{TournamentStatus, is_allowed, is_rollback};
use crate::tournament::{Tournament, UserId, VenueId};

/// Minimum active enrollments needed to close enrollment or start play
pub const MIN_ACTIVE_ENROLLMENTS: usize = 2;

/// Facts the guards look at
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleSnapshot {
    pub session_count: usize,
    pub name: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub instructor_id: Option<UserId>,
    pub max_participants: Option<u32>,
    pub venue_id: Option<VenueId>,
    pub active_enrollments: usize,
}

impl LifecycleSnapshot {
    /// Build a snapshot from a tournament plus counts that live elsewhere
    pub fn from_tournament(
        tournament: &Tournament,
        session_count: usize,
        active_enrollments: usize,
    ) -> Self {
        Self {
            session_count,
            name: Some(tournament.name.clone()),
            start_date: Some(tournament.start_time),
            end_date: tournament.end_time,
            instructor_id: tournament.instructor_id,
            max_participants: tournament.max_participants,
            venue_id: tournament.venue_id,
            active_enrollments,
        }
    }

    fn has_name(&self) -> bool {
        self.name.as_deref().is_some_and(|n| !n.trim().is_empty())
    }

    fn has_venue(&self) -> bool {
        // venue 0 is a placeholder written by older clients
        self.venue_id.is_some_and(|id| id != 0)
    }

    fn has_max_participants(&self) -> bool {
        self.max_participants.is_some_and(|max| max > 0)
    }
}

/// Check that `from -> to` is an allowed edge and that its guard holds
pub fn validate_transition(
    from: Option<TournamentStatus>,
    to: TournamentStatus,
    snapshot: &LifecycleSnapshot,
) -> Result<(), TransitionError> {
    if !is_allowed(from, to) {
        return Err(TransitionError::NotAllowed { from, to });
    }
    if is_rollback(from, to) {
        return Ok(());
    }

    match to {
        TournamentStatus::SeekingInstructor => {
            let mut missing = Vec::new();
            if snapshot.session_count == 0 {
                missing.push("sessions");
            }
            if !snapshot.has_name() {
                missing.push("name");
            }
            if snapshot.start_date.is_none() {
                missing.push("start date");
            }
            if snapshot.end_date.is_none() {
                missing.push("end date");
            }
            require(missing, "Cannot seek an instructor")
        }
        TournamentStatus::PendingInstructorAcceptance => {
            if snapshot.instructor_id.is_none() {
                return Err(TransitionError::GuardFailed(
                    "Cannot request instructor acceptance: no instructor assigned".to_string(),
                ));
            }
            Ok(())
        }
        TournamentStatus::EnrollmentOpen => {
            let mut missing = Vec::new();
            if snapshot.instructor_id.is_none() {
                missing.push("instructor");
            }
            if !snapshot.has_max_participants() {
                missing.push("max participants");
            }
            if !snapshot.has_venue() {
                missing.push("venue");
            }
            require(missing, "Cannot open enrollment")
        }
        TournamentStatus::EnrollmentClosed => {
            if snapshot.active_enrollments < MIN_ACTIVE_ENROLLMENTS {
                return Err(TransitionError::GuardFailed(format!(
                    "Cannot close enrollment: at least {} active enrollments required (found {})",
                    MIN_ACTIVE_ENROLLMENTS, snapshot.active_enrollments
                )));
            }
            Ok(())
        }
        TournamentStatus::InProgress => {
            if snapshot.instructor_id.is_none() {
                return Err(TransitionError::GuardFailed(
                    "Cannot start tournament: no instructor assigned".to_string(),
                ));
            }
            if snapshot.active_enrollments < MIN_ACTIVE_ENROLLMENTS {
                return Err(TransitionError::GuardFailed(format!(
                    "Cannot start tournament: at least {} active enrollments required (found {})",
                    MIN_ACTIVE_ENROLLMENTS, snapshot.active_enrollments
                )));
            }
            Ok(())
        }
        TournamentStatus::Completed => {
            if snapshot.session_count == 0 {
                return Err(TransitionError::GuardFailed(
                    "Cannot complete tournament: no sessions".to_string(),
                ));
            }
            Ok(())
        }
        TournamentStatus::Draft
        | TournamentStatus::InstructorConfirmed
        | TournamentStatus::RewardsDistributed
        | TournamentStatus::Cancelled
        | TournamentStatus::Archived => Ok(()),
    }
}

fn require(missing: Vec<&str>, action: &str) -> Result<(), TransitionError> {
    if missing.is_empty() {
        Ok(())
    } else {
        Err(TransitionError::GuardFailed(format!(
            "{action}: missing {}",
            missing.join(", ")
        )))
    }
}
