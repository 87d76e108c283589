//! Tournament status values and the allowed-transition graph.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::tournament::ParseEnumError;

/// Tournament lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TournamentStatus {
    Draft,
    SeekingInstructor,
    PendingInstructorAcceptance,
    /// Also stored as `READY_FOR_ENROLLMENT`
    #[serde(alias = "READY_FOR_ENROLLMENT")]
    InstructorConfirmed,
    EnrollmentOpen,
    EnrollmentClosed,
    InProgress,
    Completed,
    RewardsDistributed,
    Cancelled,
    /// Terminal
    Archived,
}

impl TournamentStatus {
    /// Every status, in lifecycle order
    pub const ALL: [TournamentStatus; 11] = [
        TournamentStatus::Draft,
        TournamentStatus::SeekingInstructor,
        TournamentStatus::PendingInstructorAcceptance,
        TournamentStatus::InstructorConfirmed,
        TournamentStatus::EnrollmentOpen,
        TournamentStatus::EnrollmentClosed,
        TournamentStatus::InProgress,
        TournamentStatus::Completed,
        TournamentStatus::RewardsDistributed,
        TournamentStatus::Cancelled,
        TournamentStatus::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TournamentStatus::Draft => "DRAFT",
            TournamentStatus::SeekingInstructor => "SEEKING_INSTRUCTOR",
            TournamentStatus::PendingInstructorAcceptance => "PENDING_INSTRUCTOR_ACCEPTANCE",
            TournamentStatus::InstructorConfirmed => "INSTRUCTOR_CONFIRMED",
            TournamentStatus::EnrollmentOpen => "ENROLLMENT_OPEN",
            TournamentStatus::EnrollmentClosed => "ENROLLMENT_CLOSED",
            TournamentStatus::InProgress => "IN_PROGRESS",
            TournamentStatus::Completed => "COMPLETED",
            TournamentStatus::RewardsDistributed => "REWARDS_DISTRIBUTED",
            TournamentStatus::Cancelled => "CANCELLED",
            TournamentStatus::Archived => "ARCHIVED",
        }
    }

    /// Statuses reachable in one step from `self`
    pub fn allowed_next(&self) -> &'static [TournamentStatus] {
        use TournamentStatus::*;
        match self {
            Draft => &[SeekingInstructor, Cancelled],
            SeekingInstructor => &[PendingInstructorAcceptance, Draft, Cancelled],
            PendingInstructorAcceptance => &[InstructorConfirmed, SeekingInstructor, Cancelled],
            InstructorConfirmed => &[EnrollmentOpen, Cancelled],
            EnrollmentOpen => &[EnrollmentClosed, Cancelled],
            EnrollmentClosed => &[InProgress, EnrollmentOpen, Cancelled],
            InProgress => &[Completed, EnrollmentClosed, Cancelled],
            Completed => &[RewardsDistributed, Archived],
            RewardsDistributed => &[Archived],
            Cancelled => &[Archived],
            Archived => &[],
        }
    }

    /// Whether the status has no outgoing edges
    pub fn is_terminal(&self) -> bool {
        self.allowed_next().is_empty()
    }

    /// Whether the tournament has finished playing (results exist or it was called off)
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            TournamentStatus::Completed
                | TournamentStatus::RewardsDistributed
                | TournamentStatus::Cancelled
                | TournamentStatus::Archived
        )
    }
}

/// Whether `from -> to` is an edge of the lifecycle graph (`None` = new tournament)
pub fn is_allowed(from: Option<TournamentStatus>, to: TournamentStatus) -> bool {
    match from {
        None => to == TournamentStatus::Draft,
        Some(from) => from.allowed_next().contains(&to),
    }
}

/// Whether `from -> to` is the rollback edge used to recover a failed generation
pub fn is_rollback(from: Option<TournamentStatus>, to: TournamentStatus) -> bool {
    from == Some(TournamentStatus::InProgress) && to == TournamentStatus::EnrollmentClosed
}

impl fmt::Display for TournamentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TournamentStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        if upper == "READY_FOR_ENROLLMENT" {
            return Ok(TournamentStatus::InstructorConfirmed);
        }
        TournamentStatus::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == upper)
            .ok_or_else(|| ParseEnumError::new("tournament status", s))
    }
}

/// One applied status change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusHistoryEntry {
    /// Previous status (None for creation)
    pub from: Option<TournamentStatus>,
    /// New status
    pub to: TournamentStatus,
    /// When the change was applied
    pub changed_at: DateTime<Utc>,
    /// Operator-supplied reason
    pub reason: Option<String>,
}
