//! Precondition gate for session generation.

use crate::db::{RepositoryResult, TournamentRepository};
use crate::lifecycle::TournamentStatus;
use crate::tournament::{Tournament, TournamentId};

/// Statuses in which sessions may be generated
pub const GENERATION_STATUSES: [TournamentStatus; 2] =
    [TournamentStatus::EnrollmentClosed, TournamentStatus::InProgress];

/// Result of the eligibility check
#[derive(Debug, Clone, PartialEq)]
pub enum Eligibility {
    /// Generation may proceed on this tournament
    Eligible(Tournament),
    /// Generation must not run; the message is shown to the caller
    Ineligible(String),
}

/// Check a loaded tournament
///
/// # Returns
///
/// * `Result<(), String>` - Ok if sessions may be generated, otherwise the reason
pub fn check_tournament(tournament: &Tournament) -> Result<(), String> {
    if tournament.sessions_generated {
        return Err(format!(
            "Sessions have already been generated for tournament {}",
            tournament.id
        ));
    }

    match tournament.status {
        Some(status) if GENERATION_STATUSES.contains(&status) => Ok(()),
        status => Err(format!(
            "Sessions can only be generated while enrollment is closed or the tournament is in progress (current status: {})",
            status.map_or("NEW", |s| s.as_str())
        )),
    }
}

/// Loads a tournament and decides whether generation may run
pub struct GenerationValidator<'a, R: ?Sized> {
    repository: &'a R,
}

impl<'a, R> GenerationValidator<'a, R>
where
    R: TournamentRepository + ?Sized,
{
    pub fn new(repository: &'a R) -> Self {
        Self { repository }
    }

    /// Check eligibility for a tournament
    ///
    /// # Arguments
    ///
    /// * `tournament_id` - Tournament ID
    ///
    /// # Returns
    ///
    /// * `RepositoryResult<Eligibility>` - Eligibility or storage error
    pub async fn check(&self, tournament_id: TournamentId) -> RepositoryResult<Eligibility> {
        let Some(tournament) = self.repository.find_tournament(tournament_id).await? else {
            return Ok(Eligibility::Ineligible(format!(
                "Tournament {tournament_id} not found"
            )));
        };

        Ok(match check_tournament(&tournament) {
            Ok(()) => Eligibility::Eligible(tournament),
            Err(reason) => Eligibility::Ineligible(reason),
        })
    }
}
