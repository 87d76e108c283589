//! Top-level session generation: gate, resolve, seed, dispatch, persist.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{
    errors::GenerationResult,
    seeding::resolve_seeding_pool,
    validator::{Eligibility, GenerationValidator},
};
use crate::db::{
    EnrollmentRepository, RepositoryError, SessionRepository, TournamentRepository,
    VenueScheduleRepository,
};
use crate::generators::{
    FormatGenerator, GenerationContext, GeneratorError, MatchDescriptor, ScheduleSummary,
    SessionGenerator,
};
use crate::tournament::{
    MatchStyle, SessionId, Tournament, TournamentFormat, TournamentId, UserId, VenueId,
};
use crate::venue::{ResolvedVenue, ScheduleDefaults, VenueResolver};

/// Default session length in minutes
pub const DEFAULT_SESSION_DURATION: u32 = 90;

/// Default break between sessions on one field in minutes
pub const DEFAULT_BREAK_MINUTES: u32 = 15;

/// Caller-supplied scheduling parameters
///
/// Duration, break and field count are the lowest-precedence defaults: the
/// tournament's own values override them, and venue rows override both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub parallel_fields: u32,
    pub session_duration_minutes: u32,
    pub break_minutes: u32,
    /// Rounds per individual ranking session
    pub number_of_rounds: u32,
    /// Venues to spread the group stage over, in routing order
    pub venue_ids: Vec<VenueId>,
}

impl Default for GenerationRequest {
    fn default() -> Self {
        Self {
            parallel_fields: 1,
            session_duration_minutes: DEFAULT_SESSION_DURATION,
            break_minutes: DEFAULT_BREAK_MINUTES,
            number_of_rounds: 1,
            venue_ids: Vec::new(),
        }
    }
}

impl GenerationRequest {
    fn defaults(&self) -> ScheduleDefaults {
        ScheduleDefaults {
            match_duration_minutes: self.session_duration_minutes,
            break_duration_minutes: self.break_minutes,
            parallel_fields: self.parallel_fields,
        }
    }

    fn validate(&self) -> Result<(), String> {
        if self.session_duration_minutes == 0 {
            return Err("Session duration must be at least 1 minute".to_string());
        }
        if self.parallel_fields == 0 {
            return Err("At least one parallel field is required".to_string());
        }
        Ok(())
    }
}

/// Result of a generation, preview or reset request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationOutcome {
    pub success: bool,
    pub message: String,
    /// Generated descriptors in schedule order (empty on rejection)
    pub sessions: Vec<MatchDescriptor>,
    /// Storage IDs, parallel to `sessions` (empty for previews)
    pub session_ids: Vec<SessionId>,
}

impl GenerationOutcome {
    fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            sessions: Vec::new(),
            session_ids: Vec::new(),
        }
    }

    /// Schedule overview of the generated sessions
    pub fn summary(&self) -> ScheduleSummary {
        ScheduleSummary::from_sessions(&self.sessions)
    }
}

enum Plan {
    Ready(Vec<MatchDescriptor>),
    Rejected(String),
}

/// Session generation coordinator
pub struct SessionGenerationCoordinator<S> {
    store: Arc<S>,
}

impl<S> Clone for SessionGenerationCoordinator<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> SessionGenerationCoordinator<S>
where
    S: TournamentRepository + EnrollmentRepository + VenueScheduleRepository + SessionRepository,
{
    /// Create a new coordinator
    ///
    /// # Arguments
    ///
    /// * `store` - Repository implementation
    ///
    /// # Returns
    ///
    /// * `SessionGenerationCoordinator` - New coordinator instance
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Generate and persist all sessions for a tournament
    ///
    /// Rejections (ineligible tournament, bad configuration, player count) come
    /// back as `Ok` with `success == false` and nothing written. Sessions and
    /// the generated flag are committed together; a storage error leaves the
    /// tournament untouched.
    ///
    /// # Arguments
    ///
    /// * `tournament_id` - Tournament ID
    /// * `request` - Scheduling parameters
    ///
    /// # Returns
    ///
    /// * `GenerationResult<GenerationOutcome>` - Outcome or storage error
    pub async fn generate(
        &self,
        tournament_id: TournamentId,
        request: &GenerationRequest,
    ) -> GenerationResult<GenerationOutcome> {
        let sessions = match self.plan(tournament_id, request).await? {
            Plan::Ready(sessions) => sessions,
            Plan::Rejected(reason) => {
                log::info!(
                    "Session generation rejected for tournament {}: {}",
                    tournament_id,
                    reason
                );
                return Ok(GenerationOutcome::rejected(reason));
            }
        };

        let session_ids = match self
            .store
            .commit_generation(tournament_id, &sessions, Utc::now())
            .await
        {
            Ok(ids) => ids,
            Err(RepositoryError::Conflict(_)) => {
                return Ok(GenerationOutcome::rejected(format!(
                    "Sessions have already been generated for tournament {tournament_id}"
                )));
            }
            Err(e) => {
                log::error!(
                    "Failed to store {} sessions for tournament {}: {}",
                    sessions.len(),
                    tournament_id,
                    e
                );
                return Err(e.into());
            }
        };

        let summary = ScheduleSummary::from_sessions(&sessions);
        log::info!("Generated sessions for tournament {}: {}", tournament_id, summary);

        Ok(GenerationOutcome {
            success: true,
            message: format!("Generated {} sessions", sessions.len()),
            sessions,
            session_ids,
        })
    }

    /// Build the sessions without storing anything
    ///
    /// Runs the same checks as [`Self::generate`].
    pub async fn preview(
        &self,
        tournament_id: TournamentId,
        request: &GenerationRequest,
    ) -> GenerationResult<GenerationOutcome> {
        Ok(match self.plan(tournament_id, request).await? {
            Plan::Ready(sessions) => GenerationOutcome {
                success: true,
                message: format!("Previewed {} sessions", sessions.len()),
                sessions,
                session_ids: Vec::new(),
            },
            Plan::Rejected(reason) => GenerationOutcome::rejected(reason),
        })
    }

    /// Delete generated sessions so the tournament can be generated again
    ///
    /// Refused once the tournament has finished.
    ///
    /// # Arguments
    ///
    /// * `tournament_id` - Tournament ID
    ///
    /// # Returns
    ///
    /// * `GenerationResult<GenerationOutcome>` - Outcome or storage error
    pub async fn reset(&self, tournament_id: TournamentId) -> GenerationResult<GenerationOutcome> {
        let Some(tournament) = self.store.find_tournament(tournament_id).await? else {
            return Ok(GenerationOutcome::rejected(format!(
                "Tournament {tournament_id} not found"
            )));
        };

        if let Some(status) = tournament.status.filter(|s| s.is_finished()) {
            return Ok(GenerationOutcome::rejected(format!(
                "Cannot reset sessions of a tournament in status {status}"
            )));
        }

        let removed = self.store.delete_generated_sessions(tournament_id).await?;
        log::warn!(
            "Reset tournament {}: removed {} generated sessions",
            tournament_id,
            removed
        );

        Ok(GenerationOutcome {
            success: true,
            message: format!("Removed {removed} generated sessions"),
            sessions: Vec::new(),
            session_ids: Vec::new(),
        })
    }

    /// Steps up to dispatch; nothing is written
    async fn plan(
        &self,
        tournament_id: TournamentId,
        request: &GenerationRequest,
    ) -> GenerationResult<Plan> {
        if let Err(reason) = request.validate() {
            return Ok(Plan::Rejected(reason));
        }

        let tournament = match GenerationValidator::new(self.store.as_ref())
            .check(tournament_id)
            .await?
        {
            Eligibility::Eligible(tournament) => tournament,
            Eligibility::Ineligible(reason) => return Ok(Plan::Rejected(reason)),
        };

        let (baseline, venues) = self.resolve_venues(&tournament, request).await?;
        let players = self.seed(tournament_id).await?;

        if let Err(reason) = check_style(&tournament, players.len()) {
            return Ok(Plan::Rejected(reason));
        }

        let ctx = GenerationContext::new(
            &tournament,
            tournament.bracket_type.as_ref(),
            &players,
            &baseline,
            &venues,
            request.number_of_rounds,
        );

        Ok(
            match SessionGenerator::for_format(tournament.format).generate(&ctx) {
                Ok(sessions) => Plan::Ready(sessions),
                Err(e) => Plan::Rejected(e.to_string()),
            },
        )
    }

    /// Baseline schedule plus per-venue schedules when more than one venue is used
    async fn resolve_venues(
        &self,
        tournament: &Tournament,
        request: &GenerationRequest,
    ) -> GenerationResult<(ResolvedVenue, Vec<ResolvedVenue>)> {
        let resolver = VenueResolver::new(self.store.as_ref());
        let defaults = request.defaults().overlay_tournament(tournament);
        let label = tournament.location.as_deref();

        if request.venue_ids.len() > 1 {
            let venues = resolver
                .resolve_all(tournament.id, &request.venue_ids, defaults, label)
                .await?;
            let baseline = venues[0].clone();
            return Ok((baseline, venues));
        }

        let venue_id = request.venue_ids.first().copied().or(tournament.venue_id);
        let baseline = resolver
            .resolve(tournament.id, venue_id, defaults, label)
            .await?;
        Ok((baseline, Vec::new()))
    }

    /// Seeding pool, raising the integrity alarm if the check-in count disagrees
    async fn seed(&self, tournament_id: TournamentId) -> GenerationResult<Vec<UserId>> {
        let entries = self.store.seed_entries(tournament_id).await?;
        let pool = resolve_seeding_pool(&entries);
        let checked_in = self.store.checked_in_count(tournament_id).await?;

        if pool.diverges_from(checked_in) {
            log::error!(
                "Seeding integrity alarm for tournament {}: seeded {} players ({}) but {} are checked in",
                tournament_id,
                pool.len(),
                if pool.from_check_in { "check-ins" } else { "approvals" },
                checked_in
            );
        }

        Ok(pool.players)
    }
}

/// Match-style rules checked before dispatch
fn check_style(tournament: &Tournament, players: usize) -> Result<(), String> {
    match tournament.match_style {
        MatchStyle::IndividualRanking => {
            if players < 2 {
                return Err(GeneratorError::NotEnoughPlayers {
                    format: tournament.format,
                    required: 2,
                    found: players,
                }
                .to_string());
            }
            Ok(())
        }
        MatchStyle::HeadToHead => {
            if tournament.format == TournamentFormat::IndividualRanking {
                return Err(GeneratorError::UnsupportedMatchStyle {
                    format: tournament.format,
                    style: tournament.match_style,
                }
                .to_string());
            }
            let Some(config) = tournament.bracket_type.as_ref() else {
                return Err(format!(
                    "Tournament format {} requires a bracket type configuration",
                    tournament.format
                ));
            };
            config.validate_player_count(players)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tournament::BracketTypeConfig;

    fn tournament(format: TournamentFormat, style: MatchStyle) -> Tournament {
        Tournament::new(1, "Cup", format, style, Utc::now())
    }

    #[test]
    fn test_head_to_head_requires_config() {
        let t = tournament(TournamentFormat::League, MatchStyle::HeadToHead);
        assert_eq!(
            check_style(&t, 6).unwrap_err(),
            "Tournament format LEAGUE requires a bracket type configuration"
        );

        let t = t.with_bracket_type(BracketTypeConfig::league());
        assert!(check_style(&t, 6).is_ok());
    }

    #[test]
    fn test_power_of_two_message() {
        let t = tournament(TournamentFormat::Knockout, MatchStyle::HeadToHead)
            .with_bracket_type(BracketTypeConfig::knockout());
        let err = check_style(&t, 12).unwrap_err();
        assert!(err.contains("requires power-of-2 players"), "{err}");
        assert!(err.ends_with("Got 12"));
    }

    #[test]
    fn test_individual_style_needs_two_players() {
        let t = tournament(TournamentFormat::IndividualRanking, MatchStyle::IndividualRanking);
        assert!(check_style(&t, 2).is_ok());
        assert_eq!(
            check_style(&t, 1).unwrap_err(),
            "INDIVIDUAL_RANKING requires at least 2 players. Got 1"
        );
    }

    #[test]
    fn test_individual_format_rejects_head_to_head() {
        let t = tournament(TournamentFormat::IndividualRanking, MatchStyle::HeadToHead);
        assert!(check_style(&t, 4).is_err());
    }

    #[test]
    fn test_request_validation() {
        assert!(GenerationRequest::default().validate().is_ok());

        let request = GenerationRequest {
            session_duration_minutes: 0,
            ..GenerationRequest::default()
        };
        assert!(request.validate().is_err());
    }
}
