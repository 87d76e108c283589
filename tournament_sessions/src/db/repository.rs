//! Repository trait definitions for testability and dependency injection.
//!
//! The generation engine reads tournaments, seeding entries and venue overrides,
//! and writes generated sessions, all through these traits. PostgreSQL
//! implementations live in [`super::postgres`], in-memory ones in [`super::memory`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::errors::RepositoryResult;
use crate::generators::MatchDescriptor;
use crate::lifecycle::{StatusHistoryEntry, TournamentStatus};
use crate::tournament::{SeedEntry, SessionId, Tournament, TournamentId, VenueId, VenueScheduleConfig};

/// Trait for tournament lookups
#[async_trait]
pub trait TournamentRepository: Send + Sync {
    /// Find tournament by ID, including its bracket-type configuration
    async fn find_tournament(&self, tournament_id: TournamentId)
    -> RepositoryResult<Option<Tournament>>;
}

/// Trait for enrollment (seeding pool) reads
#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// All enrollments in seeding order
    async fn seed_entries(&self, tournament_id: TournamentId) -> RepositoryResult<Vec<SeedEntry>>;

    /// Number of checked-in enrollments, read independently of `seed_entries`
    async fn checked_in_count(&self, tournament_id: TournamentId) -> RepositoryResult<usize>;

    /// Number of active enrollments
    async fn active_enrollment_count(&self, tournament_id: TournamentId)
    -> RepositoryResult<usize>;
}

/// Trait for per-venue schedule overrides
#[async_trait]
pub trait VenueScheduleRepository: Send + Sync {
    /// Override row for a (tournament, venue) pair, active or not
    async fn find_schedule(
        &self,
        tournament_id: TournamentId,
        venue_id: VenueId,
    ) -> RepositoryResult<Option<VenueScheduleConfig>>;
}

/// Trait for generated session storage
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Insert all sessions in one bulk write and flag the tournament as generated
    ///
    /// Both writes happen in a single transaction; on error nothing is stored.
    async fn commit_generation(
        &self,
        tournament_id: TournamentId,
        sessions: &[MatchDescriptor],
        generated_at: DateTime<Utc>,
    ) -> RepositoryResult<Vec<SessionId>>;

    /// Delete generated sessions and clear the generated flag
    async fn delete_generated_sessions(&self, tournament_id: TournamentId) -> RepositoryResult<u64>;

    /// Number of sessions stored for a tournament
    async fn session_count(&self, tournament_id: TournamentId) -> RepositoryResult<usize>;
}

/// Trait for lifecycle status persistence
#[async_trait]
pub trait LifecycleRepository: Send + Sync {
    /// Store the new status if the current one still equals `expected`, and append
    /// the history entry, in one transaction
    async fn apply_transition(
        &self,
        tournament_id: TournamentId,
        expected: Option<TournamentStatus>,
        entry: &StatusHistoryEntry,
    ) -> RepositoryResult<()>;

    /// Status history, oldest first
    async fn status_history(
        &self,
        tournament_id: TournamentId,
    ) -> RepositoryResult<Vec<StatusHistoryEntry>>;
}
