//! In-memory repository implementation.
//!
//! Backs the integration tests, the benchmarks and dry runs. Behaves like the
//! PostgreSQL store for everything the engine relies on: commits are
//! all-or-nothing, status updates are compare-and-set, and a commit on an
//! already generated tournament is a conflict.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::errors::{RepositoryError, RepositoryResult};
use super::repository::{
    EnrollmentRepository, LifecycleRepository, SessionRepository, TournamentRepository,
    VenueScheduleRepository,
};
use crate::generators::MatchDescriptor;
use crate::lifecycle::{StatusHistoryEntry, TournamentStatus};
use crate::tournament::{
    ApprovalState, SeedEntry, SessionId, Tournament, TournamentId, VenueId, VenueScheduleConfig,
};

#[derive(Default)]
struct State {
    tournaments: HashMap<TournamentId, Tournament>,
    enrollments: HashMap<TournamentId, Vec<SeedEntry>>,
    checked_in_overrides: HashMap<TournamentId, usize>,
    venue_schedules: HashMap<(TournamentId, VenueId), VenueScheduleConfig>,
    sessions: HashMap<TournamentId, Vec<(SessionId, MatchDescriptor)>>,
    history: HashMap<TournamentId, Vec<StatusHistoryEntry>>,
    next_session_id: SessionId,
    fail_next_commit: bool,
}

/// Process-local store implementing every repository trait
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
    venue_reads: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add or replace a tournament
    pub fn insert_tournament(&self, tournament: Tournament) {
        self.lock().tournaments.insert(tournament.id, tournament);
    }

    /// Builder form of [`Self::insert_tournament`]
    pub fn with_tournament(self, tournament: Tournament) -> Self {
        self.insert_tournament(tournament);
        self
    }

    /// Current copy of a tournament
    pub fn tournament(&self, tournament_id: TournamentId) -> Option<Tournament> {
        self.lock().tournaments.get(&tournament_id).cloned()
    }

    /// Replace the enrollments of a tournament (seed order = vector order)
    pub fn set_enrollments(&self, tournament_id: TournamentId, entries: Vec<SeedEntry>) {
        self.lock().enrollments.insert(tournament_id, entries);
    }

    /// Force the value returned by `checked_in_count`
    ///
    /// Simulates a check-in landing between the two reads.
    pub fn override_checked_in_count(&self, tournament_id: TournamentId, count: usize) {
        self.lock().checked_in_overrides.insert(tournament_id, count);
    }

    /// Add or replace a venue schedule override
    pub fn insert_venue_schedule(&self, config: VenueScheduleConfig) {
        self.lock()
            .venue_schedules
            .insert((config.tournament_id, config.venue_id), config);
    }

    /// Stored sessions in insertion order
    pub fn sessions(&self, tournament_id: TournamentId) -> Vec<MatchDescriptor> {
        self.lock()
            .sessions
            .get(&tournament_id)
            .map(|rows| rows.iter().map(|(_, session)| session.clone()).collect())
            .unwrap_or_default()
    }

    /// Make the next `commit_generation` fail after validation
    pub fn fail_next_commit(&self) {
        self.lock().fail_next_commit = true;
    }

    /// Number of venue override lookups served
    pub fn venue_reads(&self) -> usize {
        self.venue_reads.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl TournamentRepository for InMemoryStore {
    async fn find_tournament(
        &self,
        tournament_id: TournamentId,
    ) -> RepositoryResult<Option<Tournament>> {
        Ok(self.tournament(tournament_id))
    }
}

#[async_trait]
impl EnrollmentRepository for InMemoryStore {
    async fn seed_entries(&self, tournament_id: TournamentId) -> RepositoryResult<Vec<SeedEntry>> {
        Ok(self
            .lock()
            .enrollments
            .get(&tournament_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn checked_in_count(&self, tournament_id: TournamentId) -> RepositoryResult<usize> {
        let state = self.lock();
        if let Some(count) = state.checked_in_overrides.get(&tournament_id) {
            return Ok(*count);
        }
        Ok(state
            .enrollments
            .get(&tournament_id)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|e| e.is_active && e.checked_in_at.is_some())
                    .count()
            })
            .unwrap_or(0))
    }

    async fn active_enrollment_count(
        &self,
        tournament_id: TournamentId,
    ) -> RepositoryResult<usize> {
        Ok(self
            .lock()
            .enrollments
            .get(&tournament_id)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|e| e.is_active && e.approval == ApprovalState::Approved)
                    .count()
            })
            .unwrap_or(0))
    }
}

#[async_trait]
impl VenueScheduleRepository for InMemoryStore {
    async fn find_schedule(
        &self,
        tournament_id: TournamentId,
        venue_id: VenueId,
    ) -> RepositoryResult<Option<VenueScheduleConfig>> {
        self.venue_reads.fetch_add(1, Ordering::Relaxed);
        Ok(self
            .lock()
            .venue_schedules
            .get(&(tournament_id, venue_id))
            .cloned())
    }
}

#[async_trait]
impl SessionRepository for InMemoryStore {
    async fn commit_generation(
        &self,
        tournament_id: TournamentId,
        sessions: &[MatchDescriptor],
        generated_at: DateTime<Utc>,
    ) -> RepositoryResult<Vec<SessionId>> {
        let mut state = self.lock();

        let already_generated = state
            .tournaments
            .get(&tournament_id)
            .ok_or(RepositoryError::TournamentNotFound(tournament_id))?
            .sessions_generated;
        if already_generated {
            return Err(RepositoryError::Conflict(tournament_id));
        }
        if std::mem::take(&mut state.fail_next_commit) {
            return Err(RepositoryError::Database(sqlx::Error::Protocol(
                "injected commit failure".to_string(),
            )));
        }

        let first_id = state.next_session_id + 1;
        let ids: Vec<SessionId> = (first_id..first_id + sessions.len() as SessionId).collect();
        state.next_session_id += sessions.len() as SessionId;

        let rows = state.sessions.entry(tournament_id).or_default();
        rows.extend(ids.iter().copied().zip(sessions.iter().cloned()));

        if let Some(tournament) = state.tournaments.get_mut(&tournament_id) {
            tournament.sessions_generated = true;
            tournament.sessions_generated_at = Some(generated_at);
        }

        Ok(ids)
    }

    async fn delete_generated_sessions(&self, tournament_id: TournamentId) -> RepositoryResult<u64> {
        let mut state = self.lock();
        let tournament = state
            .tournaments
            .get_mut(&tournament_id)
            .ok_or(RepositoryError::TournamentNotFound(tournament_id))?;
        tournament.sessions_generated = false;
        tournament.sessions_generated_at = None;

        let removed = state
            .sessions
            .remove(&tournament_id)
            .map_or(0, |rows| rows.len());
        Ok(removed as u64)
    }

    async fn session_count(&self, tournament_id: TournamentId) -> RepositoryResult<usize> {
        Ok(self
            .lock()
            .sessions
            .get(&tournament_id)
            .map_or(0, Vec::len))
    }
}

#[async_trait]
impl LifecycleRepository for InMemoryStore {
    async fn apply_transition(
        &self,
        tournament_id: TournamentId,
        expected: Option<TournamentStatus>,
        entry: &StatusHistoryEntry,
    ) -> RepositoryResult<()> {
        let mut state = self.lock();
        let tournament = state
            .tournaments
            .get_mut(&tournament_id)
            .ok_or(RepositoryError::TournamentNotFound(tournament_id))?;
        if tournament.status != expected {
            return Err(RepositoryError::Conflict(tournament_id));
        }
        tournament.status = Some(entry.to);

        state
            .history
            .entry(tournament_id)
            .or_default()
            .push(entry.clone());
        Ok(())
    }

    async fn status_history(
        &self,
        tournament_id: TournamentId,
    ) -> RepositoryResult<Vec<StatusHistoryEntry>> {
        Ok(self
            .lock()
            .history
            .get(&tournament_id)
            .cloned()
            .unwrap_or_default())
    }
}
