//! Integration tests for the tournament lifecycle
//!
//! Walks a tournament through its statuses with the lifecycle manager and the
//! in-memory store, checking guards, the rollback edge and the status history.

use chrono::{Duration, TimeZone, Utc};
use std::sync::Arc;
use tournament_sessions::db::{InMemoryStore, SessionRepository};
use tournament_sessions::generators::{FormatGenerator, GenerationContext, SessionGenerator};
use tournament_sessions::lifecycle::{LifecycleManager, TournamentStatus, TransitionError};
use tournament_sessions::tournament::{
    MatchStyle, SeedEntry, Tournament, TournamentFormat, UserId,
};
use tournament_sessions::venue::{ResolvedVenue, ScheduleDefaults};

const TOURNAMENT: i64 = 3;

fn draft() -> Tournament {
    let start = Utc.with_ymd_and_hms(2025, 9, 6, 10, 0, 0).unwrap();
    let mut tournament = Tournament::new(
        TOURNAMENT,
        "Autumn Sprint",
        TournamentFormat::IndividualRanking,
        MatchStyle::IndividualRanking,
        start,
    );
    tournament.end_time = Some(start + Duration::hours(6));
    tournament
}

fn update(store: &InMemoryStore, change: impl FnOnce(&mut Tournament)) {
    let mut tournament = store.tournament(TOURNAMENT).unwrap();
    change(&mut tournament);
    store.insert_tournament(tournament);
}

async fn add_session(store: &InMemoryStore) {
    let tournament = store.tournament(TOURNAMENT).unwrap();
    let players: Vec<UserId> = vec![1, 2, 3];
    let schedule = ResolvedVenue::from_defaults(
        None,
        ScheduleDefaults {
            match_duration_minutes: 120,
            break_duration_minutes: 0,
            parallel_fields: 1,
        },
        None,
    );
    let ctx = GenerationContext::new(&tournament, None, &players, &schedule, &[], 1);
    let sessions = SessionGenerator::for_format(tournament.format)
        .generate(&ctx)
        .unwrap();
    store
        .commit_generation(TOURNAMENT, &sessions, Utc::now())
        .await
        .unwrap();
}

fn setup() -> (Arc<InMemoryStore>, LifecycleManager<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new().with_tournament(draft()));
    let manager = LifecycleManager::new(Arc::clone(&store));
    (store, manager)
}

#[tokio::test]
async fn test_full_lifecycle_walk() {
    let (store, manager) = setup();

    let outcome = manager
        .transition(TOURNAMENT, TournamentStatus::SeekingInstructor, None)
        .await
        .unwrap();
    assert!(!outcome.success);
    assert_eq!(outcome.message, "Cannot seek an instructor: missing sessions");
    assert_eq!(outcome.status, Some(TournamentStatus::Draft));

    add_session(&store).await;
    let outcome = manager
        .transition(TOURNAMENT, TournamentStatus::SeekingInstructor, None)
        .await
        .unwrap();
    assert!(outcome.success);
    assert_eq!(outcome.message, "Tournament status changed to SEEKING_INSTRUCTOR");

    let outcome = manager
        .transition(TOURNAMENT, TournamentStatus::PendingInstructorAcceptance, None)
        .await
        .unwrap();
    assert_eq!(
        outcome.message,
        "Cannot request instructor acceptance: no instructor assigned"
    );

    update(&store, |t| t.instructor_id = Some(77));
    for status in [
        TournamentStatus::PendingInstructorAcceptance,
        TournamentStatus::InstructorConfirmed,
    ] {
        assert!(manager.transition(TOURNAMENT, status, None).await.unwrap().success);
    }

    update(&store, |t| {
        t.max_participants = Some(16);
        t.venue_id = Some(0);
    });
    let outcome = manager
        .transition(TOURNAMENT, TournamentStatus::EnrollmentOpen, None)
        .await
        .unwrap();
    assert_eq!(outcome.message, "Cannot open enrollment: missing venue");

    update(&store, |t| t.venue_id = Some(4));
    assert!(
        manager
            .transition(TOURNAMENT, TournamentStatus::EnrollmentOpen, None)
            .await
            .unwrap()
            .success
    );

    store.set_enrollments(TOURNAMENT, vec![SeedEntry::approved(1)]);
    let outcome = manager
        .transition(TOURNAMENT, TournamentStatus::EnrollmentClosed, None)
        .await
        .unwrap();
    assert_eq!(
        outcome.message,
        "Cannot close enrollment: at least 2 active enrollments required (found 1)"
    );

    store.set_enrollments(TOURNAMENT, (1..=4).map(SeedEntry::approved).collect());
    for status in [TournamentStatus::EnrollmentClosed, TournamentStatus::InProgress] {
        assert!(manager.transition(TOURNAMENT, status, None).await.unwrap().success);
    }
    assert_eq!(
        store.tournament(TOURNAMENT).unwrap().status,
        Some(TournamentStatus::InProgress)
    );

    let history = manager.history(TOURNAMENT).await.unwrap();
    assert_eq!(history.len(), 6);
    assert_eq!(history[0].from, Some(TournamentStatus::Draft));
    assert_eq!(history[5].to, TournamentStatus::InProgress);
}

#[tokio::test]
async fn test_rollback_with_no_enrollments() {
    let (store, manager) = setup();
    update(&store, |t| t.status = Some(TournamentStatus::InProgress));

    let outcome = manager
        .transition(
            TOURNAMENT,
            TournamentStatus::EnrollmentClosed,
            Some("generation failed".to_string()),
        )
        .await
        .unwrap();
    assert!(outcome.success, "{}", outcome.message);
    assert_eq!(outcome.status, Some(TournamentStatus::EnrollmentClosed));

    let history = manager.history(TOURNAMENT).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].reason.as_deref(), Some("generation failed"));

    // The forward edge still needs players
    let check = manager
        .check(TOURNAMENT, TournamentStatus::InProgress)
        .await
        .unwrap();
    assert!(matches!(check, Err(TransitionError::GuardFailed(_))));
}

#[tokio::test]
async fn test_edges_outside_the_graph_are_rejected() {
    let (store, manager) = setup();
    add_session(&store).await;

    let outcome = manager
        .transition(TOURNAMENT, TournamentStatus::Completed, None)
        .await
        .unwrap();
    assert!(!outcome.success);
    assert_eq!(outcome.message, "Invalid status transition: DRAFT -> COMPLETED");

    update(&store, |t| t.status = Some(TournamentStatus::Completed));
    let outcome = manager
        .transition(TOURNAMENT, TournamentStatus::Cancelled, None)
        .await
        .unwrap();
    assert!(!outcome.success);

    update(&store, |t| t.status = Some(TournamentStatus::Archived));
    for status in TournamentStatus::ALL {
        let check = manager.check(TOURNAMENT, status).await.unwrap();
        assert!(matches!(check, Err(TransitionError::NotAllowed { .. })));
    }
    assert!(manager.history(TOURNAMENT).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_cancellation_reachable_until_finished() {
    let (store, manager) = setup();
    for status in [
        TournamentStatus::Draft,
        TournamentStatus::SeekingInstructor,
        TournamentStatus::PendingInstructorAcceptance,
        TournamentStatus::InstructorConfirmed,
        TournamentStatus::EnrollmentOpen,
        TournamentStatus::EnrollmentClosed,
        TournamentStatus::InProgress,
    ] {
        update(&store, |t| t.status = Some(status));
        let check = manager
            .check(TOURNAMENT, TournamentStatus::Cancelled)
            .await
            .unwrap();
        assert!(check.is_ok(), "{status} -> CANCELLED");
    }
}

#[tokio::test]
async fn test_unknown_tournament() {
    let (_, manager) = setup();
    let outcome = manager
        .transition(99, TournamentStatus::Draft, None)
        .await
        .unwrap();
    assert!(!outcome.success);
    assert_eq!(outcome.message, "Tournament 99 not found");
    assert_eq!(outcome.status, None);
}
