//! Session generation orchestration.
//!
//! [`SessionGenerationCoordinator`] runs a generation request end to end:
//!
//! 1. [`GenerationValidator`] decides whether the tournament may be generated
//! 2. venue schedules are resolved, one per venue when several are given
//! 3. the seeding pool is built from check-ins, or approvals when nobody has
//!    checked in
//! 4. match-style and bracket-type rules are checked
//! 5. the format generator builds the descriptors
//! 6. descriptors and the generated flag are stored in one transaction
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use chrono::Utc;
//! use tournament_sessions::db::InMemoryStore;
//! use tournament_sessions::generation::{GenerationRequest, SessionGenerationCoordinator};
//! use tournament_sessions::lifecycle::TournamentStatus;
//! use tournament_sessions::tournament::{
//!     BracketTypeConfig, MatchStyle, SeedEntry, Tournament, TournamentFormat,
//! };
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let store = Arc::new(InMemoryStore::new().with_tournament(
//!     Tournament::new(1, "Spring League", TournamentFormat::League, MatchStyle::HeadToHead, Utc::now())
//!         .with_bracket_type(BracketTypeConfig::league())
//!         .with_status(TournamentStatus::InProgress),
//! ));
//! store.set_enrollments(1, (1..=4).map(SeedEntry::approved).collect());
//!
//! let coordinator = SessionGenerationCoordinator::new(store);
//! let outcome = coordinator.generate(1, &GenerationRequest::default()).await.unwrap();
//! assert!(outcome.success);
//! assert_eq!(outcome.sessions.len(), 6);
//! # });
//! ```

pub mod coordinator;
pub mod errors;
pub mod seeding;
pub mod validator;

pub use coordinator::{
    DEFAULT_BREAK_MINUTES, DEFAULT_SESSION_DURATION, GenerationOutcome, GenerationRequest,
    SessionGenerationCoordinator,
};
pub use errors::{GenerationError, GenerationResult};
pub use seeding::{SeedingPool, resolve_seeding_pool};
pub use validator::{Eligibility, GENERATION_STATUSES, GenerationValidator, check_tournament};
