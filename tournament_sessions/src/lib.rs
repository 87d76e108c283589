//! # Tournament Sessions
//!
//! Session generation and bracket scheduling for tournaments.
//!
//! Given a tournament's format, its seeded players and the venue/field
//! constraints, the engine computes every session of the event: phase, round,
//! participants where they are already known, timing, field and venue. It also
//! owns the tournament lifecycle state machine that decides when generation may
//! run.
//!
//! ## Formats
//!
//! - **League**: full round-robin, or ranking rounds for individual play
//! - **Knockout**: single elimination with standard seeding and an optional
//!   third-place match
//! - **Swiss**: sequential first-round pairing, or performance pods
//! - **Group + Knockout**: balanced groups of 3 to 5, then a knockout phase
//!   with play-ins where the qualifier count needs them
//! - **Individual ranking**: one session for the whole field, optionally
//!   spanning several rounds
//!
//! ## Core Modules
//!
//! - [`algorithms`]: round-robin pairing, group distribution, bracket sizing
//! - [`venue`]: venue override resolution and per-venue field pools
//! - [`generators`]: one generator per format behind a shared trait
//! - [`generation`]: the coordinator that validates, seeds, generates and stores
//! - [`lifecycle`]: guarded tournament status transitions
//! - [`db`]: repository traits with PostgreSQL and in-memory implementations
//!
//! ## Example
//!
//! ```
//! use tournament_sessions::algorithms::bracket_structure;
//!
//! let structure = bracket_structure(6);
//! assert_eq!(structure.bracket_size, 4);
//! assert_eq!(structure.play_in_matches, 2);
//! assert_eq!(structure.byes, 2);
//! ```

/// Pure bracket, group and pairing mathematics.
pub mod algorithms;

/// Database access layer.
pub mod db;

/// Session generation orchestration.
pub mod generation;
pub use generation::{
    GenerationError, GenerationOutcome, GenerationRequest, SessionGenerationCoordinator,
};

/// Format generators producing match descriptors.
pub mod generators;
pub use generators::{MatchDescriptor, ScheduleSummary};

/// Tournament lifecycle state machine.
pub mod lifecycle;
pub use lifecycle::{LifecycleManager, TournamentStatus, TransitionOutcome};

/// Tournament models.
pub mod tournament;
pub use tournament::{BracketTypeConfig, MatchStyle, Tournament, TournamentFormat};

/// Venue resolution and field scheduling.
pub mod venue;
