//! Tournament models consumed by the generation engine.
//!
//! This module provides:
//! - Tournament aggregate, formats, match styles and scoring types
//! - Seeding pool entries and per-venue schedule overrides
//! - Bracket-type configuration with player-count validation
//!
//! ## Example
//!
//! ```
//! use tournament_sessions::tournament::BracketTypeConfig;
//!
//! let config = BracketTypeConfig::knockout();
//! assert!(config.validate_player_count(8).is_ok());
//! assert!(config.validate_player_count(12).is_err());
//! ```

pub mod config;
pub mod models;

pub use config::{BracketTypeConfig, GroupOverride, default_round_name};
pub use models::{
    ApprovalState, MatchStyle, ParseEnumError, ScoringType, SeedEntry, SessionId, Tournament,
    TournamentFormat, TournamentId, TournamentPhase, UserId, VenueId, VenueScheduleConfig,
};
