//! Pure combinatorial algorithms behind session generation.
//!
//! - [`pairing`]: circle-method round-robin pairings
//! - [`groups`]: balanced group-stage sizing
//! - [`bracket`]: knockout bracket sizing, byes and play-ins
//!
//! None of these perform I/O and all are deterministic.

pub mod bracket;
pub mod groups;
pub mod pairing;

pub use bracket::{BracketStructure, bracket_structure, knockout_rounds, play_in_pairings};
pub use groups::{GroupDistribution, group_label, optimal_groups};
pub use pairing::{pairings, round_robin, rounds_needed};
