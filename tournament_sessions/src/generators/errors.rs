//! Generator error types.

use thiserror::Error;

use crate::tournament::{MatchStyle, TournamentFormat};

/// Reasons a generator cannot build a schedule
///
/// These are configuration problems; the display text is returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
    /// Format cannot be played in this match style
    #[error("{format} does not support {style} matches")]
    UnsupportedMatchStyle {
        format: TournamentFormat,
        style: MatchStyle,
    },

    /// Too few players for the format
    #[error("{format} requires at least {required} players. Got {found}")]
    NotEnoughPlayers {
        format: TournamentFormat,
        required: usize,
        found: usize,
    },

    /// No group layout keeps every group within the allowed sizes
    #[error("Cannot split {0} players into groups of 3 to 5")]
    NoGroupDistribution(usize),

    /// Explicit group layout does not fit the player count
    #[error("Group configuration for {players} players is invalid: {groups} groups with {qualifiers} qualifiers each")]
    InvalidGroupOverride {
        players: usize,
        groups: usize,
        qualifiers: usize,
    },

    /// Round count pushes the session end past what can be scheduled
    #[error("Cannot schedule {0} rounds in one session")]
    RoundsOutOfRange(u32),
}
