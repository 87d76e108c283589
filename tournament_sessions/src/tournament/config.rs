//! Bracket-type configuration models.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Explicit group layout for a given player count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupOverride {
    /// Number of groups
    pub groups: usize,
    /// Players advancing from each group
    pub qualifiers_per_group: usize,
}

/// Format-specific rules required by head-to-head tournaments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketTypeConfig {
    /// Bracket type code (e.g. "KNOCKOUT")
    pub code: String,

    /// Human-readable name used in messages (e.g. "Knockout")
    pub display_name: String,

    /// Minimum number of players
    pub min_players: usize,

    /// Maximum number of players (None = unlimited)
    pub max_players: Option<usize>,

    /// Whether the player count must be a power of two
    pub requires_power_of_two: bool,

    /// Round titles keyed by the number of players left in the round ("2" => "Final")
    #[serde(default)]
    pub round_names: BTreeMap<String, String>,

    /// Whether a third-place match is played
    #[serde(default)]
    pub third_place_playoff: bool,

    /// Group layout overrides keyed by player count
    #[serde(default)]
    pub group_configuration: BTreeMap<String, GroupOverride>,

    /// Pod size for individual-ranking swiss rounds (default: 4)
    pub pod_size: Option<usize>,

    /// Number of all-play ranking rounds
    pub ranking_rounds: Option<u32>,

    /// Number of swiss rounds (default: ceil(log2(players)))
    pub swiss_rounds: Option<u32>,
}

impl BracketTypeConfig {
    /// Create a configuration with no special rules
    pub fn new(code: impl Into<String>, display_name: impl Into<String>, min_players: usize) -> Self {
        Self {
            code: code.into(),
            display_name: display_name.into(),
            min_players,
            max_players: None,
            requires_power_of_two: false,
            round_names: BTreeMap::new(),
            third_place_playoff: false,
            group_configuration: BTreeMap::new(),
            pod_size: None,
            ranking_rounds: None,
            swiss_rounds: None,
        }
    }

    /// Standard single-elimination rules: power-of-two field between 4 and 64
    pub fn knockout() -> Self {
        Self {
            max_players: Some(64),
            requires_power_of_two: true,
            third_place_playoff: true,
            ..Self::new("KNOCKOUT", "Knockout", 4)
        }
    }

    /// Round-robin league rules
    pub fn league() -> Self {
        Self {
            max_players: Some(32),
            ..Self::new("LEAGUE", "League", 2)
        }
    }

    /// Group stage + knockout rules
    pub fn group_knockout() -> Self {
        Self {
            max_players: Some(64),
            third_place_playoff: true,
            ..Self::new("GROUP_KNOCKOUT", "Group + Knockout", 6)
        }
    }

    /// Swiss rules
    pub fn swiss() -> Self {
        Self {
            max_players: Some(128),
            ..Self::new("SWISS", "Swiss", 4)
        }
    }

    /// Check a player count against min/max/power-of-two rules
    ///
    /// # Returns
    ///
    /// * `Result<(), String>` - Ok, or an actionable message for the caller
    pub fn validate_player_count(&self, players: usize) -> Result<(), String> {
        if players < self.min_players {
            return Err(format!(
                "{} requires at least {} players. Got {}",
                self.display_name, self.min_players, players
            ));
        }

        if let Some(max) = self.max_players {
            if players > max {
                return Err(format!(
                    "{} allows at most {} players. Got {}",
                    self.display_name, max, players
                ));
            }
        }

        if self.requires_power_of_two && !players.is_power_of_two() {
            let allowed: Vec<String> = powers_of_two_between(self.min_players, self.max_players)
                .iter()
                .map(ToString::to_string)
                .collect();
            return Err(format!(
                "{} requires power-of-2 players ({}). Got {}",
                self.display_name,
                allowed.join(", "),
                players
            ));
        }

        Ok(())
    }

    /// Title for a round with `players_left` entrants
    pub fn round_name(&self, players_left: usize) -> String {
        self.round_names
            .get(&players_left.to_string())
            .cloned()
            .unwrap_or_else(|| default_round_name(players_left))
    }

    /// Group override for an exact player count
    pub fn group_override(&self, players: usize) -> Option<&GroupOverride> {
        self.group_configuration.get(&players.to_string())
    }
}

/// Conventional name of a knockout round by entrant count
pub fn default_round_name(players_left: usize) -> String {
    match players_left {
        0..=2 => "Final".to_string(),
        3..=4 => "Semi-final".to_string(),
        5..=8 => "Quarter-final".to_string(),
        n => format!("Round of {n}"),
    }
}

fn powers_of_two_between(min: usize, max: Option<usize>) -> Vec<usize> {
    let upper = max.unwrap_or(64).max(min);
    let mut value = min.max(2).next_power_of_two();
    let mut out = Vec::new();
    while value <= upper {
        out.push(value);
        value *= 2;
    }
    out
}
