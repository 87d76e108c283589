//! Tournament data models consumed by session generation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

use super::config::BracketTypeConfig;
use crate::lifecycle::TournamentStatus;

/// Tournament ID type
pub type TournamentId = i64;

/// User ID type
pub type UserId = i64;

/// Venue (location) ID type
pub type VenueId = i64;

/// Persisted session ID type
pub type SessionId = i64;

/// Error returned when a stored enum value is not recognised
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Tournament format (bracket type)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TournamentFormat {
    /// Everyone plays everyone
    League,
    /// Single elimination
    Knockout,
    /// Group stage followed by a knockout phase
    GroupKnockout,
    /// Swiss system
    Swiss,
    /// No bracket: one ranked session for all players
    IndividualRanking,
}

impl TournamentFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            TournamentFormat::League => "LEAGUE",
            TournamentFormat::Knockout => "KNOCKOUT",
            TournamentFormat::GroupKnockout => "GROUP_KNOCKOUT",
            TournamentFormat::Swiss => "SWISS",
            TournamentFormat::IndividualRanking => "INDIVIDUAL_RANKING",
        }
    }
}

impl fmt::Display for TournamentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TournamentFormat {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LEAGUE" => Ok(TournamentFormat::League),
            "KNOCKOUT" => Ok(TournamentFormat::Knockout),
            "GROUP_KNOCKOUT" => Ok(TournamentFormat::GroupKnockout),
            "SWISS" => Ok(TournamentFormat::Swiss),
            "INDIVIDUAL_RANKING" => Ok(TournamentFormat::IndividualRanking),
            _ => Err(ParseEnumError::new("tournament format", s)),
        }
    }
}

/// How players meet in a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStyle {
    /// Two players per match
    HeadToHead,
    /// Every participant of a session is ranked by a measured result
    IndividualRanking,
}

impl MatchStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStyle::HeadToHead => "HEAD_TO_HEAD",
            MatchStyle::IndividualRanking => "INDIVIDUAL_RANKING",
        }
    }
}

impl fmt::Display for MatchStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MatchStyle {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HEAD_TO_HEAD" => Ok(MatchStyle::HeadToHead),
            "INDIVIDUAL_RANKING" => Ok(MatchStyle::IndividualRanking),
            _ => Err(ParseEnumError::new("match style", s)),
        }
    }
}

/// Scoring method of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScoringType {
    ScoreBased,
    TimeBased,
    DistanceBased,
    Placement,
    /// Multi-round entry; the real measurement lives in session metadata
    RoundsBased,
}

impl ScoringType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringType::ScoreBased => "SCORE_BASED",
            ScoringType::TimeBased => "TIME_BASED",
            ScoringType::DistanceBased => "DISTANCE_BASED",
            ScoringType::Placement => "PLACEMENT",
            ScoringType::RoundsBased => "ROUNDS_BASED",
        }
    }
}

impl fmt::Display for ScoringType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ScoringType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SCORE_BASED" => Ok(ScoringType::ScoreBased),
            "TIME_BASED" => Ok(ScoringType::TimeBased),
            "DISTANCE_BASED" => Ok(ScoringType::DistanceBased),
            "PLACEMENT" => Ok(ScoringType::Placement),
            "ROUNDS_BASED" => Ok(ScoringType::RoundsBased),
            _ => Err(ParseEnumError::new("scoring type", s)),
        }
    }
}

/// Tournament phase a session belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TournamentPhase {
    GroupStage,
    Knockout,
    League,
    Swiss,
    IndividualRanking,
}

impl TournamentPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TournamentPhase::GroupStage => "GROUP_STAGE",
            TournamentPhase::Knockout => "KNOCKOUT",
            TournamentPhase::League => "LEAGUE",
            TournamentPhase::Swiss => "SWISS",
            TournamentPhase::IndividualRanking => "INDIVIDUAL_RANKING",
        }
    }
}

impl fmt::Display for TournamentPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TournamentPhase {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GROUP_STAGE" => Ok(TournamentPhase::GroupStage),
            "KNOCKOUT" => Ok(TournamentPhase::Knockout),
            "LEAGUE" => Ok(TournamentPhase::League),
            "SWISS" => Ok(TournamentPhase::Swiss),
            "INDIVIDUAL_RANKING" => Ok(TournamentPhase::IndividualRanking),
            _ => Err(ParseEnumError::new("tournament phase", s)),
        }
    }
}

/// Enrollment approval state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalState {
    Pending,
    Approved,
    Rejected,
}

impl FromStr for ApprovalState {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(ApprovalState::Pending),
            "APPROVED" => Ok(ApprovalState::Approved),
            "REJECTED" => Ok(ApprovalState::Rejected),
            _ => Err(ParseEnumError::new("approval state", s)),
        }
    }
}

/// Tournament aggregate as seen by the generation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    /// Tournament ID
    pub id: TournamentId,
    /// Display name
    pub name: String,
    /// Bracket format (immutable after creation)
    pub format: TournamentFormat,
    /// Match style (immutable after creation)
    pub match_style: MatchStyle,
    /// Scoring method
    pub scoring_type: ScoringType,
    /// Scheduled start
    pub start_time: DateTime<Utc>,
    /// Scheduled end
    pub end_time: Option<DateTime<Utc>>,
    /// Primary venue
    pub venue_id: Option<VenueId>,
    /// Free-text location used when a venue has no label
    pub location: Option<String>,
    /// Enrollment cap
    pub max_participants: Option<u32>,
    /// Current lifecycle status (None for a tournament that was never drafted)
    pub status: Option<TournamentStatus>,
    /// Assigned instructor
    pub instructor_id: Option<UserId>,
    /// Tournament-wide match duration default
    pub match_duration_minutes: Option<u32>,
    /// Tournament-wide break default
    pub break_duration_minutes: Option<u32>,
    /// Tournament-wide parallel field default
    pub parallel_fields: Option<u32>,
    /// Whether sessions have already been generated
    pub sessions_generated: bool,
    /// When sessions were generated
    pub sessions_generated_at: Option<DateTime<Utc>>,
    /// Bracket-type rules (required for head-to-head formats)
    pub bracket_type: Option<BracketTypeConfig>,
}

impl Tournament {
    /// Create a tournament with the required attributes; everything else starts unset
    pub fn new(
        id: TournamentId,
        name: impl Into<String>,
        format: TournamentFormat,
        match_style: MatchStyle,
        start_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            format,
            match_style,
            scoring_type: ScoringType::ScoreBased,
            start_time,
            end_time: None,
            venue_id: None,
            location: None,
            max_participants: None,
            status: Some(TournamentStatus::Draft),
            instructor_id: None,
            match_duration_minutes: None,
            break_duration_minutes: None,
            parallel_fields: None,
            sessions_generated: false,
            sessions_generated_at: None,
            bracket_type: None,
        }
    }

    /// Attach bracket-type rules
    pub fn with_bracket_type(mut self, config: BracketTypeConfig) -> Self {
        self.bracket_type = Some(config);
        self
    }

    /// Set the lifecycle status
    pub fn with_status(mut self, status: TournamentStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// One player's entry in the seeding pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedEntry {
    pub user_id: UserId,
    pub is_active: bool,
    pub approval: ApprovalState,
    pub checked_in_at: Option<DateTime<Utc>>,
}

impl SeedEntry {
    /// Active, approved entry without a check-in
    pub fn approved(user_id: UserId) -> Self {
        Self {
            user_id,
            is_active: true,
            approval: ApprovalState::Approved,
            checked_in_at: None,
        }
    }

    /// Mark the entry as checked in
    pub fn checked_in(mut self, at: DateTime<Utc>) -> Self {
        self.checked_in_at = Some(at);
        self
    }
}

/// Per-venue schedule override; `None` fields inherit the tournament defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueScheduleConfig {
    pub tournament_id: TournamentId,
    pub venue_id: VenueId,
    pub match_duration_minutes: Option<u32>,
    pub break_duration_minutes: Option<u32>,
    pub parallel_fields: Option<u32>,
    pub venue_label: Option<String>,
    pub is_active: bool,
}
