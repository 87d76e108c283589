//! Match descriptors produced by the format generators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::tournament::{MatchStyle, ScoringType, TournamentPhase, UserId, VenueId};

/// Sentinel match number of the third-place match
pub const BRONZE_MATCH_NUMBER: u32 = 999;

/// Round tracking for multi-round individual sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundsData {
    pub total_rounds: u32,
    pub completed_rounds: u32,
    /// Keyed by round number, filled in as rounds are submitted
    #[serde(default)]
    pub round_results: BTreeMap<String, serde_json::Value>,
}

impl RoundsData {
    pub fn new(total_rounds: u32) -> Self {
        Self {
            total_rounds,
            completed_rounds: 0,
            round_results: BTreeMap::new(),
        }
    }
}

/// Structured metadata stored with each session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_participants: Option<usize>,
    /// Placeholder such as "A1 vs B2" while participants are unknown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seeding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue_id: Option<VenueId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rounds_data: Option<RoundsData>,
    /// Real unit when the exposed scoring type is ROUNDS_BASED
    #[serde(skip_serializing_if = "Option::is_none")]
    pub measurement_type: Option<ScoringType>,
    /// How later-round participants will be chosen
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pairing_basis: Option<String>,
}

/// One generated session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDescriptor {
    pub title: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub phase: TournamentPhase,
    pub round_number: u32,
    pub match_number: u32,
    pub location: Option<String>,
    /// None until earlier results decide who plays
    pub participants: Option<Vec<UserId>>,
    pub match_format: MatchStyle,
    pub scoring_type: ScoringType,
    pub metadata: SessionMetadata,
}

impl MatchDescriptor {
    /// Whether the participants are already fixed
    pub fn is_determined(&self) -> bool {
        self.participants.is_some()
    }
}

/// Aggregate view of a generated schedule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub total_sessions: usize,
    /// Session count keyed by phase wire name
    pub per_phase: BTreeMap<String, usize>,
    /// Sessions whose participants are already known
    pub determined: usize,
    pub first_start: Option<DateTime<Utc>>,
    pub last_end: Option<DateTime<Utc>>,
}

impl ScheduleSummary {
    pub fn from_sessions(sessions: &[MatchDescriptor]) -> Self {
        let mut summary = Self {
            total_sessions: sessions.len(),
            ..Self::default()
        };
        for session in sessions {
            *summary
                .per_phase
                .entry(session.phase.as_str().to_string())
                .or_default() += 1;
            if session.is_determined() {
                summary.determined += 1;
            }
            summary.first_start = Some(
                summary
                    .first_start
                    .map_or(session.start_time, |t| t.min(session.start_time)),
            );
            summary.last_end = Some(
                summary
                    .last_end
                    .map_or(session.end_time, |t| t.max(session.end_time)),
            );
        }
        summary
    }
}

impl std::fmt::Display for ScheduleSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} sessions", self.total_sessions)?;
        for (phase, count) in &self.per_phase {
            write!(f, ", {phase}: {count}")?;
        }
        if let (Some(start), Some(end)) = (self.first_start, self.last_end) {
            write!(f, " ({} to {})", start.format("%Y-%m-%d %H:%M"), end.format("%Y-%m-%d %H:%M"))?;
        }
        Ok(())
    }
}
