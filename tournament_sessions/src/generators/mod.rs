//! Format generators.
//!
//! Each tournament format has one generator. All of them share the
//! [`FormatGenerator`] capability and are dispatched through the closed
//! [`SessionGenerator`] enum. Generators are synchronous and deterministic: the
//! same context always yields the same descriptor list, and none of them touch
//! storage.
//!
//! ## Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use tournament_sessions::generators::{FormatGenerator, GenerationContext, SessionGenerator};
//! use tournament_sessions::tournament::{BracketTypeConfig, MatchStyle, Tournament, TournamentFormat};
//! use tournament_sessions::venue::{ResolvedVenue, ScheduleDefaults};
//!
//! let start = Utc.with_ymd_and_hms(2025, 5, 10, 9, 0, 0).unwrap();
//! let tournament = Tournament::new(1, "Spring Cup", TournamentFormat::Knockout, MatchStyle::HeadToHead, start);
//! let config = BracketTypeConfig::knockout();
//! let defaults = ScheduleDefaults { match_duration_minutes: 60, break_duration_minutes: 10, parallel_fields: 2 };
//! let schedule = ResolvedVenue::from_defaults(None, defaults, None);
//! let players: Vec<i64> = (1..=8).collect();
//!
//! let ctx = GenerationContext::new(&tournament, Some(&config), &players, &schedule, &[], 1);
//! let sessions = SessionGenerator::for_format(tournament.format).generate(&ctx).unwrap();
//! assert_eq!(sessions.len(), 8); // 4 + 2 + 1, plus the third-place match
//! ```

use chrono::{DateTime, Utc};
use enum_dispatch::enum_dispatch;

pub mod bracket_plan;
pub mod errors;
pub mod group_knockout;
pub mod individual_ranking;
pub mod knockout;
pub mod league;
pub mod models;
pub mod swiss;

pub use errors::GeneratorError;
pub use group_knockout::GroupKnockoutGenerator;
pub use individual_ranking::IndividualRankingGenerator;
pub use knockout::KnockoutGenerator;
pub use league::LeagueGenerator;
pub use models::{BRONZE_MATCH_NUMBER, MatchDescriptor, RoundsData, ScheduleSummary, SessionMetadata};
pub use swiss::SwissGenerator;

use crate::tournament::{
    BracketTypeConfig, MatchStyle, Tournament, TournamentFormat, TournamentPhase, UserId,
    default_round_name,
};
use crate::venue::{FieldPool, ResolvedVenue};

/// Inputs shared by every generator
#[derive(Debug, Clone, Copy)]
pub struct GenerationContext<'a> {
    pub tournament: &'a Tournament,
    /// Bracket-type rules (always present for head-to-head formats)
    pub config: Option<&'a BracketTypeConfig>,
    /// Seeding pool in seed order
    pub players: &'a [UserId],
    /// Baseline schedule, used by phases that are not split across venues
    pub schedule: &'a ResolvedVenue,
    /// Per-venue schedules; empty when the tournament is not venue-partitioned
    pub venues: &'a [ResolvedVenue],
    /// Requested round count for individual ranking sessions
    pub number_of_rounds: u32,
}

impl<'a> GenerationContext<'a> {
    pub fn new(
        tournament: &'a Tournament,
        config: Option<&'a BracketTypeConfig>,
        players: &'a [UserId],
        schedule: &'a ResolvedVenue,
        venues: &'a [ResolvedVenue],
        number_of_rounds: u32,
    ) -> Self {
        Self {
            tournament,
            config,
            players,
            schedule,
            venues,
            number_of_rounds,
        }
    }

    pub fn style(&self) -> MatchStyle {
        self.tournament.match_style
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.tournament.start_time
    }

    /// Single pool on the baseline venue starting at `start`
    pub fn baseline_pool(&self, start: DateTime<Utc>) -> FieldPool {
        FieldPool::new(start, self.schedule)
    }

    /// One pool per configured venue, or just the baseline pool
    pub fn venue_pools(&self) -> Vec<FieldPool> {
        if self.venues.is_empty() {
            vec![self.baseline_pool(self.start())]
        } else {
            self.venues
                .iter()
                .map(|venue| FieldPool::new(self.start(), venue))
                .collect()
        }
    }

    /// Round title for a knockout round with `players_left` entrants
    pub fn round_name(&self, players_left: usize) -> String {
        match self.config {
            Some(config) => config.round_name(players_left),
            None => default_round_name(players_left),
        }
    }

    pub(crate) fn require_players(&self, required: usize) -> Result<(), GeneratorError> {
        if self.players.len() < required {
            return Err(GeneratorError::NotEnoughPlayers {
                format: self.tournament.format,
                required,
                found: self.players.len(),
            });
        }
        Ok(())
    }

    /// Descriptor booked on the next slot of `pool`
    pub(crate) fn book(
        &self,
        pool: &mut FieldPool,
        phase: TournamentPhase,
        round_number: u32,
        match_number: u32,
        title: String,
    ) -> MatchDescriptor {
        let slot = pool.assign();
        MatchDescriptor {
            title,
            description: String::new(),
            start_time: slot.start,
            end_time: slot.end,
            phase,
            round_number,
            match_number,
            location: pool
                .label()
                .map(str::to_string)
                .or_else(|| self.tournament.location.clone()),
            participants: None,
            match_format: self.tournament.match_style,
            scoring_type: self.tournament.scoring_type,
            metadata: SessionMetadata {
                field_number: Some(slot.field_number),
                venue_id: pool.venue_id(),
                ..SessionMetadata::default()
            },
        }
    }
}

/// Capability shared by all format generators
#[enum_dispatch]
pub trait FormatGenerator {
    /// Build the ordered session list for the context
    fn generate(&self, ctx: &GenerationContext<'_>) -> Result<Vec<MatchDescriptor>, GeneratorError>;
}

/// Closed set of generators, one per tournament format
#[enum_dispatch(FormatGenerator)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionGenerator {
    League(LeagueGenerator),
    Knockout(KnockoutGenerator),
    Swiss(SwissGenerator),
    GroupKnockout(GroupKnockoutGenerator),
    IndividualRanking(IndividualRankingGenerator),
}

impl SessionGenerator {
    /// Generator for a tournament format
    pub fn for_format(format: TournamentFormat) -> Self {
        match format {
            TournamentFormat::League => LeagueGenerator.into(),
            TournamentFormat::Knockout => KnockoutGenerator.into(),
            TournamentFormat::Swiss => SwissGenerator.into(),
            TournamentFormat::GroupKnockout => GroupKnockoutGenerator.into(),
            TournamentFormat::IndividualRanking => IndividualRankingGenerator.into(),
        }
    }
}
