//! Group stage followed by a knockout phase.

use chrono::Duration;

use super::{
    FormatGenerator, GenerationContext, GeneratorError, MatchDescriptor,
    bracket_plan::{BracketSlot, SlotPair, schedule_bracket, seeded_pairs},
    swiss::split_players,
};
use crate::algorithms::{
    BracketStructure, GroupDistribution, bracket_structure, group_label, optimal_groups,
    pairings, play_in_pairings, rounds_needed,
};
use crate::tournament::{MatchStyle, TournamentPhase, UserId};
use crate::venue::FieldPool;

/// Multiple of the break separating the group stage from the knockout phase
pub const PHASE_BREAK_MULTIPLIER: i32 = 4;

/// Group stage (round-robin or ranking rounds per group), then a seeded knockout
///
/// Groups are routed to venues round-robin (`group index mod venue count`).
/// The knockout phase runs on the first venue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupKnockoutGenerator;

impl FormatGenerator for GroupKnockoutGenerator {
    fn generate(&self, ctx: &GenerationContext<'_>) -> Result<Vec<MatchDescriptor>, GeneratorError> {
        ctx.require_players(2)?;
        let distribution = distribution_for(ctx)?;
        let groups = split_players(ctx.players, &distribution.group_sizes);

        let mut pools = ctx.venue_pools();
        let mut sessions = match ctx.style() {
            MatchStyle::HeadToHead => group_round_robin(ctx, &groups, &distribution, &mut pools),
            MatchStyle::IndividualRanking => group_ranking(ctx, &groups, &distribution, &mut pools),
        };

        let qualifiers = distribution.qualifier_count();
        if qualifiers < 2 {
            return Ok(sessions);
        }

        let group_stage_end = pools
            .iter()
            .filter_map(FieldPool::last_end)
            .max()
            .unwrap_or(ctx.start());
        let phase_break =
            Duration::minutes(i64::from(ctx.schedule.break_duration_minutes)) * PHASE_BREAK_MULTIPLIER;
        let mut knockout_pool = ctx.baseline_pool(group_stage_end + phase_break);

        sessions.extend(knockout_phase(ctx, &distribution, &mut knockout_pool));
        Ok(sessions)
    }
}

/// Configured layout for this player count, else the balanced default
fn distribution_for(ctx: &GenerationContext<'_>) -> Result<GroupDistribution, GeneratorError> {
    let players = ctx.players.len();
    if let Some(layout) = ctx.config.and_then(|config| config.group_override(players)) {
        return GroupDistribution::with_group_count(players, layout.groups, layout.qualifiers_per_group)
            .ok_or(GeneratorError::InvalidGroupOverride {
                players,
                groups: layout.groups,
                qualifiers: layout.qualifiers_per_group,
            });
    }
    optimal_groups(players).ok_or(GeneratorError::NoGroupDistribution(players))
}

fn group_round_robin(
    ctx: &GenerationContext<'_>,
    groups: &[Vec<UserId>],
    distribution: &GroupDistribution,
    pools: &mut [FieldPool],
) -> Vec<MatchDescriptor> {
    let mut sessions = Vec::new();

    for round in 1..=distribution.group_rounds {
        let mut match_number = 0;
        for (index, members) in groups.iter().enumerate() {
            if round > rounds_needed(members.len()) {
                continue;
            }
            let label = group_label(index);
            let pool_index = index % pools.len();
            for (home, away) in pairings(members, round) {
                match_number += 1;
                let mut session = ctx.book(
                    &mut pools[pool_index],
                    TournamentPhase::GroupStage,
                    round as u32,
                    match_number,
                    format!("Group {label} - Round {round}"),
                );
                session.participants = Some(vec![home, away]);
                session.metadata.group = Some(label.clone());
                session.metadata.expected_participants = Some(2);
                sessions.push(session);
            }
        }
    }

    sessions
}

fn group_ranking(
    ctx: &GenerationContext<'_>,
    groups: &[Vec<UserId>],
    distribution: &GroupDistribution,
    pools: &mut [FieldPool],
) -> Vec<MatchDescriptor> {
    let rounds = ctx
        .config
        .and_then(|config| config.ranking_rounds)
        .unwrap_or(distribution.group_rounds as u32)
        .max(1);
    let mut sessions = Vec::new();

    for round in 1..=rounds {
        for (index, members) in groups.iter().enumerate() {
            let label = group_label(index);
            let pool_index = index % pools.len();
            let mut session = ctx.book(
                &mut pools[pool_index],
                TournamentPhase::GroupStage,
                round,
                index as u32 + 1,
                format!("Group {label} - Round {round}"),
            );
            session.participants = Some(members.clone());
            session.metadata.group = Some(label);
            session.metadata.expected_participants = Some(members.len());
            sessions.push(session);
        }
    }

    sessions
}

/// Qualifier labels in seed order: every group winner, then every runner-up, ...
fn qualifier_labels(distribution: &GroupDistribution) -> Vec<String> {
    (1..=distribution.qualifiers_per_group)
        .flat_map(|rank| {
            (0..distribution.group_count).map(move |group| format!("{}{rank}", group_label(group)))
        })
        .collect()
}

/// Fixed cross-over pairings for two or four groups with two qualifiers each
fn crossover_pairs(distribution: &GroupDistribution) -> Option<Vec<SlotPair>> {
    if distribution.qualifiers_per_group != 2 {
        return None;
    }
    let table: &[(&str, &str)] = match distribution.group_count {
        2 => &[("A1", "B2"), ("B1", "A2")],
        4 => &[("A1", "B2"), ("C1", "D2"), ("B1", "A2"), ("D1", "C2")],
        _ => return None,
    };
    Some(
        table
            .iter()
            .map(|(a, b)| {
                (
                    Some(BracketSlot::placeholder(*a)),
                    Some(BracketSlot::placeholder(*b)),
                )
            })
            .collect(),
    )
}

fn knockout_phase(
    ctx: &GenerationContext<'_>,
    distribution: &GroupDistribution,
    pool: &mut FieldPool,
) -> Vec<MatchDescriptor> {
    let qualifiers = distribution.qualifier_count();
    let structure = bracket_structure(qualifiers);
    let seeds = qualifier_labels(distribution);
    let main_size = structure.main_bracket_size(qualifiers);
    let mut sessions = Vec::new();

    let play_ins = play_in_pairings(&structure, qualifiers);
    for (index, (high, low)) in play_ins.iter().enumerate() {
        let match_number = index as u32 + 1;
        let title = if main_size == 1 {
            ctx.round_name(2)
        } else {
            format!("Play-in - Match {match_number}")
        };
        let mut session = ctx.book(pool, TournamentPhase::Knockout, 1, match_number, title);
        session.description = format!("{} vs {}", seeds[high - 1], seeds[low - 1]);
        session.metadata.seeding = Some(session.description.clone());
        session.metadata.round_name = Some(if main_size == 1 {
            ctx.round_name(2)
        } else {
            "Play-in".to_string()
        });
        session.metadata.expected_participants = Some(2);
        sessions.push(session);
    }
    if !play_ins.is_empty() {
        pool.round_barrier();
    }
    if main_size < 2 {
        return sessions;
    }

    let first_round_pairs = if play_ins.is_empty() {
        crossover_pairs(distribution).unwrap_or_else(|| {
            let entrants: Vec<_> = seeds.iter().map(BracketSlot::placeholder).collect();
            seeded_pairs(&entrants, main_size)
        })
    } else {
        seeded_pairs(&main_entrants(&structure, &seeds, play_ins.len()), main_size)
    };

    let first_round_number = if play_ins.is_empty() { 1 } else { 2 };
    let with_bronze =
        structure.has_bronze && ctx.config.is_none_or(|config| config.third_place_playoff);

    sessions.extend(schedule_bracket(
        ctx,
        pool,
        first_round_pairs,
        first_round_number,
        with_bronze,
    ));
    sessions
}

/// Seeds with a bye, followed by the play-in winners
fn main_entrants(structure: &BracketStructure, seeds: &[String], play_ins: usize) -> Vec<BracketSlot> {
    seeds
        .iter()
        .take(structure.byes)
        .map(BracketSlot::placeholder)
        .chain((1..=play_ins).map(|k| BracketSlot::placeholder(format!("Play-in {k} winner"))))
        .collect()
}
