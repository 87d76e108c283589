//! Swiss-system generator.
//!
//! Only round one is paired up front. Head-to-head rounds after the first are
//! emitted as empty matches to be paired from standings; individual pods reuse
//! the round-one split by index. Neither re-seeds on results yet.

use super::{FormatGenerator, GenerationContext, GeneratorError, MatchDescriptor};
use crate::algorithms::{groups::even_split, knockout_rounds};
use crate::tournament::{MatchStyle, TournamentPhase, UserId};

/// Default performance pod size for individual Swiss
pub const DEFAULT_POD_SIZE: usize = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwissGenerator;

impl FormatGenerator for SwissGenerator {
    fn generate(&self, ctx: &GenerationContext<'_>) -> Result<Vec<MatchDescriptor>, GeneratorError> {
        ctx.require_players(2)?;
        let rounds = ctx
            .config
            .and_then(|config| config.swiss_rounds)
            .unwrap_or(knockout_rounds(ctx.players.len()) as u32)
            .max(1);

        match ctx.style() {
            MatchStyle::HeadToHead => Ok(head_to_head(ctx, rounds)),
            MatchStyle::IndividualRanking => Ok(pods(ctx, rounds)),
        }
    }
}

fn head_to_head(ctx: &GenerationContext<'_>, rounds: u32) -> Vec<MatchDescriptor> {
    let mut pool = ctx.baseline_pool(ctx.start());
    let matches_per_round = ctx.players.len() / 2;
    let mut sessions = Vec::new();

    for round in 1..=rounds {
        for index in 0..matches_per_round {
            let match_number = index as u32 + 1;
            let mut session = ctx.book(
                &mut pool,
                TournamentPhase::Swiss,
                round,
                match_number,
                format!("Swiss Round {round} - Match {match_number}"),
            );
            session.metadata.expected_participants = Some(2);
            if round == 1 {
                let home = ctx.players[index * 2];
                let away = ctx.players[index * 2 + 1];
                session.participants = Some(vec![home, away]);
                session.metadata.pairing_basis = Some("enrollment_order".to_string());
            } else {
                session.metadata.pairing_basis = Some("pending_standings".to_string());
            }
            sessions.push(session);
        }
        pool.round_barrier();
    }

    if ctx.players.len() % 2 == 1 {
        if let (Some(first), Some(sitting_out)) = (sessions.first_mut(), ctx.players.last()) {
            first.description = format!("Player {sitting_out} has a bye in round 1");
        }
    }

    sessions
}

fn pods(ctx: &GenerationContext<'_>, rounds: u32) -> Vec<MatchDescriptor> {
    let pod_size = ctx
        .config
        .and_then(|config| config.pod_size)
        .unwrap_or(DEFAULT_POD_SIZE)
        .max(2);
    let pod_count = ctx.players.len().div_ceil(pod_size);
    let split = split_players(ctx.players, &even_split(ctx.players.len(), pod_count));
    let mut pool = ctx.baseline_pool(ctx.start());
    let mut sessions = Vec::new();

    for round in 1..=rounds {
        for (index, members) in split.iter().enumerate() {
            let pod = index as u32 + 1;
            let mut session = ctx.book(
                &mut pool,
                TournamentPhase::Swiss,
                round,
                pod,
                format!("Swiss Round {round} - Pod {pod}"),
            );
            session.participants = Some(members.clone());
            session.metadata.expected_participants = Some(members.len());
            session.metadata.pairing_basis = Some(
                if round == 1 { "initial_split" } else { "static_index" }.to_string(),
            );
            sessions.push(session);
        }
        pool.round_barrier();
    }

    sessions
}

/// Cut `players` into consecutive chunks of the given sizes
pub(crate) fn split_players(players: &[UserId], sizes: &[usize]) -> Vec<Vec<UserId>> {
    let mut offset = 0;
    sizes
        .iter()
        .map(|size| {
            let chunk = players[offset..offset + size].to_vec();
            offset += size;
            chunk
        })
        .collect()
}
