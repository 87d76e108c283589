//! League (everyone plays everyone) generator.

use super::{FormatGenerator, GenerationContext, GeneratorError, MatchDescriptor};
use crate::algorithms::{pairings, rounds_needed};
use crate::tournament::{MatchStyle, TournamentPhase};

/// Full round-robin for head-to-head leagues; repeated all-play ranking rounds
/// for individual leagues
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LeagueGenerator;

impl FormatGenerator for LeagueGenerator {
    fn generate(&self, ctx: &GenerationContext<'_>) -> Result<Vec<MatchDescriptor>, GeneratorError> {
        ctx.require_players(2)?;
        match ctx.style() {
            MatchStyle::HeadToHead => Ok(round_robin(ctx)),
            MatchStyle::IndividualRanking => Ok(ranking_rounds(ctx)),
        }
    }
}

fn round_robin(ctx: &GenerationContext<'_>) -> Vec<MatchDescriptor> {
    let mut pool = ctx.baseline_pool(ctx.start());
    let rounds = rounds_needed(ctx.players.len());
    let mut sessions = Vec::new();

    for round in 1..=rounds {
        for (index, (home, away)) in pairings(ctx.players, round).into_iter().enumerate() {
            let match_number = index as u32 + 1;
            let mut session = ctx.book(
                &mut pool,
                TournamentPhase::League,
                round as u32,
                match_number,
                format!("Round {round} - Match {match_number}"),
            );
            session.participants = Some(vec![home, away]);
            session.metadata.expected_participants = Some(2);
            sessions.push(session);
        }
    }

    sessions
}

fn ranking_rounds(ctx: &GenerationContext<'_>) -> Vec<MatchDescriptor> {
    let rounds = ctx
        .config
        .and_then(|config| config.ranking_rounds)
        .unwrap_or(ctx.players.len() as u32 - 1)
        .max(1);
    let mut pool = ctx.baseline_pool(ctx.start());

    (1..=rounds)
        .map(|round| {
            let mut session = ctx.book(
                &mut pool,
                TournamentPhase::League,
                round,
                1,
                format!("Round {round}"),
            );
            session.participants = Some(ctx.players.to_vec());
            session.metadata.expected_participants = Some(ctx.players.len());
            session
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::test_support::*;
    use crate::tournament::{BracketTypeConfig, TournamentFormat, UserId};
    use chrono::Duration;
    use std::collections::HashSet;

    #[test]
    fn test_six_player_round_robin() {
        let tournament = tournament(TournamentFormat::League, MatchStyle::HeadToHead);
        let config = BracketTypeConfig::league();
        let players = players(6);
        let schedule = schedule(2);
        let ctx = GenerationContext::new(&tournament, Some(&config), &players, &schedule, &[], 1);
        let sessions = LeagueGenerator.generate(&ctx).unwrap();

        assert_eq!(sessions.len(), 15);
        assert_eq!(sessions.iter().map(|s| s.round_number).max(), Some(5));

        let pairs: HashSet<(UserId, UserId)> = sessions
            .iter()
            .map(|s| {
                let p = s.participants.as_ref().unwrap();
                (p[0].min(p[1]), p[0].max(p[1]))
            })
            .collect();
        assert_eq!(pairs.len(), 15);
        assert_no_field_overlap(&sessions);
    }

    #[test]
    fn test_next_round_takes_the_next_free_cursor() {
        let tournament = tournament(TournamentFormat::League, MatchStyle::HeadToHead);
        let players = players(4);
        let schedule = schedule(3);
        let ctx = GenerationContext::new(&tournament, None, &players, &schedule, &[], 1);
        let sessions = LeagueGenerator.generate(&ctx).unwrap();

        let slots: Vec<_> = sessions
            .iter()
            .map(|s| {
                (
                    s.title.as_str(),
                    s.metadata.field_number,
                    s.start_time - start(),
                )
            })
            .collect();
        assert_eq!(
            slots,
            vec![
                ("Round 1 - Match 1", Some(1), Duration::zero()),
                ("Round 1 - Match 2", Some(2), Duration::zero()),
                ("Round 2 - Match 1", Some(3), Duration::zero()),
                ("Round 2 - Match 2", Some(1), Duration::minutes(70)),
                ("Round 3 - Match 1", Some(2), Duration::minutes(70)),
                ("Round 3 - Match 2", Some(3), Duration::minutes(70)),
            ]
        );
    }

    #[test]
    fn test_field_loads_are_balanced() {
        let tournament = tournament(TournamentFormat::League, MatchStyle::HeadToHead);
        let players = players(7);
        let schedule = schedule(2);
        let ctx = GenerationContext::new(&tournament, None, &players, &schedule, &[], 1);
        let sessions = LeagueGenerator.generate(&ctx).unwrap();

        let on_field = |n: u32| {
            sessions
                .iter()
                .filter(|s| s.metadata.field_number == Some(n))
                .count()
        };
        assert_eq!(sessions.len(), 21);
        assert!(on_field(1).abs_diff(on_field(2)) <= 1);
    }

    #[test]
    fn test_full_rounds_never_double_book_a_player() {
        let tournament = tournament(TournamentFormat::League, MatchStyle::HeadToHead);
        let players = players(8);
        let schedule = schedule(4);
        let ctx = GenerationContext::new(&tournament, None, &players, &schedule, &[], 1);
        let sessions = LeagueGenerator.generate(&ctx).unwrap();

        for a in &sessions {
            for b in &sessions {
                if std::ptr::eq(a, b) {
                    continue;
                }
                let shared = a
                    .participants
                    .as_ref()
                    .unwrap()
                    .iter()
                    .any(|p| b.participants.as_ref().unwrap().contains(p));
                if shared {
                    assert!(a.end_time <= b.start_time || b.end_time <= a.start_time);
                }
            }
        }
    }

    #[test]
    fn test_individual_league_defaults_to_n_minus_one_rounds() {
        let tournament = tournament(TournamentFormat::League, MatchStyle::IndividualRanking);
        let players = players(5);
        let schedule = schedule(1);
        let ctx = GenerationContext::new(&tournament, None, &players, &schedule, &[], 1);
        let sessions = LeagueGenerator.generate(&ctx).unwrap();
        assert_eq!(sessions.len(), 4);
        assert!(sessions.iter().all(|s| s.participants.as_ref().unwrap().len() == 5));
    }

    #[test]
    fn test_individual_league_uses_configured_rounds() {
        let tournament = tournament(TournamentFormat::League, MatchStyle::IndividualRanking);
        let mut config = BracketTypeConfig::league();
        config.ranking_rounds = Some(2);
        let players = players(5);
        let schedule = schedule(1);
        let ctx = GenerationContext::new(&tournament, Some(&config), &players, &schedule, &[], 1);
        assert_eq!(LeagueGenerator.generate(&ctx).unwrap().len(), 2);
    }
}
