//! Single-elimination generator.

use super::{
    FormatGenerator, GenerationContext, GeneratorError, MatchDescriptor,
    bracket_plan::{BracketSlot, schedule_bracket, seeded_pairs},
};
use crate::tournament::MatchStyle;

/// Knockout bracket seeded by enrollment order
///
/// The bracket is the next power of two above the player count. Round one pairs
/// seed `i` against seed `size + 1 - i`; top seeds without an opponent get a
/// bye. Later rounds carry placeholders only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KnockoutGenerator;

impl FormatGenerator for KnockoutGenerator {
    fn generate(&self, ctx: &GenerationContext<'_>) -> Result<Vec<MatchDescriptor>, GeneratorError> {
        if ctx.style() != MatchStyle::HeadToHead {
            return Err(GeneratorError::UnsupportedMatchStyle {
                format: ctx.tournament.format,
                style: ctx.style(),
            });
        }
        ctx.require_players(2)?;

        let size = ctx.players.len().next_power_of_two();
        let entrants: Vec<BracketSlot> = ctx
            .players
            .iter()
            .enumerate()
            .map(|(i, player)| BracketSlot::seeded(format!("Seed {}", i + 1), *player))
            .collect();

        let with_bronze = ctx.config.is_some_and(|config| config.third_place_playoff);
        let mut pool = ctx.baseline_pool(ctx.start());

        Ok(schedule_bracket(
            ctx,
            &mut pool,
            seeded_pairs(&entrants, size),
            1,
            with_bronze,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::BRONZE_MATCH_NUMBER;
    use crate::generators::test_support::*;
    use crate::tournament::{BracketTypeConfig, TournamentFormat};
    use chrono::Duration;

    fn run(n: usize, config: &BracketTypeConfig, fields: u32) -> Vec<MatchDescriptor> {
        let tournament = tournament(TournamentFormat::Knockout, MatchStyle::HeadToHead);
        let players = players(n);
        let schedule = schedule(fields);
        let ctx = GenerationContext::new(&tournament, Some(config), &players, &schedule, &[], 1);
        KnockoutGenerator.generate(&ctx).unwrap()
    }

    #[test]
    fn test_eight_players_with_bronze() {
        let sessions = run(8, &BracketTypeConfig::knockout(), 1);
        assert_eq!(sessions.len(), 8);

        let per_round: Vec<usize> = (1..=3)
            .map(|r| {
                sessions
                    .iter()
                    .filter(|s| s.round_number == r && s.match_number != BRONZE_MATCH_NUMBER)
                    .count()
            })
            .collect();
        assert_eq!(per_round, vec![4, 2, 1]);

        let bronze = sessions.last().unwrap();
        assert_eq!(bronze.match_number, BRONZE_MATCH_NUMBER);
        assert_eq!(bronze.round_number, 3);
        assert!(bronze.participants.is_none());
    }

    #[test]
    fn test_eight_players_without_bronze() {
        let mut config = BracketTypeConfig::knockout();
        config.third_place_playoff = false;
        assert_eq!(run(8, &config, 1).len(), 7);
    }

    #[test]
    fn test_first_round_uses_standard_seeding() {
        let sessions = run(8, &BracketTypeConfig::knockout(), 1);
        let first = &sessions[0];
        assert_eq!(first.participants, Some(vec![100, 800]));
        assert_eq!(first.metadata.seeding.as_deref(), Some("Seed 1 vs Seed 8"));
        assert_eq!(first.title, "Quarter-final - Match 1");
        assert!(sessions[4..].iter().all(|s| s.participants.is_none()));
    }

    #[test]
    fn test_byes_are_skipped() {
        let mut config = BracketTypeConfig::knockout();
        config.requires_power_of_two = false;
        let sessions = run(5, &config, 1);
        let round_one: Vec<_> = sessions.iter().filter(|s| s.round_number == 1).collect();
        assert_eq!(round_one.len(), 1);
        assert_eq!(round_one[0].participants, Some(vec![400, 500]));

        let round_two: Vec<_> = sessions.iter().filter(|s| s.round_number == 2).collect();
        assert_eq!(round_two.len(), 2);
        assert_eq!(
            round_two[0].metadata.seeding.as_deref(),
            Some("Seed 1 vs Winner of R1 M1")
        );
        assert!(round_two.iter().all(|s| s.participants.is_none()));
    }

    #[test]
    fn test_rounds_do_not_overlap() {
        let sessions = run(16, &BracketTypeConfig::knockout(), 3);
        assert_no_field_overlap(&sessions);
        for pair in sessions.windows(2) {
            if pair[1].round_number > pair[0].round_number {
                let round_end = sessions
                    .iter()
                    .filter(|s| s.round_number == pair[0].round_number)
                    .map(|s| s.end_time)
                    .max()
                    .unwrap();
                assert!(pair[1].start_time >= round_end);
            }
        }
    }

    #[test]
    fn test_final_waits_for_both_semi_finals() {
        let mut config = BracketTypeConfig::knockout();
        config.third_place_playoff = false;
        let sessions = run(4, &config, 3);
        assert_eq!(sessions.len(), 3);

        let final_match = &sessions[2];
        assert_eq!(final_match.metadata.field_number, Some(3));
        assert_eq!(final_match.start_time, start() + Duration::minutes(70));
        assert!(sessions[..2].iter().all(|s| s.start_time == start()));
    }

    #[test]
    fn test_individual_ranking_is_rejected() {
        let tournament = tournament(TournamentFormat::Knockout, MatchStyle::IndividualRanking);
        let players = players(8);
        let schedule = schedule(1);
        let ctx = GenerationContext::new(&tournament, None, &players, &schedule, &[], 1);
        assert!(matches!(
            KnockoutGenerator.generate(&ctx),
            Err(GeneratorError::UnsupportedMatchStyle { .. })
        ));
    }
}
