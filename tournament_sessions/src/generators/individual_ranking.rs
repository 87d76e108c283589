//! Single ranked session for tournaments without a bracket.

use chrono::{DateTime, Duration, Utc};

use super::{FormatGenerator, GenerationContext, GeneratorError, MatchDescriptor, RoundsData};
use crate::tournament::{ScoringType, TournamentPhase};

/// One session for the whole field, covering every round
///
/// With more than one round the exposed scoring type is ROUNDS_BASED so results
/// are entered round by round; the real unit moves to `measurement_type`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndividualRankingGenerator;

impl FormatGenerator for IndividualRankingGenerator {
    fn generate(&self, ctx: &GenerationContext<'_>) -> Result<Vec<MatchDescriptor>, GeneratorError> {
        ctx.require_players(2)?;
        let rounds = ctx.number_of_rounds.max(1);

        let mut pool = ctx.baseline_pool(ctx.start());
        let mut session = ctx.book(
            &mut pool,
            TournamentPhase::IndividualRanking,
            1,
            1,
            ctx.tournament.name.clone(),
        );

        let round_length = Duration::minutes(i64::from(ctx.schedule.match_duration_minutes));
        let gap = Duration::minutes(i64::from(ctx.schedule.break_duration_minutes));
        session.end_time = session_end(session.start_time, round_length, gap, rounds)?;

        session.participants = Some(ctx.players.to_vec());
        session.metadata.expected_participants = Some(ctx.players.len());
        session.metadata.rounds_data = Some(RoundsData::new(rounds));
        if rounds > 1 {
            session.description = format!("{rounds} rounds");
            session.metadata.measurement_type = Some(ctx.tournament.scoring_type);
            session.scoring_type = ScoringType::RoundsBased;
        }

        Ok(vec![session])
    }
}

/// Start plus every round and the breaks between them
fn session_end(
    start: DateTime<Utc>,
    round_length: Duration,
    gap: Duration,
    rounds: u32,
) -> Result<DateTime<Utc>, GeneratorError> {
    let out_of_range = GeneratorError::RoundsOutOfRange(rounds);
    let count = i32::try_from(rounds).map_err(|_| out_of_range.clone())?;
    round_length
        .checked_mul(count)
        .zip(gap.checked_mul(count - 1))
        .and_then(|(play, breaks)| play.checked_add(&breaks))
        .and_then(|span| start.checked_add_signed(span))
        .ok_or(out_of_range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::test_support::*;
    use crate::tournament::{MatchStyle, TournamentFormat};

    fn run(rounds: u32) -> MatchDescriptor {
        let tournament = tournament(TournamentFormat::IndividualRanking, MatchStyle::IndividualRanking);
        let players = players(12);
        let schedule = schedule(4);
        let ctx = GenerationContext::new(&tournament, None, &players, &schedule, &[], rounds);
        let mut sessions = IndividualRankingGenerator.generate(&ctx).unwrap();
        assert_eq!(sessions.len(), 1);
        sessions.remove(0)
    }

    #[test]
    fn test_single_round_keeps_scoring_type() {
        let session = run(1);
        assert_eq!(session.end_time - session.start_time, Duration::minutes(60));
        assert_eq!(session.scoring_type, ScoringType::TimeBased);
        assert!(session.metadata.measurement_type.is_none());
        assert_eq!(session.metadata.rounds_data, Some(RoundsData::new(1)));
        assert_eq!(session.metadata.field_number, Some(1));
    }

    #[test]
    fn test_multi_round_duration_and_scoring() {
        let session = run(3);
        // 3 x 60 + 2 x 10
        assert_eq!(session.end_time - session.start_time, Duration::minutes(200));
        assert_eq!(session.scoring_type, ScoringType::RoundsBased);
        assert_eq!(session.metadata.measurement_type, Some(ScoringType::TimeBased));

        let rounds = session.metadata.rounds_data.unwrap();
        assert_eq!(rounds.total_rounds, 3);
        assert_eq!(rounds.completed_rounds, 0);
        assert!(rounds.round_results.is_empty());
    }

    #[test]
    fn test_zero_rounds_treated_as_one() {
        let session = run(0);
        assert_eq!(session.metadata.rounds_data.unwrap().total_rounds, 1);
    }

    #[test]
    fn test_huge_round_count_is_rejected() {
        let tournament = tournament(TournamentFormat::IndividualRanking, MatchStyle::IndividualRanking);
        let players = players(4);
        let schedule = schedule(1);
        for rounds in [u32::MAX, i32::MAX as u32] {
            let ctx = GenerationContext::new(&tournament, None, &players, &schedule, &[], rounds);
            assert_eq!(
                IndividualRankingGenerator.generate(&ctx),
                Err(GeneratorError::RoundsOutOfRange(rounds))
            );
        }
    }

    #[test]
    fn test_session_end_checks_the_range() {
        let round = Duration::minutes(60);
        let gap = Duration::minutes(10);
        assert_eq!(
            session_end(start(), round, gap, 2),
            Ok(start() + Duration::minutes(130))
        );
        assert!(session_end(start(), round, gap, u32::MAX).is_err());
    }
}
