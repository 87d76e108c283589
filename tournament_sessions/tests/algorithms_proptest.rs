/// Property-based tests for the scheduling algorithms using proptest
///
/// These tests check the structural guarantees of pairing, group sizing,
/// bracket sizing and field scheduling across a wide range of player counts.
use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use std::collections::BTreeSet;
use tournament_sessions::algorithms::{
    bracket_structure, optimal_groups, round_robin, rounds_needed,
};
use tournament_sessions::generators::{
    FormatGenerator, GenerationContext, KnockoutGenerator, LeagueGenerator, MatchDescriptor,
};
use tournament_sessions::tournament::{MatchStyle, Tournament, TournamentFormat, UserId};
use tournament_sessions::venue::{ResolvedVenue, ScheduleDefaults};

fn tournament(format: TournamentFormat) -> Tournament {
    let start = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();
    Tournament::new(1, "Property Cup", format, MatchStyle::HeadToHead, start)
}

fn schedule(fields: u32) -> ResolvedVenue {
    ResolvedVenue::from_defaults(
        None,
        ScheduleDefaults {
            match_duration_minutes: 30,
            break_duration_minutes: 5,
            parallel_fields: fields,
        },
        None,
    )
}

fn players(n: usize) -> Vec<UserId> {
    (1..=n as UserId).collect()
}

// Two sessions on the same field never overlap in time
fn fields_never_overlap(sessions: &[MatchDescriptor]) -> bool {
    sessions.iter().enumerate().all(|(i, a)| {
        sessions[i + 1..].iter().all(|b| {
            a.metadata.field_number != b.metadata.field_number
                || a.end_time <= b.start_time
                || b.end_time <= a.start_time
        })
    })
}

proptest! {
    #[test]
    fn test_round_robin_meets_every_pair_once(n in 2usize..=24) {
        let players = players(n);
        let rounds = round_robin(&players);
        prop_assert_eq!(rounds.len(), rounds_needed(n));
        prop_assert_eq!(rounds.len(), if n % 2 == 1 { n } else { n - 1 });

        let mut seen = BTreeSet::new();
        for round in &rounds {
            let mut busy = BTreeSet::new();
            for &(a, b) in round {
                prop_assert_ne!(a, b);
                prop_assert!(busy.insert(a) && busy.insert(b), "player plays twice in a round");
                let pair = (a.min(b), a.max(b));
                prop_assert!(seen.insert(pair), "pair {:?} repeated", pair);
            }
        }
        prop_assert_eq!(seen.len(), n * (n - 1) / 2);
    }

    #[test]
    fn test_group_sizes_stay_in_range(n in 6usize..=200) {
        if let Some(distribution) = optimal_groups(n) {
            prop_assert!(distribution.group_sizes.iter().all(|s| (3..=5).contains(s)));
            prop_assert_eq!(distribution.group_sizes.iter().sum::<usize>(), n);
            prop_assert_eq!(distribution.group_count, distribution.group_sizes.len());
            prop_assert_eq!(
                distribution.group_rounds,
                rounds_needed(*distribution.group_sizes.iter().max().unwrap())
            );
        }
    }

    #[test]
    fn test_bracket_size_is_power_of_two(q in 1usize..=256) {
        let structure = bracket_structure(q);
        prop_assert!(structure.bracket_size.is_power_of_two());
        prop_assert!(structure.bracket_size >= q || [6, 10, 12].contains(&q));
        if ![4, 6, 8, 10, 12].contains(&q) {
            prop_assert_eq!(structure.byes, structure.bracket_size - q);
            prop_assert_eq!(structure.has_bronze, structure.bracket_size >= 8);
        }
    }

    #[test]
    fn test_structures_are_deterministic(q in 1usize..=128) {
        prop_assert_eq!(bracket_structure(q), bracket_structure(q));
        prop_assert_eq!(optimal_groups(q), optimal_groups(q));
    }

    #[test]
    fn test_knockout_plays_one_match_per_elimination(n in 2usize..=64) {
        let tournament = tournament(TournamentFormat::Knockout);
        let players = players(n);
        let schedule = schedule(4);
        let ctx = GenerationContext::new(&tournament, None, &players, &schedule, &[], 1);
        let sessions = KnockoutGenerator.generate(&ctx).unwrap();
        prop_assert_eq!(sessions.len(), n - 1);
        prop_assert!(fields_never_overlap(&sessions));
    }

    #[test]
    fn test_league_fields_are_fair(n in 2usize..=16, fields in 1u32..=4) {
        let tournament = tournament(TournamentFormat::League);
        let players = players(n);
        let schedule = schedule(fields);
        let ctx = GenerationContext::new(&tournament, None, &players, &schedule, &[], 1);
        let sessions = LeagueGenerator.generate(&ctx).unwrap();

        prop_assert_eq!(sessions.len(), n * (n - 1) / 2);
        prop_assert!(fields_never_overlap(&sessions));

        let mut loads = vec![0usize; fields as usize];
        for session in &sessions {
            let field = session.metadata.field_number.unwrap() as usize;
            loads[field - 1] += 1;
        }
        let max = loads.iter().max().unwrap();
        let min = loads.iter().min().unwrap();
        prop_assert!(max - min <= 1, "field loads {:?}", loads);
    }
}
