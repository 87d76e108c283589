//! Bracket Math Example
//!
//! Prints group layouts and knockout structures for a range of player counts,
//! then generates a small group + knockout schedule.

use chrono::{TimeZone, Utc};
use tournament_sessions::algorithms::{bracket_structure, optimal_groups, play_in_pairings};
use tournament_sessions::generators::{FormatGenerator, GenerationContext, ScheduleSummary, SessionGenerator};
use tournament_sessions::tournament::{BracketTypeConfig, MatchStyle, Tournament, TournamentFormat};
use tournament_sessions::venue::{ResolvedVenue, ScheduleDefaults};

fn main() {
    println!("=== Group Distribution ===\n");
    for players in [5, 6, 9, 11, 14, 20, 27] {
        match optimal_groups(players) {
            Some(d) => println!(
                "{:>2} players: {} groups {:?}, {} qualifiers, {} rounds",
                players,
                d.group_count,
                d.group_sizes,
                d.qualifier_count(),
                d.group_rounds
            ),
            None => println!("{:>2} players: no valid layout", players),
        }
    }

    println!("\n=== Bracket Structure ===\n");
    for qualifiers in [4, 5, 6, 7, 8, 10, 12, 16] {
        let s = bracket_structure(qualifiers);
        println!(
            "{:>2} qualifiers: bracket {}, byes {}, play-ins {} {:?}, bronze {}",
            qualifiers,
            s.bracket_size,
            s.byes,
            s.play_in_matches,
            play_in_pairings(&s, qualifiers),
            s.has_bronze
        );
    }

    println!("\n=== 11-player Group + Knockout ===\n");
    let start = Utc.with_ymd_and_hms(2025, 5, 10, 9, 0, 0).unwrap();
    let tournament = Tournament::new(
        1,
        "Spring Cup",
        TournamentFormat::GroupKnockout,
        MatchStyle::HeadToHead,
        start,
    );
    let config = BracketTypeConfig::group_knockout();
    let schedule = ResolvedVenue::from_defaults(
        None,
        ScheduleDefaults {
            match_duration_minutes: 45,
            break_duration_minutes: 10,
            parallel_fields: 3,
        },
        Some("Main Ground".to_string()),
    );
    let players: Vec<i64> = (1..=11).collect();
    let ctx = GenerationContext::new(&tournament, Some(&config), &players, &schedule, &[], 1);

    match SessionGenerator::for_format(tournament.format).generate(&ctx) {
        Ok(sessions) => {
            for s in &sessions {
                println!(
                    "{} {}-{} field {:?}  {}  {}",
                    s.phase,
                    s.start_time.format("%H:%M"),
                    s.end_time.format("%H:%M"),
                    s.metadata.field_number.unwrap_or_default(),
                    s.title,
                    s.metadata.seeding.as_deref().unwrap_or("")
                );
            }
            println!("\n{}", ScheduleSummary::from_sessions(&sessions));
        }
        Err(e) => println!("Generation failed: {}", e),
    }
}
