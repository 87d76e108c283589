use chrono::{TimeZone, Utc};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use tournament_sessions::{
    algorithms::{bracket_structure, optimal_groups, round_robin},
    generators::{FormatGenerator, GenerationContext, SessionGenerator},
    tournament::{BracketTypeConfig, MatchStyle, Tournament, TournamentFormat, UserId},
    venue::{ResolvedVenue, ScheduleDefaults},
};

/// Helper to create a head-to-head tournament of the given format
fn tournament(format: TournamentFormat) -> Tournament {
    let start = Utc.with_ymd_and_hms(2025, 4, 5, 9, 0, 0).unwrap();
    Tournament::new(1, "Bench Cup", format, MatchStyle::HeadToHead, start)
}

fn schedule() -> ResolvedVenue {
    ResolvedVenue::from_defaults(
        None,
        ScheduleDefaults {
            match_duration_minutes: 60,
            break_duration_minutes: 10,
            parallel_fields: 4,
        },
        None,
    )
}

fn players(n: usize) -> Vec<UserId> {
    (1..=n as UserId).collect()
}

/// Benchmark round-robin pairing for a full league
fn bench_round_robin(c: &mut Criterion) {
    let mut group = c.benchmark_group("round_robin");

    for n_players in [8, 32, 128].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_players", n_players)),
            n_players,
            |b, &n| {
                let players = players(n);
                b.iter(|| round_robin(black_box(&players)));
            },
        );
    }

    group.finish();
}

/// Benchmark group sizing and bracket sizing across player counts
fn bench_structures(c: &mut Criterion) {
    c.bench_function("optimal_groups_6_to_200", |b| {
        b.iter(|| {
            for n in 6..=200 {
                black_box(optimal_groups(black_box(n)));
            }
        });
    });

    c.bench_function("bracket_structure_1_to_256", |b| {
        b.iter(|| {
            for q in 1..=256 {
                black_box(bracket_structure(black_box(q)));
            }
        });
    });
}

/// Benchmark full schedule generation per format
fn bench_generators(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    let schedule = schedule();

    let cases = [
        (TournamentFormat::League, BracketTypeConfig::league(), 32),
        (TournamentFormat::Knockout, BracketTypeConfig::knockout(), 64),
        (TournamentFormat::GroupKnockout, BracketTypeConfig::group_knockout(), 64),
        (TournamentFormat::Swiss, BracketTypeConfig::swiss(), 64),
    ];

    for (format, config, n) in cases.iter() {
        let tournament = tournament(*format);
        let players = players(*n);
        let generator = SessionGenerator::for_format(*format);

        group.bench_with_input(
            BenchmarkId::new(format.as_str(), format!("{}_players", n)),
            n,
            |b, _| {
                let ctx =
                    GenerationContext::new(&tournament, Some(config), &players, &schedule, &[], 1);
                b.iter(|| generator.generate(black_box(&ctx)));
            },
        );
    }

    group.finish();
}

criterion_group!(
    algorithm_benches,
    bench_round_robin,
    bench_structures
);

criterion_group!(generator_benches, bench_generators);

criterion_main!(algorithm_benches, generator_benches);
