use std::path::Path;

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use epl_season_dash::aggregate::{compute_standings, conversion_table, longest_win_streak};
use epl_season_dash::dashboard::TeamReport;
use epl_season_dash::demo_season::{DEMO_TEAMS, generate_demo_season};

fn bench_standings(c: &mut Criterion) {
    let season = generate_demo_season(2324, &DEMO_TEAMS);
    c.bench_function("standings_full_season", |b| {
        b.iter(|| {
            let rows = compute_standings(black_box(&season.matches));
            black_box(rows.len());
        })
    });
}

fn bench_conversion(c: &mut Criterion) {
    let season = generate_demo_season(2324, &DEMO_TEAMS);
    c.bench_function("conversion_table_full_season", |b| {
        b.iter(|| {
            let rows = conversion_table(black_box(&season.matches));
            black_box(rows.len());
        })
    });
}

fn bench_streak(c: &mut Criterion) {
    let season = generate_demo_season(2324, &DEMO_TEAMS);
    c.bench_function("longest_win_streak_each_team", |b| {
        b.iter(|| {
            for team in DEMO_TEAMS {
                let streak = longest_win_streak(black_box(&season.matches), team);
                black_box(streak.length);
            }
        })
    });
}

fn bench_team_report(c: &mut Criterion) {
    let season = generate_demo_season(2324, &DEMO_TEAMS);
    let standings = compute_standings(&season.matches);
    c.bench_function("team_report_build", |b| {
        b.iter(|| {
            let report = TeamReport::build(
                black_box(&season),
                &standings,
                "Arsenal",
                5,
                "Premier League 2023–24",
                Path::new("team_logos"),
            );
            black_box(report.rank);
        })
    });
}

criterion_group!(
    benches,
    bench_standings,
    bench_conversion,
    bench_streak,
    bench_team_report
);
criterion_main!(benches);
