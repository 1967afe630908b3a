use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use nfl_game_dates::game::{Game, Score};
use nfl_game_dates::quality::QualityRules;
use nfl_game_dates::standings::standings_entering;
use nfl_game_dates::week_fetch::{parse_boxscore, parse_week_page};

fn fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

/// A full 32-team, 17-week season with deterministic scores.
fn synthetic_season() -> Vec<Game> {
    let teams: Vec<String> = (0..32).map(|i| format!("Team {i:02}")).collect();
    let kickoff = NaiveDate::from_ymd_opt(2012, 9, 9)
        .unwrap()
        .and_hms_opt(13, 0, 0)
        .unwrap();
    let mut games = Vec::new();
    for week in 1..=17u8 {
        for pair in 0..16usize {
            let a = (pair + usize::from(week)) % 32;
            let h = (31 - pair + usize::from(week) * 3) % 32;
            if a == h {
                continue;
            }
            let seed = u16::from(week) * 7 + pair as u16 * 13;
            games.push(Game {
                season: 2012,
                week,
                away: teams[a].clone(),
                home: teams[h].clone(),
                kickoff: kickoff + chrono::Duration::days(7 * i64::from(week)),
                final_score: Some(Score::new(seed % 45, (seed * 3) % 42)),
                halftime: Some(Score::new(seed % 21, (seed * 5) % 24)),
                boxscore_url: None,
            });
        }
    }
    games
}

fn bench_boxscore_parse(c: &mut Criterion) {
    let html = fixture("boxscores_201301120den.html");
    c.bench_function("boxscore_parse", |b| {
        b.iter(|| {
            let parsed = parse_boxscore(black_box(&html), "bench").unwrap();
            black_box(parsed.kickoff);
        })
    });
}

fn bench_week_page_parse(c: &mut Criterion) {
    let html = fixture("years_2012_week_19.html");
    c.bench_function("week_page_parse", |b| {
        b.iter(|| {
            let stubs = parse_week_page(black_box(&html), "bench").unwrap();
            black_box(stubs.len());
        })
    });
}

fn bench_standings_and_labels(c: &mut Criterion) {
    let games = synthetic_season();
    let rules = QualityRules::default();
    c.bench_function("standings_entering_week_18", |b| {
        b.iter(|| black_box(standings_entering(black_box(&games), 18)))
    });
    c.bench_function("label_season", |b| {
        b.iter(|| black_box(rules.label_week(black_box(&games))))
    });
}

criterion_group!(
    benches,
    bench_boxscore_parse,
    bench_week_page_parse,
    bench_standings_and_labels
);
criterion_main!(benches);
