use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use pbp_drives::boxscore_fetch::{BoxscoreFeed, RawDrive, RawPlay, parse_boxscore_json};
use pbp_drives::game::{GameMeta, reconstruct_game};
use pbp_drives::rules::EngineRules;

const BOXSCORE_JSON: &str = include_str!("../tests/fixtures/boxscore_2015091300.json");

fn sample_meta() -> GameMeta {
    GameMeta {
        season_year: 2015,
        season_type: "REG".to_string(),
        game_week: 1,
        home_team: "SEA".to_string(),
        away_team: "STL".to_string(),
        game_id: "2015091300".to_string(),
    }
}

fn raw_play(id: u32, team: &str, play_type: &str, number: u32) -> RawPlay {
    RawPlay {
        play_id: Some(id.to_string()),
        team_id: Some(team.to_string()),
        play_type: Some(play_type.to_string()),
        quarter: Some((1 + id / 1000).min(4).to_string()),
        time: Some("10:00".to_string()),
        yardline_side: Some(team.to_string()),
        yardline_number: Some(number.to_string()),
        ..RawPlay::default()
    }
}

// A full game of alternating drives ending in touchdowns, with every extra
// point missing from the drives so reconciliation has work to do.
fn long_feed(drives: u32, plays_per_drive: u32) -> BoxscoreFeed {
    let mut raw_drives = Vec::new();
    let mut scoring_plays = Vec::new();
    let mut next_id = 1;
    for seq in 1..=drives {
        let team = if seq % 2 == 0 { "HOME" } else { "AWAY" };
        let other = if seq % 2 == 0 { "AWAY" } else { "HOME" };
        let mut plays = vec![raw_play(next_id, other, "KICK_OFF", 35)];
        next_id += 1;
        for n in 0..plays_per_drive {
            plays.push(raw_play(next_id, team, "RUSH", 20 + n % 30));
            next_id += 1;
        }
        if let Some(last) = plays.last_mut() {
            last.scoring_type = Some("TD".to_string());
            last.scoring_team_id = Some(team.to_string());
        }
        let mut pat = raw_play(next_id, team, "XP_KICK", 15);
        pat.scoring_type = Some("PAT".to_string());
        pat.scoring_team_id = Some(team.to_string());
        scoring_plays.push(pat);
        next_id += 1;
        raw_drives.push(RawDrive {
            sequence: Some(seq.to_string()),
            possession_team: Some(team.to_string()),
            plays,
        });
    }
    let per_team = (drives as i32 / 2) * 7;
    BoxscoreFeed {
        home_score: per_team,
        away_score: drives as i32 * 7 - per_team,
        drives: raw_drives,
        scoring_plays,
    }
}

fn bench_boxscore_parse(c: &mut Criterion) {
    c.bench_function("boxscore_parse", |b| {
        b.iter(|| {
            let feed = parse_boxscore_json(black_box(BOXSCORE_JSON)).expect("fixture parse");
            black_box(feed.drives.len());
        })
    });
}

fn bench_reconstruct_fixture(c: &mut Criterion) {
    let feed = parse_boxscore_json(BOXSCORE_JSON).expect("fixture parse");
    let rules = EngineRules::default();
    c.bench_function("reconstruct_fixture", |b| {
        b.iter(|| {
            let report = reconstruct_game(sample_meta(), black_box(&feed), &rules)
                .expect("fixture builds");
            black_box(report.game.drives().len());
        })
    });
}

fn bench_reconstruct_long_game(c: &mut Criterion) {
    let feed = long_feed(28, 12);
    let rules = EngineRules::default();
    c.bench_function("reconstruct_long_game", |b| {
        b.iter(|| {
            let report = reconstruct_game(sample_meta(), black_box(&feed), &rules)
                .expect("synthetic game builds");
            black_box(report.reconciliation.injected().len());
        })
    });
}

criterion_group!(
    perf,
    bench_boxscore_parse,
    bench_reconstruct_fixture,
    bench_reconstruct_long_game
);
criterion_main!(perf);
