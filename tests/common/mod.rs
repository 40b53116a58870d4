#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use pbp_drives::boxscore_fetch::{BoxscoreFeed, RawDrive, RawPlay, parse_boxscore_json};
use pbp_drives::game::GameMeta;

pub fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

pub fn fixture_feed() -> BoxscoreFeed {
    parse_boxscore_json(&read_fixture("boxscore_2015091300.json")).expect("fixture should parse")
}

pub fn fixture_meta() -> GameMeta {
    GameMeta {
        season_year: 2015,
        season_type: "REG".to_string(),
        game_week: 1,
        home_team: "SEA".to_string(),
        away_team: "STL".to_string(),
        game_id: "2015091300".to_string(),
    }
}

pub fn meta(game_id: &str, season_year: i32) -> GameMeta {
    GameMeta {
        season_year,
        season_type: "REG".to_string(),
        game_week: 3,
        home_team: "HOME".to_string(),
        away_team: "AWAY".to_string(),
        game_id: game_id.to_string(),
    }
}

pub fn play(id: &str, team: &str, play_type: &str) -> RawPlay {
    RawPlay {
        play_id: Some(id.to_string()),
        team_id: Some(team.to_string()),
        play_type: Some(play_type.to_string()),
        quarter: Some("1".to_string()),
        time: Some("10:00".to_string()),
        ..RawPlay::default()
    }
}

pub fn at(mut raw: RawPlay, side: &str, number: &str) -> RawPlay {
    raw.yardline_side = Some(side.to_string());
    raw.yardline_number = Some(number.to_string());
    raw
}

pub fn scoring(mut raw: RawPlay, token: &str, team: &str) -> RawPlay {
    raw.scoring_type = Some(token.to_string());
    raw.scoring_team_id = Some(team.to_string());
    raw
}

pub fn drive(sequence: &str, team: &str, plays: Vec<RawPlay>) -> RawDrive {
    RawDrive {
        sequence: Some(sequence.to_string()),
        possession_team: Some(team.to_string()),
        plays,
    }
}

pub fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("pbp_drives_{name}_{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}
