mod common;

use pbp_drives::boxscore_fetch::parse_boxscore_json;
use pbp_drives::schedule::{DEFAULT_SKIP_GAME_IDS, parse_schedule_json, select_games};

use common::{fixture_feed, read_fixture};

#[test]
fn parses_boxscore_fixture() {
    let feed = fixture_feed();
    assert_eq!(feed.home_score, 10);
    assert_eq!(feed.away_score, 10);
    assert_eq!(feed.drives.len(), 5);
    assert_eq!(feed.scoring_plays.len(), 6);

    let first = &feed.drives[0];
    assert_eq!(first.sequence.as_deref(), Some("1"));
    assert_eq!(first.possession_team.as_deref(), Some("LA"));
    assert_eq!(first.plays.len(), 5);
    assert_eq!(first.plays[0].play_type.as_deref(), Some("KICK_OFF"));
    assert_eq!(first.plays[3].scoring_type.as_deref(), Some("TD"));
    assert!(
        first.plays[1]
            .description
            .as_deref()
            .is_some_and(|d| d.contains("Gurley"))
    );
}

#[test]
fn single_play_drive_arrives_as_object() {
    let feed = fixture_feed();
    let last = feed.drives.last().expect("fixture has drives");
    assert_eq!(last.plays.len(), 1);
    assert_eq!(last.plays[0].play_id.as_deref(), Some("370"));
}

#[test]
fn parses_feed_without_attribute_prefix_or_root() {
    let raw = r#"{
        "score": {
            "homeTeamScore": {"pointTotal": 3},
            "visitorTeamScore": {"pointTotal": "0"}
        },
        "drives": {"drive": {
            "sequence": 1,
            "possessionTeamAbbr": "NE",
            "plays": {"play": [
                {"playId": 12, "teamId": "NE", "playType": "FIELD_GOAL",
                 "yardlineSide": "NYJ", "yardlineNumber": 12,
                 "scoringType": "FG", "scoringTeamId": "NE"}
            ]}
        }},
        "scoringPlays": null
    }"#;
    let feed = parse_boxscore_json(raw).expect("plain feed should parse");
    assert_eq!((feed.home_score, feed.away_score), (3, 0));
    assert_eq!(feed.drives.len(), 1);
    assert_eq!(feed.drives[0].sequence.as_deref(), Some("1"));
    assert_eq!(feed.drives[0].plays[0].play_id.as_deref(), Some("12"));
    assert_eq!(feed.drives[0].plays[0].yardline_number.as_deref(), Some("12"));
    assert!(feed.scoring_plays.is_empty());
}

#[test]
fn rejects_empty_or_scoreless_boxscore() {
    assert!(parse_boxscore_json("").is_err());
    assert!(parse_boxscore_json("null").is_err());
    assert!(parse_boxscore_json(r#"{"boxScorePBPFeed": {"drives": {}}}"#).is_err());
    assert!(parse_boxscore_json("{not json").is_err());
}

#[test]
fn parses_schedule_fixture_and_selects_games() {
    let games = parse_schedule_json(&read_fixture("schedule_2016.json")).expect("fixture should parse");
    // The entry without week or teams is dropped.
    assert_eq!(games.len(), 5);
    assert_eq!(games[1].game_id, "2016090800");
    assert_eq!(games[1].season_year, 2016);
    assert_eq!(games[1].game_week, 1);
    assert_eq!(games[1].home_team, "DEN");
    assert_eq!(games[1].away_team, "CAR");

    let skip = DEFAULT_SKIP_GAME_IDS
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>();
    let ids = select_games(games, &skip)
        .into_iter()
        .map(|g| g.game_id)
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["2016090800", "2016091200", "2017020500"]);
}

#[test]
fn empty_schedule_has_no_games() {
    assert!(parse_schedule_json("").expect("empty is ok").is_empty());
    assert!(parse_schedule_json(r#"{"gameSchedulesFeed": {}}"#).is_err());
}
