use anyhow::{Context, Result, anyhow};
use reqwest::blocking::Client;
use serde_json::Value;

use crate::feed_value::{as_i32_any, as_list, field, path, string_field};
use crate::http_cache::DocumentCache;

const BOXSCORE_KIND: &str = "boxscorePbp";
const FEED_ROOT: &str = "boxScorePBPFeed";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPlay {
    pub play_id: Option<String>,
    pub team_id: Option<String>,
    pub description: Option<String>,
    pub play_type: Option<String>,
    pub quarter: Option<String>,
    pub time: Option<String>,
    pub yardline_side: Option<String>,
    pub yardline_number: Option<String>,
    pub scoring_type: Option<String>,
    pub scoring_team_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDrive {
    pub sequence: Option<String>,
    pub possession_team: Option<String>,
    pub plays: Vec<RawPlay>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxscoreFeed {
    pub home_score: i32,
    pub away_score: i32,
    pub drives: Vec<RawDrive>,
    /// The feed's flat list of scoring plays, kept apart from the drives.
    pub scoring_plays: Vec<RawPlay>,
}

pub fn boxscore_url(base_url: &str, game_id: &str) -> String {
    format!("{}/{BOXSCORE_KIND}/{game_id}.json", base_url.trim_end_matches('/'))
}

pub fn fetch_boxscore(
    client: &Client,
    cache: &DocumentCache,
    base_url: &str,
    game_id: &str,
) -> Result<BoxscoreFeed> {
    let url = boxscore_url(base_url, game_id);
    let body = cache
        .fetch(client, &url, BOXSCORE_KIND, game_id)
        .with_context(|| format!("fetch boxscore {game_id}"))?;
    parse_boxscore_json(&body).with_context(|| format!("parse boxscore {game_id}"))
}

pub fn parse_boxscore_json(raw: &str) -> Result<BoxscoreFeed> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(anyhow!("empty boxscore document"));
    }
    let value: Value = serde_json::from_str(trimmed).context("invalid boxscore json")?;
    let root = field(&value, FEED_ROOT).unwrap_or(&value);

    let home_score = path(root, &["score", "homeTeamScore", "pointTotal"])
        .and_then(as_i32_any)
        .ok_or_else(|| anyhow!("missing score.homeTeamScore.pointTotal"))?;
    let away_score = path(root, &["score", "visitorTeamScore", "pointTotal"])
        .and_then(as_i32_any)
        .ok_or_else(|| anyhow!("missing score.visitorTeamScore.pointTotal"))?;

    let drives = as_list(path(root, &["drives", "drive"]))
        .into_iter()
        .map(parse_raw_drive)
        .collect();
    let scoring_plays = as_list(path(root, &["scoringPlays", "play"]))
        .into_iter()
        .map(parse_raw_play)
        .collect();

    Ok(BoxscoreFeed {
        home_score,
        away_score,
        drives,
        scoring_plays,
    })
}

fn parse_raw_drive(v: &Value) -> RawDrive {
    RawDrive {
        sequence: string_field(v, "sequence"),
        possession_team: string_field(v, "possessionTeamAbbr"),
        plays: as_list(path(v, &["plays", "play"]))
            .into_iter()
            .map(parse_raw_play)
            .collect(),
    }
}

pub fn parse_raw_play(v: &Value) -> RawPlay {
    RawPlay {
        play_id: string_field(v, "playId"),
        team_id: string_field(v, "teamId"),
        description: string_field(v, "playDescription"),
        play_type: string_field(v, "playType"),
        quarter: string_field(v, "quarter"),
        time: string_field(v, "time"),
        yardline_side: string_field(v, "yardlineSide"),
        yardline_number: string_field(v, "yardlineNumber"),
        scoring_type: string_field(v, "scoringType"),
        scoring_team_id: string_field(v, "scoringTeamId"),
    }
}
