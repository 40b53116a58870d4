use std::collections::HashSet;

use anyhow::{Context, Result, anyhow};
use reqwest::blocking::Client;
use serde_json::Value;

use crate::feed_value::{as_i32_any, as_list, field, parse_ordinal, path, string_field};
use crate::game::{GameMeta, PRO_BOWL_SEASON_TYPE};
use crate::http_cache::DocumentCache;

const SCHEDULE_KIND: &str = "schedules";
const FEED_ROOT: &str = "gameSchedulesFeed";

/// Games whose feeds cannot be reconstructed: a preseason game that was
/// never played and a game with a broken drive list.
pub const DEFAULT_SKIP_GAME_IDS: &[&str] = &["2016080751", "2011120406"];

pub fn schedule_url(base_url: &str, season_year: i32) -> String {
    format!("{}/{SCHEDULE_KIND}/{season_year}.json", base_url.trim_end_matches('/'))
}

pub fn fetch_schedule(
    client: &Client,
    cache: &DocumentCache,
    base_url: &str,
    season_year: i32,
) -> Result<Vec<GameMeta>> {
    let url = schedule_url(base_url, season_year);
    let body = cache
        .fetch(client, &url, SCHEDULE_KIND, &season_year.to_string())
        .with_context(|| format!("fetch schedule {season_year}"))?;
    parse_schedule_json(&body).with_context(|| format!("parse schedule {season_year}"))
}

pub fn parse_schedule_json(raw: &str) -> Result<Vec<GameMeta>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let value: Value = serde_json::from_str(trimmed).context("invalid schedule json")?;
    let root = field(&value, FEED_ROOT).unwrap_or(&value);
    let entries = path(root, &["gameSchedules", "gameSchedule"])
        .ok_or_else(|| anyhow!("missing gameSchedules.gameSchedule"))?;

    let mut games = Vec::new();
    for (index, entry) in as_list(Some(entries)).into_iter().enumerate() {
        match parse_game_meta(entry) {
            Some(meta) => games.push(meta),
            None => {
                let game_id = string_field(entry, "gameId").unwrap_or_default();
                tracing::warn!(
                    index,
                    game_id = %game_id,
                    "schedule entry is missing season, type, week or teams, skipped"
                );
            }
        }
    }
    Ok(games)
}

fn parse_game_meta(v: &Value) -> Option<GameMeta> {
    Some(GameMeta {
        season_year: field(v, "season").and_then(as_i32_any)?,
        season_type: string_field(v, "seasonType")?,
        game_week: string_field(v, "week").as_deref().and_then(parse_ordinal)?,
        home_team: string_field(v, "homeTeamAbbr")?,
        away_team: string_field(v, "visitorTeamAbbr")?,
        game_id: string_field(v, "gameId")?,
    })
}

/// Drop Pro Bowl games and the skip-list, keeping schedule order.
pub fn select_games(games: Vec<GameMeta>, skip_game_ids: &[String]) -> Vec<GameMeta> {
    let skip = skip_game_ids
        .iter()
        .map(String::as_str)
        .collect::<HashSet<_>>();
    games
        .into_iter()
        .filter(|g| g.season_type != PRO_BOWL_SEASON_TYPE)
        .filter(|g| !skip.contains(g.game_id.as_str()))
        .collect()
}
