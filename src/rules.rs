use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const KICKOFF_PLAY_TYPE: &str = "KICK_OFF";
pub const ADMINISTRATIVE_PLAY_TYPES: &[&str] =
    &["TIMEOUT", "END_QUARTER", "END_HALF", "END_GAME", "COMMENT"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoringCategory {
    Touchdown,
    FieldGoal,
    ExtraPoint,
    TwoPointConversion,
    Safety,
}

impl ScoringCategory {
    pub fn from_token(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "TD" => Some(ScoringCategory::Touchdown),
            "FG" => Some(ScoringCategory::FieldGoal),
            "PAT" => Some(ScoringCategory::ExtraPoint),
            "PAT2" => Some(ScoringCategory::TwoPointConversion),
            "SFTY" => Some(ScoringCategory::Safety),
            _ => None,
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            ScoringCategory::Touchdown => "TD",
            ScoringCategory::FieldGoal => "FG",
            ScoringCategory::ExtraPoint => "PAT",
            ScoringCategory::TwoPointConversion => "PAT2",
            ScoringCategory::Safety => "SFTY",
        }
    }
}

impl fmt::Display for ScoringCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringTable {
    pub touchdown: i32,
    pub field_goal: i32,
    pub extra_point: i32,
    pub two_point_conversion: i32,
    pub safety: i32,
}

impl Default for ScoringTable {
    fn default() -> Self {
        Self {
            touchdown: 6,
            field_goal: 3,
            extra_point: 1,
            two_point_conversion: 2,
            safety: 2,
        }
    }
}

impl ScoringTable {
    pub fn points(&self, category: ScoringCategory) -> i32 {
        match category {
            ScoringCategory::Touchdown => self.touchdown,
            ScoringCategory::FieldGoal => self.field_goal,
            ScoringCategory::ExtraPoint => self.extra_point,
            ScoringCategory::TwoPointConversion => self.two_point_conversion,
            ScoringCategory::Safety => self.safety,
        }
    }
}

/// A franchise reported under `alias` is rewritten to `historical` for any
/// season strictly before `cutover_year`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamAliasRule {
    pub alias: String,
    pub historical: String,
    pub cutover_year: i32,
}

impl TeamAliasRule {
    fn new(alias: &str, historical: &str, cutover_year: i32) -> Self {
        Self {
            alias: alias.to_string(),
            historical: historical.to_string(),
            cutover_year,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamAliasTable {
    rules: Vec<TeamAliasRule>,
}

impl Default for TeamAliasTable {
    // Cutover years come from the data, not a league rule: the feeds report
    // the current abbreviation for seasons that predate the move.
    fn default() -> Self {
        Self {
            rules: vec![
                TeamAliasRule::new("JAX", "JAC", 2013),
                TeamAliasRule::new("LAC", "SD", 2018),
                TeamAliasRule::new("LA", "STL", 2017),
            ],
        }
    }
}

impl TeamAliasTable {
    // First matching rule wins.
    pub fn season_name<'a>(&'a self, team: &'a str, season_year: i32) -> &'a str {
        self.rules
            .iter()
            .find(|rule| rule.alias == team && season_year < rule.cutover_year)
            .map(|rule| rule.historical.as_str())
            .unwrap_or(team)
    }
}

/// Read-only tables the engine consults. Shared by reference across games.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineRules {
    pub scoring: ScoringTable,
    pub administrative_play_types: BTreeSet<String>,
    pub kickoff_play_type: String,
    pub team_aliases: TeamAliasTable,
}

impl Default for EngineRules {
    fn default() -> Self {
        Self {
            scoring: ScoringTable::default(),
            administrative_play_types: ADMINISTRATIVE_PLAY_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            kickoff_play_type: KICKOFF_PLAY_TYPE.to_string(),
            team_aliases: TeamAliasTable::default(),
        }
    }
}

impl EngineRules {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read engine rules {}", path.display()))?;
        serde_json::from_str::<EngineRules>(&raw)
            .with_context(|| format!("invalid engine rules json {}", path.display()))
    }

    pub fn is_administrative(&self, play_type: &str) -> bool {
        self.administrative_play_types.contains(play_type)
    }

    pub fn is_kickoff(&self, play_type: &str) -> bool {
        self.kickoff_play_type == play_type
    }
}
