use std::fmt;

use serde::Serialize;

use crate::boxscore_fetch::RawPlay;
use crate::diagnostics::{Diagnostics, Warning};
use crate::error::BuildError;
use crate::feed_value::parse_ordinal;
use crate::position::{Yardline, resolve_yardline};
use crate::rules::{EngineRules, ScoringCategory};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlayKind {
    Kickoff,
    Scrimmage,
    Administrative,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Clock {
    pub quarter: Option<u32>,
    pub time: Option<String>,
}

impl fmt::Display for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.quarter {
            Some(q) => write!(f, "Q{q}")?,
            None => f.write_str("Q?")?,
        }
        write!(f, " {}", self.time.as_deref().unwrap_or("?"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Play {
    pub play_id: u32,
    pub team: Option<String>,
    pub description: Option<String>,
    pub yardline: Option<Yardline>,
    pub clock: Clock,
    pub play_type: Option<String>,
    pub kind: PlayKind,
    pub scoring: Option<ScoringCategory>,
    pub scoring_team: Option<String>,
    pub points: i32,
}

impl Play {
    pub fn is_real(&self) -> bool {
        self.kind != PlayKind::Administrative
    }

    pub fn is_scoring(&self) -> bool {
        self.points != 0
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BuildContext<'a> {
    pub rules: &'a EngineRules,
    pub season_year: i32,
}

impl BuildContext<'_> {
    pub fn season_team(&self, team: Option<&str>) -> Option<String> {
        team.map(|t| {
            self.rules
                .team_aliases
                .season_name(t, self.season_year)
                .to_string()
        })
    }
}

/// Convert one raw play. `drive` and `index` only locate the play in error
/// messages.
pub fn build_play(
    raw: &RawPlay,
    ctx: &BuildContext<'_>,
    drive: Option<u32>,
    index: usize,
    diag: &mut Diagnostics,
) -> Result<Play, BuildError> {
    let play_id = raw
        .play_id
        .as_deref()
        .ok_or_else(|| BuildError::MalformedPlay {
            drive,
            index,
            reason: "missing playId".to_string(),
        })
        .and_then(|id| {
            parse_ordinal(id).ok_or_else(|| BuildError::MalformedPlay {
                drive,
                index,
                reason: format!("playId {id:?} is not an ordinal"),
            })
        })?;

    let play_type = raw.play_type.as_deref();
    let kind = match play_type {
        Some(t) if ctx.rules.is_administrative(t) => PlayKind::Administrative,
        Some(t) if ctx.rules.is_kickoff(t) => PlayKind::Kickoff,
        _ => PlayKind::Scrimmage,
    };

    // Position is resolved against the raw team id, before any season rename,
    // because the yardline side uses the same spelling as the feed.
    let yardline = match kind {
        PlayKind::Administrative => None,
        _ => resolve_yardline(
            raw.team_id.as_deref(),
            raw.yardline_side.as_deref(),
            raw.yardline_number.as_deref(),
        ),
    };

    let scoring = match raw.scoring_type.as_deref() {
        None => None,
        Some(token) => {
            let category = ScoringCategory::from_token(token);
            if category.is_none() {
                diag.push(Warning::UnknownScoringType {
                    play_id,
                    token: token.to_string(),
                });
            }
            category
        }
    };
    let points = scoring.map(|c| ctx.rules.scoring.points(c)).unwrap_or(0);

    Ok(Play {
        play_id,
        team: ctx.season_team(raw.team_id.as_deref()),
        description: raw.description.clone(),
        yardline,
        clock: Clock {
            quarter: raw.quarter.as_deref().and_then(parse_ordinal),
            time: raw.time.clone(),
        },
        play_type: raw.play_type.clone(),
        kind,
        scoring,
        scoring_team: ctx.season_team(raw.scoring_team_id.as_deref()),
        points,
    })
}
