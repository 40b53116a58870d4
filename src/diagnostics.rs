use std::fmt;

use serde::Serialize;

/// Non-fatal data-quality findings. Each one is attached to the game it was
/// raised for; none of them stop the game from being emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    UnknownScoringType {
        play_id: u32,
        token: String,
    },
    EmptyDrive {
        index: usize,
        sequence: Option<u32>,
    },
    ScoringAttributionConflict {
        drive_id: u32,
        teams: Vec<String>,
    },
    UnplaceableScoringPlay {
        play_id: u32,
    },
    UnidentifiedScoringPlay {
        index: usize,
        play_id: Option<String>,
    },
    ScorelineMismatch {
        computed: i32,
        home_score: i32,
        away_score: i32,
    },
    DuplicatePlayIds {
        drive_id: u32,
        play_ids: Vec<u32>,
    },
}

impl Warning {
    pub fn kind(&self) -> &'static str {
        match self {
            Warning::UnknownScoringType { .. } => "unknown_scoring_type",
            Warning::EmptyDrive { .. } => "empty_drive",
            Warning::ScoringAttributionConflict { .. } => "scoring_attribution_conflict",
            Warning::UnplaceableScoringPlay { .. } => "unplaceable_scoring_play",
            Warning::UnidentifiedScoringPlay { .. } => "unidentified_scoring_play",
            Warning::ScorelineMismatch { .. } => "scoreline_mismatch",
            Warning::DuplicatePlayIds { .. } => "duplicate_play_ids",
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::UnknownScoringType { play_id, token } => {
                write!(f, "play {play_id} has unknown scoring type {token:?}, scored as 0")
            }
            Warning::EmptyDrive { index, sequence } => match sequence {
                Some(seq) => write!(f, "drive #{index} (sequence {seq}) has no plays, skipped"),
                None => write!(f, "drive #{index} has no plays, skipped"),
            },
            Warning::ScoringAttributionConflict { drive_id, teams } => write!(
                f,
                "drive {drive_id} credits more than one scoring team {teams:?}, using {}",
                teams.first().map(String::as_str).unwrap_or("?")
            ),
            Warning::UnplaceableScoringPlay { play_id } => write!(
                f,
                "scoring play {play_id} precedes every play in the drives, dropped"
            ),
            Warning::UnidentifiedScoringPlay { index, play_id } => match play_id {
                Some(id) => write!(f, "scoring list entry #{index} has play id {id:?}, dropped"),
                None => write!(f, "scoring list entry #{index} has no play id, dropped"),
            },
            Warning::ScorelineMismatch {
                computed,
                home_score,
                away_score,
            } => write!(
                f,
                "drives total {computed} points but final score is {home_score}-{away_score} ({})",
                home_score + away_score
            ),
            Warning::DuplicatePlayIds { drive_id, play_ids } => {
                write!(f, "drive {drive_id} repeats play ids {play_ids:?}")
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    game_id: String,
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn new(game_id: impl Into<String>) -> Self {
        Self {
            game_id: game_id.into(),
            warnings: Vec::new(),
        }
    }

    pub fn push(&mut self, warning: Warning) {
        tracing::warn!(game_id = %self.game_id, kind = warning.kind(), "{warning}");
        self.warnings.push(warning);
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}
