use std::fmt;

use serde::{Deserialize, Serialize};

use crate::boxscore_fetch::BoxscoreFeed;
use crate::diagnostics::{Diagnostics, Warning};
use crate::drive::{Drive, build_drives};
use crate::error::BuildError;
use crate::integrity::scan_duplicate_play_ids;
use crate::play::BuildContext;
use crate::reconcile::{ReconcileOutcome, reconcile};
use crate::record::{DriveRecord, GameRecord};
use crate::rules::EngineRules;

pub const PRO_BOWL_SEASON_TYPE: &str = "PRO";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameMeta {
    pub season_year: i32,
    pub season_type: String,
    pub game_week: u32,
    pub home_team: String,
    pub away_team: String,
    pub game_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Game {
    pub meta: GameMeta,
    pub home_score: i32,
    pub away_score: i32,
    pub(crate) drives: Vec<Drive>,
}

impl Game {
    pub fn new(meta: GameMeta, home_score: i32, away_score: i32, drives: Vec<Drive>) -> Self {
        Self {
            meta,
            home_score,
            away_score,
            drives,
        }
    }

    pub fn drives(&self) -> &[Drive] {
        &self.drives
    }

    pub fn final_total(&self) -> i32 {
        self.home_score + self.away_score
    }

    pub fn drive_points_total(&self) -> i32 {
        self.drives
            .iter()
            .flat_map(|d| d.plays())
            .map(|p| p.points)
            .sum()
    }

    pub fn export(&self) -> GameRecord {
        GameRecord {
            game_id: self.meta.game_id.clone(),
            season_year: self.meta.season_year,
            season_type: self.meta.season_type.clone(),
            game_week: self.meta.game_week,
            home_team: self.meta.home_team.clone(),
            away_team: self.meta.away_team.clone(),
            drives: self
                .drives
                .iter()
                .map(|d| DriveRecord {
                    drive_id: d.drive_id(),
                    drive_pos_team: d.pos_team().map(str::to_string),
                    drive_start: d.start().map(|y| y.value()),
                    drive_start_time: d.start_clock().map(|c| c.to_string()),
                    drive_num_plays: d.num_real_plays(),
                    drive_scoring_team: d.scoring_team().map(str::to_string),
                    drive_points: d.points(),
                })
                .collect(),
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}_{}, id={}\t{} ({}) vs. {} ({})",
            self.meta.season_year,
            self.meta.season_type,
            self.meta.game_week,
            self.meta.game_id,
            self.meta.away_team,
            self.away_score,
            self.meta.home_team,
            self.home_score
        )
    }
}

#[derive(Debug, Clone)]
pub struct GameReport {
    pub game: Game,
    pub reconciliation: ReconcileOutcome,
    pub warnings: Vec<Warning>,
}

impl GameReport {
    pub fn log_lines(&self) -> Vec<String> {
        self.warnings
            .iter()
            .map(|w| format!("[WARN] game {}: {w}", self.game.meta.game_id))
            .collect()
    }
}

/// Build every drive of the feed, reconcile against the final score, then
/// scan for duplicate plays.
pub fn reconstruct_game(
    meta: GameMeta,
    feed: &BoxscoreFeed,
    rules: &EngineRules,
) -> Result<GameReport, BuildError> {
    let mut diag = Diagnostics::new(meta.game_id.clone());
    let ctx = BuildContext {
        rules,
        season_year: meta.season_year,
    };

    let drives = build_drives(&feed.drives, &ctx, &mut diag)?;
    let mut game = Game::new(meta, feed.home_score, feed.away_score, drives);

    let reconciliation = reconcile(&mut game, &feed.scoring_plays, &ctx, &mut diag)?;
    scan_duplicate_play_ids(&game, &mut diag);

    Ok(GameReport {
        game,
        reconciliation,
        warnings: diag.into_warnings(),
    })
}
