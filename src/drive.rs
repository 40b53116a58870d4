use serde::Serialize;

use crate::boxscore_fetch::RawDrive;
use crate::diagnostics::{Diagnostics, Warning};
use crate::error::BuildError;
use crate::feed_value::parse_ordinal;
use crate::play::{BuildContext, Clock, Play, PlayKind, build_play};
use crate::position::Yardline;

/// One possession. Everything except `drive_id`, `pos_team` and the play
/// list is derived from the plays and recomputed whenever a play is added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Drive {
    drive_id: u32,
    pos_team: Option<String>,
    plays: Vec<Play>,
    start: Option<Yardline>,
    start_clock: Option<Clock>,
    scoring_team: Option<String>,
    scoring_teams: Vec<String>,
    points: i32,
}

impl Drive {
    pub fn from_plays(
        drive_id: u32,
        pos_team: Option<String>,
        plays: Vec<Play>,
        diag: &mut Diagnostics,
    ) -> Self {
        let mut drive = Self {
            drive_id,
            pos_team,
            plays,
            start: None,
            start_clock: None,
            scoring_team: None,
            scoring_teams: Vec::new(),
            points: 0,
        };
        drive.derive(diag);
        drive
    }

    pub fn drive_id(&self) -> u32 {
        self.drive_id
    }

    pub fn pos_team(&self) -> Option<&str> {
        self.pos_team.as_deref()
    }

    pub fn plays(&self) -> &[Play] {
        &self.plays
    }

    pub fn start(&self) -> Option<Yardline> {
        self.start
    }

    pub fn start_clock(&self) -> Option<&Clock> {
        self.start_clock.as_ref()
    }

    pub fn scoring_team(&self) -> Option<&str> {
        self.scoring_team.as_deref()
    }

    pub fn points(&self) -> i32 {
        self.points
    }

    pub fn num_real_plays(&self) -> usize {
        self.plays.iter().filter(|p| p.is_real()).count()
    }

    pub fn push_play(&mut self, play: Play, diag: &mut Diagnostics) {
        self.plays.push(play);
        self.derive(diag);
    }

    fn derive(&mut self, diag: &mut Diagnostics) {
        let start = resolve_drive_start(&self.plays);
        self.start = start.and_then(|p| p.yardline);
        self.start_clock = start.map(|p| p.clock.clone());

        let (points, teams) = tally_scoring(&self.plays);
        if teams.len() > 1 && teams != self.scoring_teams {
            diag.push(Warning::ScoringAttributionConflict {
                drive_id: self.drive_id,
                teams: teams.clone(),
            });
        }
        self.points = points;
        self.scoring_team = if points != 0 { teams.first().cloned() } else { None };
        self.scoring_teams = teams;
    }
}

pub fn resolve_drive_start(plays: &[Play]) -> Option<&Play> {
    plays
        .iter()
        .find(|p| p.kind != PlayKind::Kickoff && p.yardline.is_some())
}

// Distinct scoring teams in order of first appearance.
fn tally_scoring(plays: &[Play]) -> (i32, Vec<String>) {
    let points = plays.iter().map(|p| p.points).sum::<i32>();
    let mut teams: Vec<String> = Vec::new();
    if points != 0 {
        for team in plays
            .iter()
            .filter(|p| p.is_scoring())
            .filter_map(|p| p.scoring_team.as_deref())
        {
            if !teams.iter().any(|t| t == team) {
                teams.push(team.to_string());
            }
        }
    }
    (points, teams)
}

pub fn build_drive(
    raw: &RawDrive,
    index: usize,
    ctx: &BuildContext<'_>,
    diag: &mut Diagnostics,
) -> Result<Option<Drive>, BuildError> {
    let sequence = raw.sequence.as_deref().and_then(parse_ordinal);
    if raw.plays.is_empty() {
        diag.push(Warning::EmptyDrive { index, sequence });
        return Ok(None);
    }
    let drive_id = sequence.ok_or_else(|| BuildError::MalformedDrive {
        index,
        reason: match raw.sequence.as_deref() {
            Some(s) => format!("sequence {s:?} is not an ordinal"),
            None => "missing sequence".to_string(),
        },
    })?;

    let plays = raw
        .plays
        .iter()
        .enumerate()
        .map(|(i, p)| build_play(p, ctx, Some(drive_id), i, diag))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(Drive::from_plays(
        drive_id,
        ctx.season_team(raw.possession_team.as_deref()),
        plays,
        diag,
    )))
}

pub fn build_drives(
    raw: &[RawDrive],
    ctx: &BuildContext<'_>,
    diag: &mut Diagnostics,
) -> Result<Vec<Drive>, BuildError> {
    let mut drives = Vec::with_capacity(raw.len());
    for (index, raw_drive) in raw.iter().enumerate() {
        if let Some(drive) = build_drive(raw_drive, index, ctx, diag)? {
            drives.push(drive);
        }
    }
    Ok(drives)
}
