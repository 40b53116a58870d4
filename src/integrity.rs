use std::collections::HashSet;

use crate::diagnostics::{Diagnostics, Warning};
use crate::drive::Drive;
use crate::game::Game;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreCheck {
    pub computed: i32,
    pub expected: i32,
}

impl ScoreCheck {
    pub fn is_consistent(&self) -> bool {
        self.computed == self.expected
    }
}

pub fn check_score_integrity(game: &Game) -> ScoreCheck {
    ScoreCheck {
        computed: game.drive_points_total(),
        expected: game.final_total(),
    }
}

pub fn duplicate_play_ids(drive: &Drive) -> Vec<u32> {
    let mut seen = HashSet::new();
    let mut repeated = Vec::new();
    for play in drive.plays() {
        if !seen.insert(play.play_id) && !repeated.contains(&play.play_id) {
            repeated.push(play.play_id);
        }
    }
    repeated
}

/// Report every drive that repeats a play id. Nothing is removed: which copy
/// is canonical is not decidable here. Returns the number of drives flagged.
pub fn scan_duplicate_play_ids(game: &Game, diag: &mut Diagnostics) -> usize {
    let mut flagged = 0;
    for drive in game.drives() {
        let play_ids = duplicate_play_ids(drive);
        if play_ids.is_empty() {
            continue;
        }
        flagged += 1;
        diag.push(Warning::DuplicatePlayIds {
            drive_id: drive.drive_id(),
            play_ids,
        });
    }
    flagged
}
