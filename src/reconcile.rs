use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::boxscore_fetch::RawPlay;
use crate::diagnostics::{Diagnostics, Warning};
use crate::error::BuildError;
use crate::feed_value::parse_ordinal;
use crate::game::Game;
use crate::integrity::check_score_integrity;
use crate::play::{BuildContext, build_play};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReconcileOutcome {
    Consistent,
    Repaired { injected: Vec<u32> },
    Mismatch {
        injected: Vec<u32>,
        computed: i32,
        expected: i32,
    },
}

impl ReconcileOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            ReconcileOutcome::Consistent => "consistent",
            ReconcileOutcome::Repaired { .. } => "repaired",
            ReconcileOutcome::Mismatch { .. } => "mismatch",
        }
    }

    pub fn is_consistent(&self) -> bool {
        !matches!(self, ReconcileOutcome::Mismatch { .. })
    }

    pub fn injected(&self) -> &[u32] {
        match self {
            ReconcileOutcome::Consistent => &[],
            ReconcileOutcome::Repaired { injected } | ReconcileOutcome::Mismatch { injected, .. } => {
                injected
            }
        }
    }
}

/// Scoring plays missing from the drives (typically the conversion after a
/// return touchdown) are appended to the drive holding the nearest earlier
/// play id.
pub fn reconcile(
    game: &mut Game,
    scoring_plays: &[RawPlay],
    ctx: &BuildContext<'_>,
    diag: &mut Diagnostics,
) -> Result<ReconcileOutcome, BuildError> {
    if check_score_integrity(game).is_consistent() {
        return Ok(ReconcileOutcome::Consistent);
    }

    // play id -> index of the drive holding it
    let mut placed: BTreeMap<u32, usize> = BTreeMap::new();
    for (idx, drive) in game.drives.iter().enumerate() {
        for play in drive.plays() {
            placed.insert(play.play_id, idx);
        }
    }

    let mut injected = Vec::new();
    let mut seen = HashSet::new();
    for (index, raw) in scoring_plays.iter().enumerate() {
        // Dropped with a warning; the drives built so far are kept.
        let Some(id) = raw.play_id.as_deref().and_then(parse_ordinal) else {
            diag.push(Warning::UnidentifiedScoringPlay {
                index,
                play_id: raw.play_id.clone(),
            });
            continue;
        };
        if placed.contains_key(&id) || !seen.insert(id) {
            continue;
        }
        let play = build_play(raw, ctx, None, index, diag)?;

        let Some((_, &target)) = placed.range(..play.play_id).next_back() else {
            diag.push(Warning::UnplaceableScoringPlay {
                play_id: play.play_id,
            });
            continue;
        };
        placed.insert(play.play_id, target);
        injected.push(play.play_id);
        game.drives[target].push_play(play, diag);
    }

    let check = check_score_integrity(game);
    if check.is_consistent() {
        return Ok(ReconcileOutcome::Repaired { injected });
    }
    diag.push(Warning::ScorelineMismatch {
        computed: check.computed,
        home_score: game.home_score,
        away_score: game.away_score,
    });
    Ok(ReconcileOutcome::Mismatch {
        injected,
        computed: check.computed,
        expected: check.expected,
    })
}
