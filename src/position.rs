use std::fmt;

use serde::{Deserialize, Serialize};

pub const MIDFIELD_YARD_NUMBER: u8 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSide {
    Own,
    Opponent,
}

impl FieldSide {
    /// The feed reports the side as a team abbreviation. Without a possessing
    /// team the side cannot be told apart.
    pub fn relative_to(possession_team: Option<&str>, yardline_side: &str) -> Option<Self> {
        let team = possession_team.map(str::trim).filter(|t| !t.is_empty())?;
        Some(if team == yardline_side {
            FieldSide::Own
        } else {
            FieldSide::Opponent
        })
    }
}

/// Signed distance from midfield: negative in own territory, positive in
/// opponent territory, zero at the 50.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Yardline(i8);

impl Yardline {
    pub const MIDFIELD: Yardline = Yardline(0);

    pub fn from_side(side: FieldSide, yard_number: u8) -> Option<Self> {
        if yard_number > MIDFIELD_YARD_NUMBER {
            return None;
        }
        if yard_number == MIDFIELD_YARD_NUMBER {
            return Some(Self::MIDFIELD);
        }
        let distance = (MIDFIELD_YARD_NUMBER - yard_number) as i8;
        Some(match side {
            FieldSide::Own => Yardline(-distance),
            FieldSide::Opponent => Yardline(distance),
        })
    }

    pub fn value(self) -> i32 {
        i32::from(self.0)
    }

    pub fn is_midfield(self) -> bool {
        self.0 == 0
    }

    pub fn side(self) -> Option<FieldSide> {
        match self.0 {
            0 => None,
            v if v < 0 => Some(FieldSide::Own),
            _ => Some(FieldSide::Opponent),
        }
    }

    pub fn yard_number(self) -> u8 {
        MIDFIELD_YARD_NUMBER - self.0.unsigned_abs()
    }
}

impl fmt::Display for Yardline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.side() {
            None => f.write_str("midfield"),
            Some(FieldSide::Own) => write!(f, "own {}", self.yard_number()),
            Some(FieldSide::Opponent) => write!(f, "opp {}", self.yard_number()),
        }
    }
}

// The 50 is checked before the side token: the feed is inconsistent about
// which team it attributes midfield to.
pub fn resolve_yardline(
    possession_team: Option<&str>,
    yardline_side: Option<&str>,
    yardline_number: Option<&str>,
) -> Option<Yardline> {
    let number = yardline_number?.trim().parse::<u8>().ok()?;
    if number == MIDFIELD_YARD_NUMBER {
        return Some(Yardline::MIDFIELD);
    }
    let side = yardline_side.map(str::trim).filter(|s| !s.is_empty())?;
    Yardline::from_side(FieldSide::relative_to(possession_team, side)?, number)
}
