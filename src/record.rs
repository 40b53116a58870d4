use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub game_id: String,
    pub season_year: i32,
    pub season_type: String,
    pub game_week: u32,
    pub home_team: String,
    pub away_team: String,
    pub drives: Vec<DriveRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveRecord {
    pub drive_id: u32,
    pub drive_pos_team: Option<String>,
    /// Signed distance from midfield; `None` when the start is unknown.
    pub drive_start: Option<i32>,
    pub drive_start_time: Option<String>,
    pub drive_num_plays: usize,
    pub drive_scoring_team: Option<String>,
    pub drive_points: i32,
}

impl GameRecord {
    pub fn total_points(&self) -> i32 {
        self.drives.iter().map(|d| d.drive_points).sum()
    }
}
