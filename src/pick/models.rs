use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use strum_macros::{AsRefStr, Display, EnumString};

/// Database model for picks table
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct PickModel {
    pub id: i64,
    pub league_id: i64,
    pub user_id: i64,
    pub game_id: i64,
    pub picked_team_id: i64,
    pub picked_over_under: String, // "over" or "under"
    pub confidence: Option<i32>,   // Informational only, never scored
    pub spread_correct: Option<bool>,
    pub over_under_correct: Option<bool>,
    pub points_earned: i32,
}

impl PickModel {
    /// Whether the owning game has been scored against this pick
    pub fn is_scored(&self) -> bool {
        self.spread_correct.is_some() && self.over_under_correct.is_some()
    }

    pub fn apply_score(&mut self, score: PickScore) {
        self.spread_correct = Some(score.spread_correct);
        self.over_under_correct = Some(score.over_under_correct);
        self.points_earned = score.points_earned;
    }

    /// Resets scoring fields to their pre-finalization defaults
    pub fn clear_score(&mut self) {
        self.spread_correct = None;
        self.over_under_correct = None;
        self.points_earned = 0;
    }
}

/// Side of the over/under line a pick takes
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum OverUnder {
    Over,
    Under,
}

/// Outcome of scoring one pick against a final game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickScore {
    pub spread_correct: bool,
    pub over_under_correct: bool,
    pub points_earned: i32,
}

impl PickScore {
    pub fn new(spread_correct: bool, over_under_correct: bool) -> Self {
        Self {
            spread_correct,
            over_under_correct,
            points_earned: i32::from(spread_correct) + i32::from(over_under_correct),
        }
    }
}

/// Choice fields for creating or replacing a pick
#[derive(Debug, Clone, PartialEq)]
pub struct NewPick {
    pub league_id: i64,
    pub user_id: i64,
    pub game_id: i64,
    pub picked_team_id: i64,
    pub picked_over_under: OverUnder,
    pub confidence: Option<i32>,
}
