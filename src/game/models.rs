use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;

use crate::shared::AppError;

/// Database model for games table
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct GameModel {
    pub id: i64,
    pub week_id: i64,
    pub home_team_id: i64,
    pub away_team_id: i64,
    pub game_time: DateTime<Utc>,
    pub home_spread: f64, // Negative favors the home team
    pub total: f64,       // Over/under line, may be fractional
    pub is_final: bool,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub winner_team_id: Option<i64>, // None until final, and on ties
}

/// Final score of a game, available once both scores are recorded
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinalScore {
    pub home_score: i32,
    pub away_score: i32,
}

impl FinalScore {
    /// Combined points scored, as compared against the over/under line
    pub fn combined(&self) -> f64 {
        f64::from(self.home_score) + f64::from(self.away_score)
    }
}

impl GameModel {
    /// Returns the recorded scores when both are present
    pub fn final_score(&self) -> Option<FinalScore> {
        match (self.home_score, self.away_score) {
            (Some(home_score), Some(away_score)) => Some(FinalScore {
                home_score,
                away_score,
            }),
            _ => None,
        }
    }

    /// Whether the team plays in this game
    pub fn involves_team(&self, team_id: i64) -> bool {
        self.home_team_id == team_id || self.away_team_id == team_id
    }

    /// Records a result and recomputes the winner.
    ///
    /// The winner is only set for a final game with differing scores; a tie
    /// or an in-progress result clears it.
    pub fn apply_result(
        &mut self,
        home_score: Option<i32>,
        away_score: Option<i32>,
        is_final: bool,
    ) {
        self.home_score = home_score;
        self.away_score = away_score;
        self.is_final = is_final;
        self.winner_team_id = match (is_final, home_score, away_score) {
            (true, Some(home), Some(away)) if home > away => Some(self.home_team_id),
            (true, Some(home), Some(away)) if away > home => Some(self.away_team_id),
            _ => None,
        };
    }

    /// Whether the result already recorded matches the given scores
    pub fn has_scores(&self, home_score: Option<i32>, away_score: Option<i32>) -> bool {
        self.home_score == home_score && self.away_score == away_score
    }
}

/// Database model for teams table
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct TeamModel {
    pub id: i64,
    pub name: String,
    pub abbreviation: String,
}

/// Database model for weeks table
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct WeekModel {
    pub id: i64,
    pub season_id: i64,
    pub number: i32,
}

/// A game with its week and team references resolved, as returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameDetails {
    pub id: i64,
    pub week: WeekModel,
    pub home_team: TeamModel,
    pub away_team: TeamModel,
    pub game_time: DateTime<Utc>,
    pub home_spread: f64,
    pub total: f64,
    pub is_final: bool,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub winner_team: Option<TeamModel>,
}

impl GameDetails {
    /// Resolves a game's team references against a batch-loaded team index
    pub fn assemble(
        game: GameModel,
        week: WeekModel,
        teams: &HashMap<i64, TeamModel>,
    ) -> Result<Self, AppError> {
        let team = |team_id: i64| {
            teams.get(&team_id).cloned().ok_or_else(|| {
                AppError::DatabaseError(format!(
                    "Game {} references missing team {}",
                    game.id, team_id
                ))
            })
        };

        let home_team = team(game.home_team_id)?;
        let away_team = team(game.away_team_id)?;
        let winner_team = game.winner_team_id.map(team).transpose()?;

        Ok(Self {
            id: game.id,
            week,
            home_team,
            away_team,
            game_time: game.game_time,
            home_spread: game.home_spread,
            total: game.total,
            is_final: game.is_final,
            home_score: game.home_score,
            away_score: game.away_score,
            winner_team,
        })
    }

    /// Team ids needed to assemble details for a game
    pub fn team_ids(game: &GameModel) -> Vec<i64> {
        let mut ids = vec![game.home_team_id, game.away_team_id];
        ids.extend(game.winner_team_id);
        ids
    }
}
