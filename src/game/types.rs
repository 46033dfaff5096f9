use serde::{Deserialize, Serialize};

use crate::shared::AppError;

/// Request payload for recording a game result
///
/// PUT /games/:id/result
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GameResultRequest {
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub is_final: bool,
}

impl GameResultRequest {
    pub fn final_score(home_score: i32, away_score: i32) -> Self {
        Self {
            home_score: Some(home_score),
            away_score: Some(away_score),
            is_final: true,
        }
    }

    /// Rejects negative scores, and a final result missing either score
    pub fn validate(&self) -> Result<(), AppError> {
        for (side, score) in [("home_score", self.home_score), ("away_score", self.away_score)] {
            if score.is_some_and(|s| s < 0) {
                return Err(AppError::Validation(format!("{side} must not be negative")));
            }
        }

        if self.is_final && (self.home_score.is_none() || self.away_score.is_none()) {
            return Err(AppError::Validation(
                "a final result requires both home_score and away_score".to_string(),
            ));
        }

        Ok(())
    }
}
