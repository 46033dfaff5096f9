use serde::{Deserialize, Serialize};

use super::models::PickModel;

/// Request payload for submitting or changing a pick
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubmitPickRequest {
    pub league_id: i64,
    pub user_id: i64, // Supplied by the authenticating layer in front of this service
    pub game_id: i64,
    pub picked_team_id: i64,
    pub picked_over_under: String,
    #[serde(default)]
    pub confidence: Option<i32>,
}

/// Response listing the picks recorded on one game
#[derive(Debug, Serialize, Deserialize)]
pub struct GamePicksResponse {
    pub game_id: i64,
    pub picks: Vec<PickModel>,
}
