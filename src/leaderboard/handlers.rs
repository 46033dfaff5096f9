use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    models::{LeaderboardEntry, LeaderboardQuery},
    service::LeaderboardService,
};
use crate::shared::{AppError, AppState};

/// HTTP handler for the standings
///
/// GET /leaderboard?season_id=&league_id=
/// Returns entries ordered by total points, empty when nothing matches
#[instrument(name = "get_leaderboard", skip(state))]
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<Vec<LeaderboardEntry>>, AppError> {
    info!(season_id = ?query.season_id, league_id = ?query.league_id, "Fetching leaderboard");

    let service = LeaderboardService::new(Arc::clone(&state.leaderboard_repository));
    let entries = service.standings(&query).await?;

    Ok(Json(entries))
}
