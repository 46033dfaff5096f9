use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{models::GameDetails, service::ResultFinalizer, types::GameResultRequest};
use crate::pick::ScoringOutcome;
use crate::shared::{AppError, AppState};

fn finalizer(state: &AppState) -> ResultFinalizer {
    ResultFinalizer::new(Arc::clone(&state.scoring_store), state.finalize_policy)
}

/// HTTP handler for recording a game result
///
/// PUT /games/:id/result
/// Returns the updated game with teams and week resolved
#[instrument(name = "finalize_game_result", skip(state, request))]
pub async fn finalize_game_result(
    State(state): State<AppState>,
    Path(game_id): Path<i64>,
    Json(request): Json<GameResultRequest>,
) -> Result<Json<GameDetails>, AppError> {
    info!(game_id, is_final = request.is_final, "Recording game result");

    let game = finalizer(&state).finalize(game_id, request).await?;

    Ok(Json(game))
}

/// GET /games/:id
#[instrument(name = "get_game", skip(state))]
pub async fn get_game(
    State(state): State<AppState>,
    Path(game_id): Path<i64>,
) -> Result<Json<GameDetails>, AppError> {
    let game = state
        .game_repository
        .get_game_details(game_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Game {} not found", game_id)))?;

    Ok(Json(game))
}

/// HTTP handler for re-running scoring on a game
///
/// POST /games/:id/rescore
#[instrument(name = "rescore_game", skip(state))]
pub async fn rescore_game(
    State(state): State<AppState>,
    Path(game_id): Path<i64>,
) -> Result<Json<ScoringOutcome>, AppError> {
    info!(game_id, "Re-scoring game");

    let outcome = finalizer(&state).rescore(game_id).await?;

    Ok(Json(outcome))
}
