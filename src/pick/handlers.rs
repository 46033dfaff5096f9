use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    models::PickModel,
    service::PickService,
    types::{GamePicksResponse, SubmitPickRequest},
};
use crate::shared::{AppError, AppState};

fn pick_service(state: &AppState) -> PickService {
    PickService::new(
        Arc::clone(&state.pick_repository),
        Arc::clone(&state.game_repository),
        Arc::clone(&state.league_repository),
    )
}

/// HTTP handler for submitting a pick
///
/// POST /picks
/// Creates the pick, or replaces the user's earlier pick for the same game
#[instrument(name = "submit_pick", skip(state, request))]
pub async fn submit_pick(
    State(state): State<AppState>,
    Json(request): Json<SubmitPickRequest>,
) -> Result<(StatusCode, Json<PickModel>), AppError> {
    info!(
        league_id = request.league_id,
        user_id = request.user_id,
        game_id = request.game_id,
        "Submitting pick"
    );

    let pick = pick_service(&state).submit_pick(request).await?;

    Ok((StatusCode::CREATED, Json(pick)))
}

/// GET /picks/:id
#[instrument(name = "get_pick", skip(state))]
pub async fn get_pick(
    State(state): State<AppState>,
    Path(pick_id): Path<i64>,
) -> Result<Json<PickModel>, AppError> {
    let pick = pick_service(&state).get_pick(pick_id).await?;
    Ok(Json(pick))
}

/// GET /games/:id/picks
#[instrument(name = "list_game_picks", skip(state))]
pub async fn list_game_picks(
    State(state): State<AppState>,
    Path(game_id): Path<i64>,
) -> Result<Json<GamePicksResponse>, AppError> {
    let picks = pick_service(&state).picks_for_game(game_id).await?;

    info!(game_id, pick_count = picks.len(), "Picks listed");

    Ok(Json(GamePicksResponse { game_id, picks }))
}
