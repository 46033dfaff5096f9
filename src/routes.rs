use axum::{
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{game, leaderboard, pick, shared::AppState};

/// Builds the HTTP router over the given application state
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/games/:id", get(game::get_game))
        .route("/games/:id/result", put(game::finalize_game_result))
        .route("/games/:id/rescore", post(game::rescore_game))
        .route("/games/:id/picks", get(pick::list_game_picks))
        .route("/picks", post(pick::submit_pick))
        .route("/picks/:id", get(pick::get_pick))
        .route("/leaderboard", get(leaderboard::get_leaderboard))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
