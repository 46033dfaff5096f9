use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::game::repository::GameRepository;
use crate::game::FinalizePolicy;
use crate::leaderboard::repository::LeaderboardRepository;
use crate::league::repository::LeagueRepository;
use crate::pick::repository::PickRepository;
use crate::store::ScoringStore;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub scoring_store: Arc<dyn ScoringStore>,
    pub game_repository: Arc<dyn GameRepository>,
    pub pick_repository: Arc<dyn PickRepository>,
    pub league_repository: Arc<dyn LeagueRepository>,
    pub leaderboard_repository: Arc<dyn LeaderboardRepository>,
    pub finalize_policy: FinalizePolicy,
}

impl AppState {
    pub fn new(
        scoring_store: Arc<dyn ScoringStore>,
        game_repository: Arc<dyn GameRepository>,
        pick_repository: Arc<dyn PickRepository>,
        league_repository: Arc<dyn LeagueRepository>,
        leaderboard_repository: Arc<dyn LeaderboardRepository>,
        finalize_policy: FinalizePolicy,
    ) -> Self {
        Self {
            scoring_store,
            game_repository,
            pick_repository,
            league_repository,
            leaderboard_repository,
            finalize_policy,
        }
    }

    /// Wires every repository to a single backing store
    pub fn from_store<S>(store: Arc<S>, finalize_policy: FinalizePolicy) -> Self
    where
        S: ScoringStore
            + GameRepository
            + PickRepository
            + LeagueRepository
            + LeaderboardRepository
            + 'static,
    {
        Self::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store,
            finalize_policy,
        )
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::DatabaseError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", msg),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
