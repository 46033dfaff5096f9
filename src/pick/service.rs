use chrono::Utc;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    models::{NewPick, OverUnder, PickModel},
    repository::PickRepository,
    types::SubmitPickRequest,
};
use crate::{game::repository::GameRepository, league::LeagueRepository, shared::AppError};

/// Service for pick submission and lookup
pub struct PickService {
    picks: Arc<dyn PickRepository>,
    games: Arc<dyn GameRepository>,
    leagues: Arc<dyn LeagueRepository>,
}

impl PickService {
    pub fn new(
        picks: Arc<dyn PickRepository>,
        games: Arc<dyn GameRepository>,
        leagues: Arc<dyn LeagueRepository>,
    ) -> Self {
        Self {
            picks,
            games,
            leagues,
        }
    }

    /// Records a user's pick for a game, replacing any earlier pick they made
    /// for the same game in the same league. Picks lock at kickoff.
    #[instrument(skip(self, request), fields(league_id = request.league_id, user_id = request.user_id, game_id = request.game_id))]
    pub async fn submit_pick(&self, request: SubmitPickRequest) -> Result<PickModel, AppError> {
        let side = OverUnder::from_str(&request.picked_over_under.trim().to_ascii_lowercase())
            .map_err(|_| {
                AppError::Validation(format!(
                    "picked_over_under must be \"over\" or \"under\", got {:?}",
                    request.picked_over_under
                ))
            })?;

        if request.confidence.is_some_and(|c| c < 0) {
            return Err(AppError::Validation(
                "confidence must not be negative".to_string(),
            ));
        }

        let game = self
            .games
            .get_game(request.game_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Game {} not found", request.game_id)))?;

        if self.leagues.get_league(request.league_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "League {} not found",
                request.league_id
            )));
        }

        if !self
            .leagues
            .is_member(request.league_id, request.user_id)
            .await?
        {
            warn!("Pick rejected: user is not a league member");
            return Err(AppError::Validation(format!(
                "User {} is not a member of league {}",
                request.user_id, request.league_id
            )));
        }

        if !game.involves_team(request.picked_team_id) {
            return Err(AppError::Validation(format!(
                "Team {} is not playing in game {}",
                request.picked_team_id, game.id
            )));
        }

        if game.is_final || game.game_time <= Utc::now() {
            warn!(game_time = %game.game_time, "Pick rejected: game already started");
            return Err(AppError::Validation(format!(
                "Picks are closed for game {}",
                game.id
            )));
        }

        let pick = self
            .picks
            .upsert_pick(&NewPick {
                league_id: request.league_id,
                user_id: request.user_id,
                game_id: request.game_id,
                picked_team_id: request.picked_team_id,
                picked_over_under: side,
                confidence: request.confidence,
            })
            .await?;

        info!(pick_id = pick.id, "Pick submitted");
        Ok(pick)
    }

    #[instrument(skip(self))]
    pub async fn get_pick(&self, pick_id: i64) -> Result<PickModel, AppError> {
        self.picks
            .get_pick(pick_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Pick {} not found", pick_id)))
    }

    /// Lists picks for an existing game; an unknown game is not found
    #[instrument(skip(self))]
    pub async fn picks_for_game(&self, game_id: i64) -> Result<Vec<PickModel>, AppError> {
        if self.games.get_game(game_id).await?.is_none() {
            return Err(AppError::NotFound(format!("Game {} not found", game_id)));
        }
        self.picks.list_picks_for_game(game_id).await
    }
}
