use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::{
    models::{GameDetails, GameModel},
    types::GameResultRequest,
};
use crate::{
    pick::{PickScorer, ScoringOutcome},
    shared::AppError,
    store::{ScoringStore, ScoringTransaction},
};

/// Rules for recording a result on a game that is already final
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FinalizePolicy {
    /// Permit a final game to be re-finalized with different scores
    pub allow_corrections: bool,
}

impl FinalizePolicy {
    /// Checks a new result against the game's current one.
    ///
    /// Re-submitting the same final score is always accepted and re-scores
    /// to the same values. A final game can never be reopened.
    pub fn check(&self, game: &GameModel, request: &GameResultRequest) -> Result<(), AppError> {
        if !game.is_final {
            return Ok(());
        }

        if !request.is_final {
            return Err(AppError::Conflict(format!(
                "Game {} is already final and cannot be reopened",
                game.id
            )));
        }

        if !game.has_scores(request.home_score, request.away_score) && !self.allow_corrections {
            return Err(AppError::Conflict(format!(
                "Game {} is already final with a different score",
                game.id
            )));
        }

        Ok(())
    }
}

/// Records game results and scores dependent picks as one unit of work
pub struct ResultFinalizer {
    store: Arc<dyn ScoringStore>,
    scorer: PickScorer,
    policy: FinalizePolicy,
}

impl ResultFinalizer {
    pub fn new(store: Arc<dyn ScoringStore>, policy: FinalizePolicy) -> Self {
        Self {
            store,
            scorer: PickScorer::new(),
            policy,
        }
    }

    /// Applies a result to a game and, when final, scores every pick on it.
    ///
    /// Either the game and all of its picks reflect the new result and the
    /// updated game is returned, or nothing changes.
    #[instrument(skip(self, request), fields(is_final = request.is_final))]
    pub async fn finalize(
        &self,
        game_id: i64,
        request: GameResultRequest,
    ) -> Result<GameDetails, AppError> {
        request.validate()?;

        let mut tx = self.store.begin().await?;
        match self.apply_result(tx.as_mut(), game_id, &request).await {
            Ok((outcome, details)) => {
                tx.commit().await?;
                info!(
                    game_id,
                    home_score = ?request.home_score,
                    away_score = ?request.away_score,
                    picks_scored = outcome.map_or(0, |o| o.picks_scored),
                    "Game result recorded"
                );
                Ok(details)
            }
            Err(error) => {
                warn!(game_id, error = %error, "Recording game result failed, rolling back");
                if let Err(rollback_error) = tx.rollback().await {
                    warn!(game_id, error = %rollback_error, "Rollback failed");
                }
                Err(error)
            }
        }
    }

    /// Re-runs scoring for a game in its own transaction
    #[instrument(skip(self))]
    pub async fn rescore(&self, game_id: i64) -> Result<ScoringOutcome, AppError> {
        let mut tx = self.store.begin().await?;
        match self.scorer.score_game(tx.as_mut(), game_id).await {
            Ok(outcome) => {
                tx.commit().await?;
                Ok(outcome)
            }
            Err(error) => {
                if let Err(rollback_error) = tx.rollback().await {
                    warn!(game_id, error = %rollback_error, "Rollback failed");
                }
                Err(error)
            }
        }
    }

    async fn apply_result(
        &self,
        tx: &mut dyn ScoringTransaction,
        game_id: i64,
        request: &GameResultRequest,
    ) -> Result<(Option<ScoringOutcome>, GameDetails), AppError> {
        let mut game = tx
            .game_for_update(game_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Game {} not found", game_id)))?;

        self.policy.check(&game, request)?;
        if game.is_final && !game.has_scores(request.home_score, request.away_score) {
            warn!(
                game_id,
                previous_home = ?game.home_score,
                previous_away = ?game.away_score,
                "Correcting result of a final game"
            );
        }

        game.apply_result(request.home_score, request.away_score, request.is_final);
        tx.update_game_result(&game).await?;
        debug!(game_id, winner_team_id = ?game.winner_team_id, "Game result staged");

        let outcome = if game.is_final {
            Some(self.scorer.score_game(tx, game_id).await?)
        } else {
            None
        };

        // Resolved before commit so a failed read cannot follow a committed result
        let details = tx
            .game_details(game_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Game {} not found", game_id)))?;

        Ok((outcome, details))
    }
}
