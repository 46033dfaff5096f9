use serde::Serialize;
use tracing::{debug, info, instrument};

use super::scoring::score_pick;
use crate::shared::AppError;
use crate::store::ScoringTransaction;

/// Summary of one scoring pass over a game's picks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoringOutcome {
    pub game_id: i64,
    pub picks_scored: usize,
    pub points_awarded: i64,
}

impl ScoringOutcome {
    fn empty(game_id: i64) -> Self {
        Self {
            game_id,
            picks_scored: 0,
            points_awarded: 0,
        }
    }
}

/// Scores every pick on a finalized game inside the caller's transaction
///
/// Scoring is a pure function of the game result and each pick's choices, so
/// running it again over the same game rewrites identical values.
#[derive(Debug, Clone, Copy, Default)]
pub struct PickScorer;

impl PickScorer {
    pub fn new() -> Self {
        Self
    }

    #[instrument(skip(self, tx))]
    pub async fn score_game(
        &self,
        tx: &mut dyn ScoringTransaction,
        game_id: i64,
    ) -> Result<ScoringOutcome, AppError> {
        let game = tx
            .game_for_update(game_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Game {} not found", game_id)))?;

        // In-progress games carry scores but no winner, so they are skipped too
        let final_score = match game.final_score() {
            Some(final_score) if game.is_final => final_score,
            _ => {
                debug!(game_id, "Game is not final yet, nothing to score");
                return Ok(ScoringOutcome::empty(game_id));
            }
        };

        let picks = tx.picks_for_game(game_id).await?;
        if picks.is_empty() {
            debug!(game_id, "No picks recorded for game");
            return Ok(ScoringOutcome::empty(game_id));
        }

        let mut outcome = ScoringOutcome::empty(game_id);
        for mut pick in picks {
            let score = score_pick(&game, final_score, &pick);
            pick.apply_score(score);
            tx.update_pick_score(&pick).await?;

            outcome.picks_scored += 1;
            outcome.points_awarded += i64::from(score.points_earned);
        }

        info!(
            game_id,
            picks_scored = outcome.picks_scored,
            points_awarded = outcome.points_awarded,
            "Scored picks for game"
        );

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::models::GameModel;
    use crate::pick::models::PickModel;
    use crate::store::{InMemoryStore, ScoringStore};
    use chrono::Utc;

    fn game(home_score: Option<i32>, away_score: Option<i32>) -> GameModel {
        let mut game = GameModel {
            id: 7,
            week_id: 1,
            home_team_id: 1,
            away_team_id: 2,
            game_time: Utc::now(),
            home_spread: -6.5,
            total: 47.5,
            is_final: false,
            home_score: None,
            away_score: None,
            winner_team_id: None,
        };
        let is_final = home_score.is_some() && away_score.is_some();
        game.apply_result(home_score, away_score, is_final);
        game
    }

    fn pick(id: i64, team: i64, side: &str) -> PickModel {
        PickModel {
            id,
            league_id: 1,
            user_id: id,
            game_id: 7,
            picked_team_id: team,
            picked_over_under: side.to_string(),
            confidence: None,
            spread_correct: None,
            over_under_correct: None,
            points_earned: 0,
        }
    }

    async fn store_with(game: GameModel, picks: Vec<PickModel>) -> InMemoryStore {
        let store = InMemoryStore::new();
        store.insert_game(game).await;
        for pick in picks {
            store.insert_pick(pick).await;
        }
        store
    }

    async fn score_and_commit(store: &InMemoryStore, game_id: i64) -> ScoringOutcome {
        let mut tx = store.begin().await.unwrap();
        let outcome = PickScorer::new()
            .score_game(tx.as_mut(), game_id)
            .await
            .unwrap();
        tx.commit().await.unwrap();
        outcome
    }

    #[tokio::test]
    async fn scores_every_pick_on_game() {
        let store = store_with(
            game(Some(31), Some(20)),
            vec![pick(1, 1, "over"), pick(2, 2, "under"), pick(3, 1, "under")],
        )
        .await;

        let outcome = score_and_commit(&store, 7).await;
        assert_eq!(outcome.picks_scored, 3);
        assert_eq!(outcome.points_awarded, 2 + 0 + 1);

        let state = store.read().await;
        assert_eq!(state.picks[&1].spread_correct, Some(true));
        assert_eq!(state.picks[&1].over_under_correct, Some(true));
        assert_eq!(state.picks[&1].points_earned, 2);
        assert_eq!(state.picks[&2].points_earned, 0);
        assert_eq!(state.picks[&3].points_earned, 1);
    }

    #[tokio::test]
    async fn scoring_twice_is_idempotent() {
        let store = store_with(
            game(Some(17), Some(17)),
            vec![pick(1, 1, "over"), pick(2, 2, "under")],
        )
        .await;

        score_and_commit(&store, 7).await;
        let first: Vec<PickModel> = store.read().await.picks.values().cloned().collect();

        score_and_commit(&store, 7).await;
        let second: Vec<PickModel> = store.read().await.picks.values().cloned().collect();

        assert_eq!(first, second);
        assert!(second.iter().all(|p| p.spread_correct == Some(false)));
    }

    #[tokio::test]
    async fn game_without_scores_is_a_no_op() {
        let store = store_with(game(None, None), vec![pick(1, 1, "over")]).await;

        let outcome = score_and_commit(&store, 7).await;
        assert_eq!(outcome.picks_scored, 0);
        assert!(!store.read().await.picks[&1].is_scored());
    }

    #[tokio::test]
    async fn in_progress_game_with_scores_is_a_no_op() {
        let mut in_progress = game(None, None);
        in_progress.apply_result(Some(21), Some(3), false);
        let store = store_with(in_progress, vec![pick(1, 1, "over")]).await;

        let outcome = score_and_commit(&store, 7).await;
        assert_eq!(outcome, ScoringOutcome::empty(7));
        assert!(!store.read().await.picks[&1].is_scored());
    }

    #[tokio::test]
    async fn game_without_picks_succeeds() {
        let store = store_with(game(Some(3), Some(0)), vec![]).await;

        let outcome = score_and_commit(&store, 7).await;
        assert_eq!(outcome, ScoringOutcome::empty(7));
    }

    #[tokio::test]
    async fn missing_game_is_not_found() {
        let store = InMemoryStore::new();
        let mut tx = store.begin().await.unwrap();

        let result = PickScorer::new().score_game(tx.as_mut(), 404).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
