use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use super::models::{NewPick, PickModel};
use crate::shared::AppError;
use crate::store::postgres::{database_error, PICK_COLUMNS};
use crate::store::{InMemoryStore, PostgresStore};

/// Trait for pick repository operations outside of scoring
#[async_trait]
pub trait PickRepository: Send + Sync {
    /// Creates the pick for (league, user, game) or replaces its choices,
    /// resetting any score it carried.
    ///
    /// The game is checked in the same write: a final game rejects the pick
    /// so a concurrent finalize never leaves it unscored.
    async fn upsert_pick(&self, pick: &NewPick) -> Result<PickModel, AppError>;
    async fn get_pick(&self, pick_id: i64) -> Result<Option<PickModel>, AppError>;
    async fn list_picks_for_game(&self, game_id: i64) -> Result<Vec<PickModel>, AppError>;
}

/// `is_final` as read under the write lock, `None` when the game is missing
fn ensure_open(game_id: i64, is_final: Option<bool>) -> Result<(), AppError> {
    match is_final {
        None => Err(AppError::NotFound(format!("Game {} not found", game_id))),
        Some(true) => {
            warn!(game_id, "Pick rejected: game is already final");
            Err(AppError::Validation(format!(
                "Picks are closed for game {}",
                game_id
            )))
        }
        Some(false) => Ok(()),
    }
}

#[async_trait]
impl PickRepository for InMemoryStore {
    #[instrument(skip(self, pick), fields(league_id = pick.league_id, user_id = pick.user_id, game_id = pick.game_id))]
    async fn upsert_pick(&self, pick: &NewPick) -> Result<PickModel, AppError> {
        let mut state = self.write().await;
        ensure_open(
            pick.game_id,
            state.games.get(&pick.game_id).map(|game| game.is_final),
        )?;

        let existing = state.picks.values_mut().find(|p| {
            p.league_id == pick.league_id && p.user_id == pick.user_id && p.game_id == pick.game_id
        });

        if let Some(existing) = existing {
            existing.picked_team_id = pick.picked_team_id;
            existing.picked_over_under = pick.picked_over_under.to_string();
            existing.confidence = pick.confidence;
            existing.clear_score();
            debug!(pick_id = existing.id, "Pick updated in memory");
            return Ok(existing.clone());
        }

        let id = state.allocate_pick_id();
        let created = PickModel {
            id,
            league_id: pick.league_id,
            user_id: pick.user_id,
            game_id: pick.game_id,
            picked_team_id: pick.picked_team_id,
            picked_over_under: pick.picked_over_under.to_string(),
            confidence: pick.confidence,
            spread_correct: None,
            over_under_correct: None,
            points_earned: 0,
        };
        state.picks.insert(id, created.clone());

        info!(pick_id = id, "Pick created in memory");
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn get_pick(&self, pick_id: i64) -> Result<Option<PickModel>, AppError> {
        debug!(pick_id, "Fetching pick from memory");
        Ok(self.read().await.picks.get(&pick_id).cloned())
    }

    #[instrument(skip(self))]
    async fn list_picks_for_game(&self, game_id: i64) -> Result<Vec<PickModel>, AppError> {
        let picks = self
            .read()
            .await
            .picks
            .values()
            .filter(|p| p.game_id == game_id)
            .cloned()
            .collect();
        Ok(picks)
    }
}

#[async_trait]
impl PickRepository for PostgresStore {
    #[instrument(skip(self, pick), fields(league_id = pick.league_id, user_id = pick.user_id, game_id = pick.game_id))]
    async fn upsert_pick(&self, pick: &NewPick) -> Result<PickModel, AppError> {
        let query = format!(
            "INSERT INTO picks (league_id, user_id, game_id, picked_team_id, picked_over_under, confidence) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (league_id, user_id, game_id) DO UPDATE SET \
                 picked_team_id = EXCLUDED.picked_team_id, \
                 picked_over_under = EXCLUDED.picked_over_under, \
                 confidence = EXCLUDED.confidence, \
                 spread_correct = NULL, \
                 over_under_correct = NULL, \
                 points_earned = 0 \
             RETURNING {PICK_COLUMNS}"
        );

        let mut tx = self.pool().begin().await.map_err(|e| {
            warn!(error = %e, "Failed to open database transaction");
            database_error(e)
        })?;

        // Shares the row lock a finalize takes with FOR UPDATE, so the two
        // serialize and this read sees a result committed before it
        let is_final: Option<bool> =
            sqlx::query_scalar("SELECT is_final FROM games WHERE id = $1 FOR SHARE")
                .bind(pick.game_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| {
                    warn!(error = %e, "Failed to lock game for pick");
                    database_error(e)
                })?;
        ensure_open(pick.game_id, is_final)?;

        let saved = sqlx::query_as::<_, PickModel>(&query)
            .bind(pick.league_id)
            .bind(pick.user_id)
            .bind(pick.game_id)
            .bind(pick.picked_team_id)
            .bind(pick.picked_over_under.as_ref())
            .bind(pick.confidence)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to upsert pick in database");
                database_error(e)
            })?;

        tx.commit().await.map_err(|e| {
            warn!(error = %e, "Failed to commit pick");
            database_error(e)
        })?;

        info!(pick_id = saved.id, "Pick saved in database");
        Ok(saved)
    }

    #[instrument(skip(self))]
    async fn get_pick(&self, pick_id: i64) -> Result<Option<PickModel>, AppError> {
        let query = format!("SELECT {PICK_COLUMNS} FROM picks WHERE id = $1");
        sqlx::query_as::<_, PickModel>(&query)
            .bind(pick_id)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| {
                warn!(error = %e, pick_id, "Failed to fetch pick from database");
                database_error(e)
            })
    }

    #[instrument(skip(self))]
    async fn list_picks_for_game(&self, game_id: i64) -> Result<Vec<PickModel>, AppError> {
        let query = format!("SELECT {PICK_COLUMNS} FROM picks WHERE game_id = $1 ORDER BY id");
        sqlx::query_as::<_, PickModel>(&query)
            .bind(game_id)
            .fetch_all(self.pool())
            .await
            .map_err(|e| {
                warn!(error = %e, game_id, "Failed to list picks for game");
                database_error(e)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::models::GameModel;
    use crate::pick::models::{OverUnder, PickScore};
    use chrono::Utc;

    async fn store_with_game() -> InMemoryStore {
        let store = InMemoryStore::new();
        store
            .insert_game(GameModel {
                id: 3,
                week_id: 1,
                home_team_id: 10,
                away_team_id: 20,
                game_time: Utc::now(),
                home_spread: -1.0,
                total: 40.5,
                is_final: false,
                home_score: None,
                away_score: None,
                winner_team_id: None,
            })
            .await;
        store
    }

    fn new_pick(user_id: i64, team: i64, side: OverUnder) -> NewPick {
        NewPick {
            league_id: 1,
            user_id,
            game_id: 3,
            picked_team_id: team,
            picked_over_under: side,
            confidence: Some(5),
        }
    }

    #[tokio::test]
    async fn upsert_creates_then_replaces_same_pick() {
        let store = store_with_game().await;

        let created = store
            .upsert_pick(&new_pick(1, 10, OverUnder::Over))
            .await
            .unwrap();
        assert_eq!(created.picked_over_under, "over");

        let replaced = store
            .upsert_pick(&new_pick(1, 20, OverUnder::Under))
            .await
            .unwrap();
        assert_eq!(replaced.id, created.id);
        assert_eq!(replaced.picked_team_id, 20);
        assert_eq!(replaced.picked_over_under, "under");

        assert_eq!(store.list_picks_for_game(3).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn upsert_resets_existing_score() {
        let store = store_with_game().await;
        let created = store
            .upsert_pick(&new_pick(1, 10, OverUnder::Over))
            .await
            .unwrap();

        store
            .write()
            .await
            .picks
            .get_mut(&created.id)
            .unwrap()
            .apply_score(PickScore::new(true, true));

        let replaced = store
            .upsert_pick(&new_pick(1, 10, OverUnder::Over))
            .await
            .unwrap();
        assert!(!replaced.is_scored());
        assert_eq!(replaced.points_earned, 0);
    }

    #[tokio::test]
    async fn distinct_users_get_distinct_picks() {
        let store = store_with_game().await;
        let first = store
            .upsert_pick(&new_pick(1, 10, OverUnder::Over))
            .await
            .unwrap();
        let second = store
            .upsert_pick(&new_pick(2, 10, OverUnder::Over))
            .await
            .unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(store.get_pick(second.id).await.unwrap(), Some(second));
        assert!(store.get_pick(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn upsert_on_final_game_keeps_existing_score() {
        let store = store_with_game().await;
        let created = store
            .upsert_pick(&new_pick(1, 10, OverUnder::Over))
            .await
            .unwrap();
        {
            let mut state = store.write().await;
            state
                .picks
                .get_mut(&created.id)
                .unwrap()
                .apply_score(PickScore::new(true, false));
            state.games.get_mut(&3).unwrap().is_final = true;
        }

        let replaced = store.upsert_pick(&new_pick(1, 20, OverUnder::Under)).await;
        assert!(matches!(replaced, Err(AppError::Validation(_))));

        let created_late = store.upsert_pick(&new_pick(2, 10, OverUnder::Over)).await;
        assert!(matches!(created_late, Err(AppError::Validation(_))));

        let kept = store.get_pick(created.id).await.unwrap().unwrap();
        assert_eq!(kept.picked_team_id, 10);
        assert_eq!(kept.points_earned, 1);
        assert_eq!(store.list_picks_for_game(3).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn upsert_for_unknown_game_is_not_found() {
        let store = InMemoryStore::new();

        let result = store.upsert_pick(&new_pick(1, 10, OverUnder::Over)).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
