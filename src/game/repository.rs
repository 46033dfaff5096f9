use async_trait::async_trait;
use sqlx::PgConnection;
use tracing::{debug, instrument, warn};

use super::models::{GameDetails, GameModel, TeamModel, WeekModel};
use crate::shared::AppError;
use crate::store::postgres::{database_error, GAME_COLUMNS};
use crate::store::{index_by, InMemoryStore, PostgresStore};

/// Trait for read-side game operations
#[async_trait]
pub trait GameRepository: Send + Sync {
    async fn get_game(&self, game_id: i64) -> Result<Option<GameModel>, AppError>;

    /// Loads a game with its week and teams resolved
    async fn get_game_details(&self, game_id: i64) -> Result<Option<GameDetails>, AppError>;
}

#[async_trait]
impl GameRepository for InMemoryStore {
    #[instrument(skip(self))]
    async fn get_game(&self, game_id: i64) -> Result<Option<GameModel>, AppError> {
        debug!(game_id, "Fetching game from memory");
        Ok(self.read().await.games.get(&game_id).cloned())
    }

    #[instrument(skip(self))]
    async fn get_game_details(&self, game_id: i64) -> Result<Option<GameDetails>, AppError> {
        let state = self.read().await;
        let Some(game) = state.games.get(&game_id).cloned() else {
            debug!(game_id, "Game not found in memory");
            return Ok(None);
        };

        state.game_details(game).map(Some)
    }
}

#[async_trait]
impl GameRepository for PostgresStore {
    #[instrument(skip(self))]
    async fn get_game(&self, game_id: i64) -> Result<Option<GameModel>, AppError> {
        debug!(game_id, "Fetching game from database");

        let query = format!("SELECT {GAME_COLUMNS} FROM games WHERE id = $1");
        sqlx::query_as::<_, GameModel>(&query)
            .bind(game_id)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| {
                warn!(error = %e, game_id, "Failed to fetch game from database");
                database_error(e)
            })
    }

    #[instrument(skip(self))]
    async fn get_game_details(&self, game_id: i64) -> Result<Option<GameDetails>, AppError> {
        let mut conn = self.pool().acquire().await.map_err(|e| {
            warn!(error = %e, "Failed to acquire database connection");
            database_error(e)
        })?;

        fetch_game_details(&mut conn, game_id).await
    }
}

/// Loads a game with its week and teams over one connection, so a caller
/// inside a transaction sees its own uncommitted result
pub(crate) async fn fetch_game_details(
    conn: &mut PgConnection,
    game_id: i64,
) -> Result<Option<GameDetails>, AppError> {
    let query = format!("SELECT {GAME_COLUMNS} FROM games WHERE id = $1");
    let Some(game) = sqlx::query_as::<_, GameModel>(&query)
        .bind(game_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            warn!(error = %e, game_id, "Failed to fetch game from database");
            database_error(e)
        })?
    else {
        return Ok(None);
    };

    let week = sqlx::query_as::<_, WeekModel>(
        "SELECT id, season_id, number FROM weeks WHERE id = $1",
    )
    .bind(game.week_id)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| {
        warn!(error = %e, week_id = game.week_id, "Failed to fetch week for game");
        database_error(e)
    })?;

    // One round trip for home, away and winner
    let teams = sqlx::query_as::<_, TeamModel>(
        "SELECT id, name, abbreviation FROM teams WHERE id = ANY($1)",
    )
    .bind(GameDetails::team_ids(&game))
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| {
        warn!(error = %e, game_id, "Failed to fetch teams for game");
        database_error(e)
    })?;

    GameDetails::assemble(game, week, &index_by(teams, |team| team.id)).map(Some)
}
