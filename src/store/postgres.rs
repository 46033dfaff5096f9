use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, info, instrument, warn};

use super::{ScoringStore, ScoringTransaction};
use crate::game::models::{GameDetails, GameModel};
use crate::game::repository::fetch_game_details;
use crate::pick::models::PickModel;
use crate::shared::AppError;

pub(crate) const GAME_COLUMNS: &str = "id, week_id, home_team_id, away_team_id, game_time, \
     home_spread, total, is_final, home_score, away_score, winner_team_id";

pub(crate) const PICK_COLUMNS: &str = "id, league_id, user_id, game_id, picked_team_id, \
     picked_over_under, confidence, spread_correct, over_under_correct, points_earned";

pub(crate) fn database_error(e: sqlx::Error) -> AppError {
    AppError::DatabaseError(e.to_string())
}

/// PostgreSQL implementation of every repository
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool and optionally applies pending migrations
    #[instrument(skip(database_url))]
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        run_migrations: bool,
    ) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to connect to database");
                database_error(e)
            })?;

        if run_migrations {
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .map_err(|e| {
                    warn!(error = %e, "Failed to run database migrations");
                    AppError::DatabaseError(e.to_string())
                })?;
            info!("Database migrations applied");
        }

        Ok(Self::new(pool))
    }

    pub(crate) fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ScoringStore for PostgresStore {
    #[instrument(skip(self))]
    async fn begin(&self) -> Result<Box<dyn ScoringTransaction>, AppError> {
        let tx = self.pool.begin().await.map_err(|e| {
            warn!(error = %e, "Failed to open database transaction");
            database_error(e)
        })?;
        debug!("Opened database transaction");
        Ok(Box::new(PostgresTransaction { tx }))
    }
}

/// Database transaction; sqlx rolls it back if dropped before commit
pub struct PostgresTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl ScoringTransaction for PostgresTransaction {
    #[instrument(skip(self))]
    async fn game_for_update(&mut self, game_id: i64) -> Result<Option<GameModel>, AppError> {
        let query = format!("SELECT {GAME_COLUMNS} FROM games WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, GameModel>(&query)
            .bind(game_id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| {
                warn!(error = %e, game_id, "Failed to lock game for update");
                database_error(e)
            })
    }

    #[instrument(skip(self, game), fields(game_id = game.id))]
    async fn update_game_result(&mut self, game: &GameModel) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE games SET home_score = $2, away_score = $3, is_final = $4, winner_team_id = $5 WHERE id = $1",
        )
        .bind(game.id)
        .bind(game.home_score)
        .bind(game.away_score)
        .bind(game.is_final)
        .bind(game.winner_team_id)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to update game result");
            database_error(e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Game {} not found", game.id)));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn picks_for_game(&mut self, game_id: i64) -> Result<Vec<PickModel>, AppError> {
        let query = format!("SELECT {PICK_COLUMNS} FROM picks WHERE game_id = $1 ORDER BY id");
        sqlx::query_as::<_, PickModel>(&query)
            .bind(game_id)
            .fetch_all(&mut *self.tx)
            .await
            .map_err(|e| {
                warn!(error = %e, game_id, "Failed to load picks for game");
                database_error(e)
            })
    }

    #[instrument(skip(self, pick), fields(pick_id = pick.id))]
    async fn update_pick_score(&mut self, pick: &PickModel) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE picks SET spread_correct = $2, over_under_correct = $3, points_earned = $4 WHERE id = $1",
        )
        .bind(pick.id)
        .bind(pick.spread_correct)
        .bind(pick.over_under_correct)
        .bind(pick.points_earned)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to update pick score");
            database_error(e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Pick {} not found", pick.id)));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn game_details(&mut self, game_id: i64) -> Result<Option<GameDetails>, AppError> {
        fetch_game_details(&mut *self.tx, game_id).await
    }

    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        self.tx.commit().await.map_err(|e| {
            warn!(error = %e, "Failed to commit database transaction");
            database_error(e)
        })?;
        debug!("Committed database transaction");
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), AppError> {
        self.tx.rollback().await.map_err(|e| {
            warn!(error = %e, "Failed to roll back database transaction");
            database_error(e)
        })?;
        debug!("Rolled back database transaction");
        Ok(())
    }
}
