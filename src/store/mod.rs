// Public API - what other modules can use
pub use loader::{group_by, index_by};
pub use memory::{InMemoryStore, InMemoryTransaction};
pub use postgres::{PostgresStore, PostgresTransaction};

// Internal modules
mod loader;
mod memory;
pub(crate) mod postgres;

use async_trait::async_trait;

use crate::game::models::{GameDetails, GameModel};
use crate::pick::models::PickModel;
use crate::shared::AppError;

/// A backing store able to open all-or-nothing units of work for finalizing
/// results and scoring picks.
#[async_trait]
pub trait ScoringStore: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn ScoringTransaction>, AppError>;
}

/// Writes staged through a transaction are only visible to other readers
/// after `commit`. Dropping the transaction without committing discards them.
#[async_trait]
pub trait ScoringTransaction: Send {
    /// Loads a game, holding it against concurrent finalization until the
    /// transaction ends.
    async fn game_for_update(&mut self, game_id: i64) -> Result<Option<GameModel>, AppError>;

    async fn update_game_result(&mut self, game: &GameModel) -> Result<(), AppError>;

    /// Loads every pick on a game in one batch, ordered by pick id.
    async fn picks_for_game(&mut self, game_id: i64) -> Result<Vec<PickModel>, AppError>;

    async fn update_pick_score(&mut self, pick: &PickModel) -> Result<(), AppError>;

    /// Loads a game with its week and teams resolved, as this transaction
    /// sees it.
    async fn game_details(&mut self, game_id: i64) -> Result<Option<GameDetails>, AppError>;

    async fn commit(self: Box<Self>) -> Result<(), AppError>;

    async fn rollback(self: Box<Self>) -> Result<(), AppError>;
}
