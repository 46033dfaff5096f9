#![allow(dead_code)] // Not every suite uses every helper

use async_trait::async_trait;
use std::sync::Arc;

use pickem::{
    game::models::{GameDetails, GameModel},
    pick::PickModel,
    AppError, InMemoryStore, ScoringStore, ScoringTransaction,
};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Store that behaves like the in-memory one but fails the Nth pick write
/// of every transaction it opens
pub struct FailingPickStore {
    inner: Arc<InMemoryStore>,
    fail_on_write: usize,
}

impl FailingPickStore {
    /// `fail_on_write` is one-based
    pub fn new(inner: Arc<InMemoryStore>, fail_on_write: usize) -> Self {
        Self {
            inner,
            fail_on_write,
        }
    }
}

#[async_trait]
impl ScoringStore for FailingPickStore {
    async fn begin(&self) -> Result<Box<dyn ScoringTransaction>, AppError> {
        let inner = self.inner.begin().await?;
        Ok(Box::new(FailingPickTransaction {
            inner,
            writes: 0,
            fail_on_write: self.fail_on_write,
        }))
    }
}

struct FailingPickTransaction {
    inner: Box<dyn ScoringTransaction>,
    writes: usize,
    fail_on_write: usize,
}

#[async_trait]
impl ScoringTransaction for FailingPickTransaction {
    async fn game_for_update(&mut self, game_id: i64) -> Result<Option<GameModel>, AppError> {
        self.inner.game_for_update(game_id).await
    }

    async fn update_game_result(&mut self, game: &GameModel) -> Result<(), AppError> {
        self.inner.update_game_result(game).await
    }

    async fn picks_for_game(&mut self, game_id: i64) -> Result<Vec<PickModel>, AppError> {
        self.inner.picks_for_game(game_id).await
    }

    async fn update_pick_score(&mut self, pick: &PickModel) -> Result<(), AppError> {
        self.writes += 1;
        if self.writes == self.fail_on_write {
            return Err(AppError::DatabaseError(format!(
                "simulated failure writing pick {}",
                pick.id
            )));
        }
        self.inner.update_pick_score(pick).await
    }

    async fn game_details(&mut self, game_id: i64) -> Result<Option<GameDetails>, AppError> {
        self.inner.game_details(game_id).await
    }

    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        self.inner.commit().await
    }

    async fn rollback(self: Box<Self>) -> Result<(), AppError> {
        self.inner.rollback().await
    }
}
