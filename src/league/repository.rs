use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use super::models::LeagueModel;
use crate::shared::AppError;
use crate::store::postgres::database_error;
use crate::store::{InMemoryStore, PostgresStore};

/// Trait for league and membership lookups
///
/// League administration lives elsewhere; the scoring service only needs to
/// know which leagues exist and who belongs to them.
#[async_trait]
pub trait LeagueRepository: Send + Sync {
    async fn get_league(&self, league_id: i64) -> Result<Option<LeagueModel>, AppError>;
    async fn is_member(&self, league_id: i64, user_id: i64) -> Result<bool, AppError>;
}

#[async_trait]
impl LeagueRepository for InMemoryStore {
    #[instrument(skip(self))]
    async fn get_league(&self, league_id: i64) -> Result<Option<LeagueModel>, AppError> {
        debug!(league_id, "Fetching league from memory");
        Ok(self.read().await.leagues.get(&league_id).cloned())
    }

    #[instrument(skip(self))]
    async fn is_member(&self, league_id: i64, user_id: i64) -> Result<bool, AppError> {
        Ok(self
            .read()
            .await
            .league_members
            .contains(&(league_id, user_id)))
    }
}

#[async_trait]
impl LeagueRepository for PostgresStore {
    #[instrument(skip(self))]
    async fn get_league(&self, league_id: i64) -> Result<Option<LeagueModel>, AppError> {
        debug!(league_id, "Fetching league from database");

        sqlx::query_as::<_, LeagueModel>("SELECT id, name FROM leagues WHERE id = $1")
            .bind(league_id)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| {
                warn!(error = %e, league_id, "Failed to fetch league from database");
                database_error(e)
            })
    }

    #[instrument(skip(self))]
    async fn is_member(&self, league_id: i64, user_id: i64) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM league_members WHERE league_id = $1 AND user_id = $2)",
        )
        .bind(league_id)
        .bind(user_id)
        .fetch_one(self.pool())
        .await
        .map_err(|e| {
            warn!(error = %e, league_id, user_id, "Failed to check league membership");
            database_error(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn membership_is_scoped_to_league() {
        let store = InMemoryStore::new();
        store
            .insert_league(LeagueModel {
                id: 1,
                name: "Office".into(),
            })
            .await;
        store.add_league_member(1, 42).await;

        assert!(store.is_member(1, 42).await.unwrap());
        assert!(!store.is_member(2, 42).await.unwrap());
        assert!(!store.is_member(1, 43).await.unwrap());
        assert_eq!(store.get_league(1).await.unwrap().unwrap().name, "Office");
        assert!(store.get_league(2).await.unwrap().is_none());
    }
}
