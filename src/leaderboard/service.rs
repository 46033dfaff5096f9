use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    models::{LeaderboardEntry, LeaderboardQuery},
    repository::LeaderboardRepository,
};
use crate::shared::AppError;

/// Service producing ranked standings from already-scored picks
pub struct LeaderboardService {
    repository: Arc<dyn LeaderboardRepository>,
}

impl LeaderboardService {
    pub fn new(repository: Arc<dyn LeaderboardRepository>) -> Self {
        Self { repository }
    }

    /// Ranks users by total points, highest first; equal points fall back
    /// to ascending user id so the order is stable across backends.
    #[instrument(skip(self))]
    pub async fn standings(
        &self,
        query: &LeaderboardQuery,
    ) -> Result<Vec<LeaderboardEntry>, AppError> {
        let mut entries: Vec<LeaderboardEntry> = self
            .repository
            .aggregate(query)
            .await?
            .into_iter()
            .map(LeaderboardEntry::from)
            .collect();

        entries.sort_by(rank_order);

        info!(
            season_id = ?query.season_id,
            league_id = ?query.league_id,
            entries = entries.len(),
            "Standings computed"
        );

        Ok(entries)
    }
}

fn rank_order(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    b.total_points
        .cmp(&a.total_points)
        .then_with(|| a.user_id.cmp(&b.user_id))
}
