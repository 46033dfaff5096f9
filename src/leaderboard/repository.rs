use async_trait::async_trait;
use std::collections::BTreeSet;
use tracing::{debug, instrument, warn};

use super::models::{LeaderboardQuery, UserPickTotals};
use crate::shared::AppError;
use crate::store::postgres::database_error;
use crate::store::{group_by, InMemoryStore, PostgresStore};

/// Trait for the read-only standings aggregation
#[async_trait]
pub trait LeaderboardRepository: Send + Sync {
    /// Sums scored picks per qualifying user.
    ///
    /// Without a league filter every user with at least one recorded pick
    /// qualifies; with one, every league member and every user holding a
    /// pick in that league does. Users whose picks all fall outside the
    /// filters are returned with zero totals.
    async fn aggregate(&self, query: &LeaderboardQuery) -> Result<Vec<UserPickTotals>, AppError>;
}

#[async_trait]
impl LeaderboardRepository for InMemoryStore {
    #[instrument(skip(self))]
    async fn aggregate(&self, query: &LeaderboardQuery) -> Result<Vec<UserPickTotals>, AppError> {
        let state = self.read().await;

        let mut qualifying: BTreeSet<i64> = match query.league_id {
            Some(league_id) => state
                .league_members
                .iter()
                .filter(|(league, _)| *league == league_id)
                .map(|(_, user)| *user)
                .collect(),
            None => BTreeSet::new(),
        };
        qualifying.extend(
            state
                .picks
                .values()
                .filter(|pick| query.league_id.map_or(true, |l| pick.league_id == l))
                .map(|pick| pick.user_id),
        );

        let counted = group_by(
            state.picks.values().filter(|pick| {
                query.counts(pick.league_id, state.season_of_game(pick.game_id))
            }),
            |pick| pick.user_id,
        );

        let totals = qualifying
            .into_iter()
            .filter_map(|user_id| {
                let Some(user) = state.users.get(&user_id) else {
                    warn!(user_id, "Pick references unknown user, skipping");
                    return None;
                };
                let picks = counted.get(&user_id).map(Vec::as_slice).unwrap_or_default();
                Some(UserPickTotals {
                    user_id,
                    display_name: user.display_name.clone(),
                    total_points: picks.iter().map(|p| i64::from(p.points_earned)).sum(),
                    correct_picks: picks
                        .iter()
                        .map(|p| {
                            i64::from(p.spread_correct == Some(true))
                                + i64::from(p.over_under_correct == Some(true))
                        })
                        .sum(),
                    games_picked: picks.len() as i64,
                })
            })
            .collect::<Vec<_>>();

        debug!(users = totals.len(), "Aggregated standings in memory");
        Ok(totals)
    }
}

const AGGREGATE_SQL: &str = r#"
SELECT
    u.id AS user_id,
    u.display_name,
    COALESCE(SUM(p.points_earned), 0)::BIGINT AS total_points,
    (COUNT(*) FILTER (WHERE p.spread_correct)
        + COUNT(*) FILTER (WHERE p.over_under_correct))::BIGINT AS correct_picks,
    COUNT(p.id)::BIGINT AS games_picked
FROM users u
LEFT JOIN (
    picks p
    JOIN games g ON g.id = p.game_id
    JOIN weeks w ON w.id = g.week_id
) ON p.user_id = u.id
    AND ($1::BIGINT IS NULL OR w.season_id = $1)
    AND ($2::BIGINT IS NULL OR p.league_id = $2)
WHERE
    ($2::BIGINT IS NULL
        AND EXISTS (SELECT 1 FROM picks ap WHERE ap.user_id = u.id))
    OR ($2::BIGINT IS NOT NULL AND (
        EXISTS (SELECT 1 FROM league_members m WHERE m.league_id = $2 AND m.user_id = u.id)
        OR EXISTS (SELECT 1 FROM picks lp WHERE lp.league_id = $2 AND lp.user_id = u.id)))
GROUP BY u.id, u.display_name
ORDER BY total_points DESC, u.id ASC
"#;

#[async_trait]
impl LeaderboardRepository for PostgresStore {
    #[instrument(skip(self))]
    async fn aggregate(&self, query: &LeaderboardQuery) -> Result<Vec<UserPickTotals>, AppError> {
        let totals = sqlx::query_as::<_, UserPickTotals>(AGGREGATE_SQL)
            .bind(query.season_id)
            .bind(query.league_id)
            .fetch_all(self.pool())
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to aggregate standings");
                database_error(e)
            })?;

        debug!(users = totals.len(), "Aggregated standings in database");
        Ok(totals)
    }
}
