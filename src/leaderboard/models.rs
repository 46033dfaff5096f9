use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Optional filters narrowing which picks count toward standings
///
/// GET /leaderboard?season_id=&league_id=
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct LeaderboardQuery {
    pub season_id: Option<i64>,
    pub league_id: Option<i64>,
}

impl LeaderboardQuery {
    /// Whether a pick in `league_id`, on a game from `season_id`, counts
    pub fn counts(&self, league_id: i64, season_id: Option<i64>) -> bool {
        let league_matches = self.league_id.map_or(true, |league| league == league_id);
        let season_matches = match self.season_id {
            Some(season) => season_id == Some(season),
            None => true,
        };
        league_matches && season_matches
    }
}

/// Raw per-user sums produced by the store
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct UserPickTotals {
    pub user_id: i64,
    pub display_name: String,
    pub total_points: i64,
    pub correct_picks: i64, // Correct spread halves plus correct over/under halves
    pub games_picked: i64,
}

/// One ranked row of the standings, computed fresh for every request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user_id: i64,
    pub display_name: String,
    pub total_points: i64,
    pub correct_picks: i64,
    pub games_picked: i64,
    pub win_pct: f64,
}

impl From<UserPickTotals> for LeaderboardEntry {
    fn from(totals: UserPickTotals) -> Self {
        Self {
            win_pct: win_percentage(totals.total_points, totals.games_picked),
            user_id: totals.user_id,
            display_name: totals.display_name,
            total_points: totals.total_points,
            correct_picks: totals.correct_picks,
            games_picked: totals.games_picked,
        }
    }
}

/// Share of available points earned; each game is worth two.
pub fn win_percentage(total_points: i64, games_picked: i64) -> f64 {
    if games_picked <= 0 {
        return 0.0;
    }
    total_points as f64 / (games_picked * 2) as f64
}
