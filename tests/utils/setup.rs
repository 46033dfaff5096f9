#![allow(dead_code)] // Not every suite uses every helper

use axum::Router;
use chrono::{Duration, Utc};
use std::sync::Arc;

use pickem::{
    build_router,
    game::models::{GameModel, TeamModel, WeekModel},
    league::{LeagueModel, UserModel},
    pick::{OverUnder, PickModel},
    AppState, FinalizePolicy, InMemoryStore, ResultFinalizer,
};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub const LEAGUE_ID: i64 = 1;

pub const DAL: i64 = 1;
pub const PHI: i64 = 2;
pub const KC: i64 = 3;
pub const BUF: i64 = 4;

/// Week ids seeded by the builder; each week belongs to the season of the
/// same number
pub const SEASON_ONE_WEEK: i64 = 1;
pub const SEASON_TWO_WEEK: i64 = 2;

pub struct TestSetup {
    pub store: Arc<InMemoryStore>,
    pub policy: FinalizePolicy,
}

pub struct TestSetupBuilder {
    users: Vec<(i64, String)>,
    policy: FinalizePolicy,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            users: vec![],
            policy: FinalizePolicy::default(),
        }
    }

    /// Users are created and joined to the seeded league
    pub fn with_users(mut self, users: Vec<(i64, &str)>) -> Self {
        self.users = users
            .into_iter()
            .map(|(id, name)| (id, name.to_string()))
            .collect();
        self
    }

    pub fn with_two_users(self) -> Self {
        self.with_users(vec![(1, "alice"), (2, "bob")])
    }

    pub fn with_corrections_allowed(mut self) -> Self {
        self.policy = FinalizePolicy {
            allow_corrections: true,
        };
        self
    }

    pub async fn build(self) -> TestSetup {
        let store = Arc::new(InMemoryStore::new());

        for (id, abbreviation, name) in [
            (DAL, "DAL", "Dallas"),
            (PHI, "PHI", "Philadelphia"),
            (KC, "KC", "Kansas City"),
            (BUF, "BUF", "Buffalo"),
        ] {
            store
                .insert_team(TeamModel {
                    id,
                    name: name.to_string(),
                    abbreviation: abbreviation.to_string(),
                })
                .await;
        }

        for (id, season_id) in [(SEASON_ONE_WEEK, 1), (SEASON_TWO_WEEK, 2)] {
            store
                .insert_week(WeekModel {
                    id,
                    season_id,
                    number: 1,
                })
                .await;
        }

        store
            .insert_league(LeagueModel {
                id: LEAGUE_ID,
                name: "Office Pool".to_string(),
            })
            .await;

        for (id, display_name) in self.users {
            store.insert_user(UserModel { id, display_name }).await;
            store.add_league_member(LEAGUE_ID, id).await;
        }

        TestSetup {
            store,
            policy: self.policy,
        }
    }
}

impl TestSetup {
    /// Seeds a game that kicked off yesterday and has no result yet
    pub async fn add_game(
        &self,
        id: i64,
        week_id: i64,
        (home_team_id, away_team_id): (i64, i64),
        total: f64,
    ) {
        self.store
            .insert_game(GameModel {
                id,
                week_id,
                home_team_id,
                away_team_id,
                game_time: Utc::now() - Duration::days(1),
                home_spread: -3.5,
                total,
                is_final: false,
                home_score: None,
                away_score: None,
                winner_team_id: None,
            })
            .await;
    }

    pub async fn add_pick(
        &self,
        id: i64,
        user_id: i64,
        game_id: i64,
        picked_team_id: i64,
        side: OverUnder,
    ) {
        self.store
            .insert_pick(PickModel {
                id,
                league_id: LEAGUE_ID,
                user_id,
                game_id,
                picked_team_id,
                picked_over_under: side.to_string(),
                confidence: None,
                spread_correct: None,
                over_under_correct: None,
                points_earned: 0,
            })
            .await;
    }

    pub fn finalizer(&self) -> ResultFinalizer {
        ResultFinalizer::new(self.store.clone(), self.policy)
    }

    pub fn app(&self) -> Router {
        build_router(AppState::from_store(self.store.clone(), self.policy))
    }
}
