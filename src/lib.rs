// Library crate for the pick'em scoring service
// This file exposes the public API for the binary and integration tests

pub mod config;
pub mod game;
pub mod leaderboard;
pub mod league;
pub mod pick;
pub mod routes;
pub mod shared;
pub mod store;

// Re-export commonly used types for easier access in tests
pub use config::AppConfig;
pub use game::{FinalizePolicy, GameDetails, GameResultRequest, ResultFinalizer};
pub use leaderboard::{LeaderboardEntry, LeaderboardQuery, LeaderboardService};
pub use pick::{PickScorer, ScoringOutcome};
pub use routes::build_router;
pub use shared::{AppError, AppState};
pub use store::{InMemoryStore, PostgresStore, ScoringStore, ScoringTransaction};
