// Public API - what other modules can use
pub use handlers::get_leaderboard;
pub use models::{win_percentage, LeaderboardEntry, LeaderboardQuery, UserPickTotals};
pub use service::LeaderboardService;

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
mod service;
