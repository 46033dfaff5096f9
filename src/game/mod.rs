// Public API - what other modules can use
pub use handlers::{finalize_game_result, get_game, rescore_game};
pub use models::{GameDetails, GameModel, TeamModel, WeekModel};
pub use service::{FinalizePolicy, ResultFinalizer};
pub use types::GameResultRequest;

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;
