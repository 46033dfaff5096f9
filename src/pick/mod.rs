// Public API - what other modules can use
pub use handlers::{get_pick, list_game_picks, submit_pick};
pub use models::{NewPick, OverUnder, PickModel, PickScore};
pub use scorer::{PickScorer, ScoringOutcome};
pub use service::PickService;

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
mod scorer;
pub mod scoring;
mod service;
pub mod types;
