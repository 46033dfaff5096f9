pub mod models;
pub mod repository;

pub use models::{LeagueModel, UserModel};
pub use repository::LeagueRepository;
