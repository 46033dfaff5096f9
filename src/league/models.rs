use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database model for users table
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct UserModel {
    pub id: i64,
    pub display_name: String,
}

/// Database model for leagues table
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct LeagueModel {
    pub id: i64,
    pub name: String,
}
