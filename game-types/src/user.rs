use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::UserId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Option<String>,
    pub win_percentage: f64,
    pub average_misses: f64,
    pub created_at: String, // ISO 8601 string for simplicity
}

/// Ledger entry written once when a game is won or lost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoreRecord {
    pub user_id: UserId,
    pub date: String, // YYYY-MM-DD
    pub won: bool,
    pub misses: i32,
}
