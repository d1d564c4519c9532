use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, thiserror::Error)]
#[ts(export)]
pub enum GameError {
    #[error("attempts must be at least 1, got {attempts}")]
    InvalidConfig { attempts: i32 },
    #[error("Game already over!")]
    GameAlreadyOver,
    #[error("must guess a character or word")]
    EmptyGuess,
    #[error("Game not found!")]
    GameNotFound { game_id: String },
    #[error("A User with that name does not exist!")]
    UserNotFound { user_name: String },
    #[error("A User name must not be empty!")]
    InvalidUserName,
    #[error("A User with that name already exists!")]
    UserAlreadyExists { user_name: String },
}
