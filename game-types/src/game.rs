use crate::{GameId, UserId};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Character used for unrevealed positions of the secret word.
pub const BLANK: char = '_';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GameStatus {
    InProgress,
    Won,
    Lost,
    Cancelled,
}

impl GameStatus {
    pub fn is_over(&self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }

    /// Rebuild a status from the flags stored alongside a game.
    pub fn from_flags(is_over: bool, is_cancelled: bool, is_won: bool) -> Self {
        match (is_over, is_cancelled, is_won) {
            (_, true, _) => GameStatus::Cancelled,
            (true, false, true) => GameStatus::Won,
            (true, false, false) => GameStatus::Lost,
            (false, false, _) => GameStatus::InProgress,
        }
    }
}

/// One entry in a game's guess history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GuessRecord {
    pub guess: String,
    pub was_miss: bool,
    pub message: String,
    pub resulting_pattern: String,
}

/// Full persisted state of a game, including the secret word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameState {
    pub id: GameId,
    pub user_id: UserId,
    pub secret_word: String,
    pub revealed_pattern: String,
    pub attempts_allowed: i32,
    pub attempts_remaining: i32,
    pub guess_history: Vec<GuessRecord>,
    pub letters_missed: String,
    pub status: GameStatus,
    pub created_at: String, // ISO 8601 string
}

impl GameState {
    pub fn is_over(&self) -> bool {
        self.status.is_over()
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == GameStatus::Cancelled
    }

    pub fn is_won(&self) -> bool {
        self.status == GameStatus::Won
    }

    /// Number of attempts spent so far.
    pub fn misses(&self) -> i32 {
        self.attempts_allowed - self.attempts_remaining
    }
}

/// Safe version of GameState that doesn't expose the secret word
/// Used for HTTP responses
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SafeGameState {
    pub id: GameId,
    pub user_name: String,
    pub revealed_pattern: String,
    pub attempts_remaining: i32,
    pub guesses: Vec<GuessRecord>,
    pub letters_missed: String,
    pub game_over: bool,
    pub cancelled: bool,
    pub won: bool,
    pub message: String,
}

impl SafeGameState {
    pub fn from_state(state: &GameState, user_name: &str, message: impl Into<String>) -> Self {
        SafeGameState {
            id: state.id,
            user_name: user_name.to_string(),
            revealed_pattern: state.revealed_pattern.clone(),
            attempts_remaining: state.attempts_remaining,
            guesses: state.guess_history.clone(),
            letters_missed: state.letters_missed.clone(),
            game_over: state.is_over(),
            cancelled: state.is_cancelled(),
            won: state.is_won(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn sample_state(status: GameStatus) -> GameState {
        GameState {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            secret_word: "boat".to_string(),
            revealed_pattern: "_o__".to_string(),
            attempts_allowed: 6,
            attempts_remaining: 4,
            guess_history: Vec::new(),
            letters_missed: "xz".to_string(),
            status,
            created_at: "2024-01-01T00:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn test_status_flags_roundtrip() {
        for status in [
            GameStatus::InProgress,
            GameStatus::Won,
            GameStatus::Lost,
            GameStatus::Cancelled,
        ] {
            let state = sample_state(status);
            let rebuilt =
                GameStatus::from_flags(state.is_over(), state.is_cancelled(), state.is_won());
            assert_eq!(rebuilt, status);
        }
    }

    #[test]
    fn test_cancelled_flag_wins_over_others() {
        assert_eq!(GameStatus::from_flags(false, true, false), GameStatus::Cancelled);
        assert_eq!(GameStatus::from_flags(true, true, true), GameStatus::Cancelled);
    }

    #[test]
    fn test_safe_state_hides_secret_word() {
        let state = sample_state(GameStatus::InProgress);
        let safe = SafeGameState::from_state(&state, "alice", "Time to make a move!");

        assert!(!format!("{:?}", safe).contains("boat"));
        assert_eq!(safe.revealed_pattern, "_o__");
        assert_eq!(safe.attempts_remaining, 4);
        assert!(!safe.game_over);
        assert_eq!(safe.user_name, "alice");
    }

    #[test]
    fn test_misses_counts_spent_attempts() {
        let state = sample_state(GameStatus::Lost);
        assert_eq!(state.misses(), 2);
    }
}
