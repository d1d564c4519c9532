use game_types::{
    BLANK, GameError, GameId, GameState, GameStatus, GuessRecord, ScoreRecord, UserId,
};
use tracing::debug;

use crate::WordSource;

pub const DEFAULT_ATTEMPTS: i32 = 6;

/// Result of an accepted guess
#[derive(Debug, Clone, PartialEq)]
pub struct GuessOutcome {
    pub message: String,
    pub was_miss: bool,
    /// Present only when this guess ended the game
    pub score: Option<ScoreRecord>,
}

#[derive(Debug, Clone)]
pub struct Game {
    state: GameState,
}

impl Game {
    /// Start a game with a word drawn from `word_source`.
    pub fn new_game(
        id: GameId,
        owner: UserId,
        attempts_allowed: i32,
        word_source: &dyn WordSource,
    ) -> Result<Self, GameError> {
        if attempts_allowed < 1 {
            return Err(GameError::InvalidConfig {
                attempts: attempts_allowed,
            });
        }
        Self::with_word(id, owner, word_source.pick_word(), attempts_allowed)
    }

    pub fn with_word(
        id: GameId,
        owner: UserId,
        secret_word: String,
        attempts_allowed: i32,
    ) -> Result<Self, GameError> {
        if attempts_allowed < 1 {
            return Err(GameError::InvalidConfig {
                attempts: attempts_allowed,
            });
        }

        let secret_word = secret_word.to_lowercase();
        let state = GameState {
            id,
            user_id: owner,
            revealed_pattern: BLANK.to_string().repeat(secret_word.chars().count()),
            secret_word,
            attempts_allowed,
            attempts_remaining: attempts_allowed,
            guess_history: Vec::new(),
            letters_missed: String::new(),
            status: GameStatus::InProgress,
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        Ok(Self { state })
    }

    /// Wrap a state loaded from storage
    pub fn from_state(state: GameState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn into_state(self) -> GameState {
        self.state
    }

    pub fn id(&self) -> GameId {
        self.state.id
    }

    pub fn status(&self) -> GameStatus {
        self.state.status
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    /// Apply one guess. Single characters are letter guesses, anything
    /// longer is an attempt at the whole word.
    pub fn guess(&mut self, raw_input: &str) -> Result<GuessOutcome, GameError> {
        if self.state.is_over() {
            return Err(GameError::GameAlreadyOver);
        }

        let guess = raw_input.trim().to_lowercase();
        if guess.is_empty() {
            return Err(GameError::EmptyGuess);
        }

        let already_tried = self.state.guess_history.iter().any(|g| g.guess == guess);

        let mut chars = guess.chars();
        let (was_miss, mut message) = match (chars.next(), chars.next()) {
            _ if already_tried => {
                self.consume_attempt();
                (true, format!("You already guessed '{}'!", guess))
            }
            (Some(letter), None) => self.guess_letter(letter),
            _ => self.guess_word(&guess),
        };

        let score = if self.state.revealed_pattern == self.state.secret_word {
            self.state.status = GameStatus::Won;
            message.push_str(" You win!");
            Some(self.score_record())
        } else if self.state.attempts_remaining <= 0 {
            self.state.status = GameStatus::Lost;
            message.push_str(" Game over!");
            Some(self.score_record())
        } else {
            None
        };

        self.state.guess_history.push(GuessRecord {
            guess,
            was_miss,
            message: message.clone(),
            resulting_pattern: self.state.revealed_pattern.clone(),
        });

        debug!(
            "Game {} guess applied: miss={}, remaining={}, status={:?}",
            self.state.id, was_miss, self.state.attempts_remaining, self.state.status
        );

        Ok(GuessOutcome {
            message,
            was_miss,
            score,
        })
    }

    /// Cancel an in-progress game. Over games are left untouched.
    pub fn cancel(&mut self) -> String {
        if self.state.is_over() {
            return match self.state.status {
                GameStatus::Cancelled => "Game was already cancelled!".to_string(),
                _ => "Game already over, it cannot be cancelled!".to_string(),
            };
        }

        self.state.status = GameStatus::Cancelled;
        "Game cancelled!".to_string()
    }

    fn guess_letter(&mut self, letter: char) -> (bool, String) {
        let hit_count = self
            .state
            .secret_word
            .chars()
            .filter(|&c| c == letter)
            .count();

        if hit_count == 0 {
            self.consume_attempt();
            if !self.state.letters_missed.contains(letter) {
                self.state.letters_missed.push(letter);
            }
            return (true, "That letter is not in the word!".to_string());
        }

        self.state.revealed_pattern = self
            .state
            .secret_word
            .chars()
            .zip(self.state.revealed_pattern.chars())
            .map(|(secret, shown)| if secret == letter { secret } else { shown })
            .collect();

        let times = if hit_count == 1 { "time" } else { "times" };
        (
            false,
            format!("That letter is in the word {} {}!", hit_count, times),
        )
    }

    fn guess_word(&mut self, word: &str) -> (bool, String) {
        if word == self.state.secret_word {
            self.state.revealed_pattern = self.state.secret_word.clone();
            (false, "You correctly guessed the whole word!".to_string())
        } else {
            self.consume_attempt();
            (true, "That is not the word!".to_string())
        }
    }

    fn consume_attempt(&mut self) {
        self.state.attempts_remaining = (self.state.attempts_remaining - 1).max(0);
    }

    fn score_record(&self) -> ScoreRecord {
        ScoreRecord {
            user_id: self.state.user_id,
            date: chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string(),
            won: self.state.status == GameStatus::Won,
            misses: self.state.misses(),
        }
    }
}
