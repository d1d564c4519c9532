#![allow(dead_code)]

use game_core::{FixedWordSource, Game, RandomWordSource};
use game_types::{GameState, GameStatus};
use uuid::Uuid;

/// Creates a RandomWordSource with a known set of words
pub fn create_test_source() -> RandomWordSource {
    let word_list = "boat\nat\nhangman\ntrouble\nuniversity";
    RandomWordSource::new(word_list).unwrap()
}

/// Creates a game with a specific secret word
pub fn create_game_with_word(word: &str, attempts: i32) -> Game {
    Game::new_game(
        Uuid::new_v4(),
        Uuid::new_v4(),
        attempts,
        &FixedWordSource::new(word),
    )
    .unwrap()
}

/// Creates the standard six-attempt "boat" game
pub fn create_standard_game() -> Game {
    create_game_with_word("boat", 6)
}

/// Feeds every guess in order, ignoring rejections
pub fn play_guesses(game: &mut Game, guesses: &[&str]) {
    for guess in guesses {
        game.guess(guess).ok();
    }
}

/// Asserts the derived flags agree with the status
pub fn assert_game_status(state: &GameState, expected: GameStatus) {
    assert_eq!(
        state.status, expected,
        "Expected status {:?}, got {:?}",
        expected, state.status
    );
    assert_eq!(state.is_over(), expected != GameStatus::InProgress);
    assert_eq!(state.is_won(), expected == GameStatus::Won);
    assert_eq!(state.is_cancelled(), expected == GameStatus::Cancelled);
}

/// Checks the structural invariants every game must hold
pub fn assert_invariants(state: &GameState) {
    assert!(state.attempts_remaining >= 0);
    assert!(state.attempts_remaining <= state.attempts_allowed);
    assert_eq!(
        state.revealed_pattern.chars().count(),
        state.secret_word.chars().count()
    );
    if state.is_won() {
        assert_eq!(state.revealed_pattern, state.secret_word);
    }
}
