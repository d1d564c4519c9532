use std::collections::HashMap;
use std::sync::Arc;

use game_core::{
    DEFAULT_HIGH_SCORE_LIMIT, Game, WordSource, rank_users, update_stats,
};
use game_persistence::repositories::{GameRepository, ScoreRepository, UserRepository};
use game_types::{
    GameError, GameId, GameState, GuessRecord, SafeGameState, ScoreEntry, ScoreRecord, User,
    UserId, UserRanking,
};
use anyhow::Context;
use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::cache::{AVERAGE_ATTEMPTS_KEY, FactCache};
use crate::jobs;
use crate::notifier::{Notifier, reminder_body};

pub const NEW_GAME_MESSAGE: &str = "Good luck playing Hangman!";
pub const GET_GAME_MESSAGE: &str = "Time to make a move!";

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("storage failure: {0}")]
    Storage(#[from] anyhow::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Loads games, applies moves and persists the results
pub struct HangmanService {
    db: DatabaseConnection,
    users: UserRepository,
    games: Arc<GameRepository>,
    scores: ScoreRepository,
    word_source: Arc<dyn WordSource>,
    cache: Arc<FactCache>,
    default_attempts: i32,
}

impl HangmanService {
    pub fn new(
        db: DatabaseConnection,
        word_source: Arc<dyn WordSource>,
        default_attempts: i32,
    ) -> Self {
        Self {
            users: UserRepository::new(db.clone()),
            games: Arc::new(GameRepository::new(db.clone())),
            scores: ScoreRepository::new(db.clone()),
            db,
            word_source,
            cache: Arc::new(FactCache::new()),
            default_attempts,
        }
    }

    pub async fn create_user(&self, user_name: &str, email: Option<String>) -> ServiceResult<User> {
        let user_name = user_name.trim();
        if user_name.is_empty() {
            return Err(GameError::InvalidUserName.into());
        }

        if self.users.find_by_name(user_name).await?.is_some() {
            return Err(GameError::UserAlreadyExists {
                user_name: user_name.to_string(),
            }
            .into());
        }

        let email = email.map(|e| e.trim().to_string()).filter(|e| !e.is_empty());
        let user = self.users.create_user(user_name, email).await?;
        info!("User {} created", user.name);
        Ok(user)
    }

    pub async fn new_game(
        &self,
        user_name: &str,
        attempts: Option<i32>,
    ) -> ServiceResult<SafeGameState> {
        let user = self.require_user(user_name).await?;
        let attempts = attempts.unwrap_or(self.default_attempts);

        let game = Game::new_game(Uuid::new_v4(), user.id, attempts, self.word_source.as_ref())?;
        let game_id = self.games.create(game.state()).await?;
        info!("Created game {} for {} with {} attempts", game_id, user.name, attempts);

        // Refreshing the display cache is not needed to answer this request
        jobs::spawn_cache_refresh(self.games.clone(), self.cache.clone());

        Ok(SafeGameState::from_state(
            game.state(),
            &user.name,
            NEW_GAME_MESSAGE,
        ))
    }

    pub async fn get_game(&self, game_id: GameId) -> ServiceResult<SafeGameState> {
        let state = self.load_game(game_id).await?;
        self.to_form(&state, GET_GAME_MESSAGE).await
    }

    /// Apply a guess and persist the game, plus its score when the guess
    /// ended it. Over games and empty guesses are answered with a message
    /// and leave the stored game untouched.
    pub async fn make_move(&self, game_id: GameId, guess: &str) -> ServiceResult<SafeGameState> {
        let mut game = Game::from_state(self.load_game(game_id).await?);

        let outcome = match game.guess(guess) {
            Ok(outcome) => outcome,
            Err(err @ (GameError::GameAlreadyOver | GameError::EmptyGuess)) => {
                debug!("Guess on game {} rejected: {}", game_id, err);
                return self.to_form(game.state(), err.to_string()).await;
            }
            Err(err) => return Err(err.into()),
        };

        match &outcome.score {
            Some(score) => {
                self.save_finished_game(game.state(), score).await?;
                info!(
                    "Game {} finished: won={}, misses={}",
                    game_id, score.won, score.misses
                );
            }
            None => self.games.save(game.state()).await?,
        }

        self.to_form(game.state(), outcome.message).await
    }

    pub async fn cancel_game(&self, game_id: GameId) -> ServiceResult<SafeGameState> {
        let mut game = Game::from_state(self.load_game(game_id).await?);
        let was_over = game.is_over();

        let message = game.cancel();
        if !was_over {
            self.games.save(game.state()).await?;
            info!("Game {} cancelled", game_id);
        }

        self.to_form(game.state(), message).await
    }

    pub async fn get_game_history(&self, game_id: GameId) -> ServiceResult<Vec<GuessRecord>> {
        Ok(self.load_game(game_id).await?.guess_history)
    }

    /// Games of a user that can still be played
    pub async fn get_user_games(&self, user_name: &str) -> ServiceResult<Vec<SafeGameState>> {
        let user = self.require_user(user_name).await?;
        let games = self.games.query_by_owner(user.id).await?;

        Ok(games
            .iter()
            .filter(|g| !g.is_over())
            .map(|g| SafeGameState::from_state(g, &user.name, GET_GAME_MESSAGE))
            .collect())
    }

    pub async fn get_scores(&self) -> ServiceResult<Vec<ScoreEntry>> {
        let scores = self.scores.all().await?;
        self.to_score_entries(scores).await
    }

    pub async fn get_user_scores(&self, user_name: &str) -> ServiceResult<Vec<ScoreEntry>> {
        let user = self.require_user(user_name).await?;
        let scores = self.scores.by_owner(user.id).await?;
        self.to_score_entries(scores).await
    }

    pub async fn get_high_scores(&self, limit: Option<u64>) -> ServiceResult<Vec<ScoreEntry>> {
        let limit = limit.unwrap_or(DEFAULT_HIGH_SCORE_LIMIT);
        let scores = self.scores.top_n(limit).await?;
        self.to_score_entries(scores).await
    }

    /// Recompute every user's stats from their games, then rank them
    pub async fn get_user_rankings(&self) -> ServiceResult<Vec<UserRanking>> {
        let mut users = self.users.all_users().await?;

        for user in users.iter_mut() {
            let games = self.games.query_by_owner(user.id).await?;
            if update_stats(user, &games) {
                self.users.save_stats(user).await?;
            }
        }

        Ok(rank_users(users)
            .into_iter()
            .enumerate()
            .map(|(index, user)| UserRanking {
                rank: (index + 1) as u32,
                name: user.name,
                win_percentage: user.win_percentage,
                average_misses: user.average_misses,
            })
            .collect())
    }

    /// Cached display string, empty until the first refresh
    pub async fn average_attempts(&self) -> String {
        self.cache
            .get(AVERAGE_ATTEMPTS_KEY)
            .await
            .unwrap_or_default()
    }

    pub async fn refresh_average_attempts(&self) -> ServiceResult<()> {
        self.cache.refresh_average_attempts(&self.games).await?;
        Ok(())
    }

    /// Remind every user with an email and at least one open game.
    /// Returns how many reminders were handed to the notifier.
    pub async fn send_reminders(&self, notifier: &dyn Notifier) -> ServiceResult<usize> {
        let mut sent = 0;

        for user in self.users.users_with_email().await? {
            let active = self
                .games
                .query_by_owner(user.id)
                .await?
                .iter()
                .filter(|g| !g.is_over())
                .count();
            if active == 0 {
                continue;
            }

            match notifier.remind(&user, &reminder_body(&user, active)).await {
                Ok(()) => sent += 1,
                Err(err) => warn!("Failed to remind {}: {}", user.name, err),
            }
        }

        info!("Sent {} reminders", sent);
        Ok(sent)
    }

    /// The final game state and its score are written together or not at all
    async fn save_finished_game(&self, state: &GameState, score: &ScoreRecord) -> anyhow::Result<()> {
        let txn = self
            .db
            .begin()
            .await
            .context("Failed to begin transaction")?;

        let games = GameRepository::new(txn);
        games.save(state).await?;

        let scores = ScoreRepository::new(games.into_inner());
        scores.append(score).await?;

        scores
            .into_inner()
            .commit()
            .await
            .with_context(|| format!("Failed to commit finished game {}", state.id))?;
        Ok(())
    }

    async fn require_user(&self, user_name: &str) -> ServiceResult<User> {
        self.users
            .find_by_name(user_name.trim())
            .await?
            .ok_or_else(|| {
                GameError::UserNotFound {
                    user_name: user_name.to_string(),
                }
                .into()
            })
    }

    async fn load_game(&self, game_id: GameId) -> ServiceResult<GameState> {
        self.games.load(game_id).await?.ok_or_else(|| {
            GameError::GameNotFound {
                game_id: game_id.to_string(),
            }
            .into()
        })
    }

    async fn to_form(
        &self,
        state: &GameState,
        message: impl Into<String>,
    ) -> ServiceResult<SafeGameState> {
        let owner = self
            .users
            .find_by_id(state.user_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Owner {} of game {} is missing", state.user_id, state.id))?;

        Ok(SafeGameState::from_state(state, &owner.name, message))
    }

    async fn to_score_entries(&self, scores: Vec<ScoreRecord>) -> ServiceResult<Vec<ScoreEntry>> {
        let names: HashMap<UserId, String> = self
            .users
            .all_users()
            .await?
            .into_iter()
            .map(|u| (u.id, u.name))
            .collect();

        Ok(scores
            .into_iter()
            .map(|score| ScoreEntry {
                user_name: names.get(&score.user_id).cloned().unwrap_or_default(),
                date: score.date,
                won: score.won,
                misses: score.misses,
            })
            .collect())
    }
}
