use anyhow::{Context, Result};
use sea_orm::{
    ActiveValue::{Set, Unchanged},
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use tracing::debug;

use crate::entities::{games, prelude::*};
use game_types::{GameId, GameState, GameStatus, GuessRecord, UserId};

/// Stores games keyed by id, indexed by owner
pub struct GameRepository<C = DatabaseConnection>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> GameRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }

    /// Give back the connection, e.g. to commit a transaction
    pub fn into_inner(self) -> C {
        self.conn
    }

    fn model_to_state(model: games::Model) -> Result<GameState> {
        let guess_history: Vec<GuessRecord> = serde_json::from_str(&model.guess_history)
            .with_context(|| format!("Corrupt guess history for game {}", model.id))?;

        Ok(GameState {
            id: model.id,
            user_id: model.user_id,
            secret_word: model.secret_word,
            revealed_pattern: model.revealed_pattern,
            attempts_allowed: model.attempts_allowed,
            attempts_remaining: model.attempts_remaining,
            guess_history,
            letters_missed: model.letters_missed,
            status: GameStatus::from_flags(model.is_over, model.is_cancelled, model.is_won),
            created_at: model.created_at.to_rfc3339(),
        })
    }

    fn models_to_states(models: Vec<games::Model>) -> Result<Vec<GameState>> {
        models.into_iter().map(Self::model_to_state).collect()
    }

    /// Insert a new game and return its id
    pub async fn create(&self, game: &GameState) -> Result<GameId> {
        let now: chrono::DateTime<chrono::FixedOffset> = chrono::Utc::now().into();
        let created_at = chrono::DateTime::parse_from_rfc3339(&game.created_at).unwrap_or(now);

        let game_model = games::ActiveModel {
            id: Set(game.id),
            user_id: Set(game.user_id),
            secret_word: Set(game.secret_word.clone()),
            revealed_pattern: Set(game.revealed_pattern.clone()),
            attempts_allowed: Set(game.attempts_allowed),
            attempts_remaining: Set(game.attempts_remaining),
            guess_history: Set(serde_json::to_string(&game.guess_history)?),
            letters_missed: Set(game.letters_missed.clone()),
            is_over: Set(game.is_over()),
            is_cancelled: Set(game.is_cancelled()),
            is_won: Set(game.is_won()),
            created_at: Set(created_at),
            updated_at: Set(now),
        };

        let result = Games::insert(game_model).exec(&self.conn).await?;
        debug!("Created game {} for user {}", result.last_insert_id, game.user_id);
        Ok(result.last_insert_id)
    }

    pub async fn load(&self, id: GameId) -> Result<Option<GameState>> {
        let model = Games::find_by_id(id).one(&self.conn).await?;
        model.map(Self::model_to_state).transpose()
    }

    /// Write back the mutable parts of a game. The secret word and owner
    /// never change after creation.
    pub async fn save(&self, game: &GameState) -> Result<()> {
        let game_model = games::ActiveModel {
            id: Unchanged(game.id),
            revealed_pattern: Set(game.revealed_pattern.clone()),
            attempts_remaining: Set(game.attempts_remaining),
            guess_history: Set(serde_json::to_string(&game.guess_history)?),
            letters_missed: Set(game.letters_missed.clone()),
            is_over: Set(game.is_over()),
            is_cancelled: Set(game.is_cancelled()),
            is_won: Set(game.is_won()),
            updated_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        match Games::update(game_model).exec(&self.conn).await {
            Ok(_) => Ok(()),
            Err(sea_orm::DbErr::RecordNotUpdated) => {
                Err(anyhow::anyhow!("Game not found: {}", game.id))
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn query_by_owner(&self, user_id: UserId) -> Result<Vec<GameState>> {
        let models = Games::find()
            .filter(games::Column::UserId.eq(user_id))
            .order_by_asc(games::Column::CreatedAt)
            .all(&self.conn)
            .await?;

        Self::models_to_states(models)
    }

    pub async fn all_open_games(&self) -> Result<Vec<GameState>> {
        let models = Games::find()
            .filter(games::Column::IsOver.eq(false))
            .all(&self.conn)
            .await?;

        Self::models_to_states(models)
    }
}
