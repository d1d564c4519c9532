use anyhow::{Context, Result};
use sea_orm::{
    ActiveValue::{NotSet, Set},
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::entities::{prelude::*, scores};
use game_types::{ScoreRecord, UserId};

/// Append-only ledger of finished games
pub struct ScoreRepository<C = DatabaseConnection>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> ScoreRepository<C>
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

    fn model_to_score(model: scores::Model) -> ScoreRecord {
        ScoreRecord {
            user_id: model.user_id,
            date: model.date.format("%Y-%m-%d").to_string(),
            won: model.won,
            misses: model.misses,
        }
    }

    pub async fn append(&self, score: &ScoreRecord) -> Result<()> {
        let date = chrono::NaiveDate::parse_from_str(&score.date, "%Y-%m-%d")
            .with_context(|| format!("Invalid score date: {}", score.date))?;

        let score_model = scores::ActiveModel {
            id: NotSet,
            user_id: Set(score.user_id),
            date: Set(date),
            won: Set(score.won),
            misses: Set(score.misses),
        };

        Scores::insert(score_model).exec(&self.conn).await?;
        Ok(())
    }

    pub async fn all(&self) -> Result<Vec<ScoreRecord>> {
        let scores = Scores::find()
            .order_by_asc(scores::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(scores.into_iter().map(Self::model_to_score).collect())
    }

    pub async fn by_owner(&self, user_id: UserId) -> Result<Vec<ScoreRecord>> {
        let scores = Scores::find()
            .filter(scores::Column::UserId.eq(user_id))
            .order_by_asc(scores::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(scores.into_iter().map(Self::model_to_score).collect())
    }

    /// Fewest misses first; equal misses keep insertion order
    pub async fn top_n(&self, limit: u64) -> Result<Vec<ScoreRecord>> {
        let scores = Scores::find()
            .order_by_asc(scores::Column::Misses)
            .order_by_asc(scores::Column::Id)
            .limit(limit)
            .all(&self.conn)
            .await?;

        Ok(scores.into_iter().map(Self::model_to_score).collect())
    }
}
