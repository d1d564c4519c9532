use anyhow::Result;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use tracing::debug;
use uuid::Uuid;

use crate::entities::{prelude::*, users};
use game_types::User;

pub struct UserRepository<C = DatabaseConnection>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> UserRepository<C>
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

    fn model_to_user(model: users::Model) -> User {
        User {
            id: model.id,
            name: model.name,
            email: model.email,
            win_percentage: model.win_percentage,
            average_misses: model.average_misses,
            created_at: model.created_at.to_rfc3339(),
        }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user_model = Users::find_by_id(id).one(&self.conn).await?;
        Ok(user_model.map(Self::model_to_user))
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<User>> {
        let user_model = Users::find()
            .filter(users::Column::Name.eq(name))
            .one(&self.conn)
            .await?;

        Ok(user_model.map(Self::model_to_user))
    }

    pub async fn create_user(&self, name: &str, email: Option<String>) -> Result<User> {
        let now: chrono::DateTime<chrono::FixedOffset> = chrono::Utc::now().into();

        let user_model = users::ActiveModel {
            id: sea_orm::ActiveValue::Set(Uuid::new_v4()),
            name: sea_orm::ActiveValue::Set(name.to_string()),
            email: sea_orm::ActiveValue::Set(email),
            win_percentage: sea_orm::ActiveValue::Set(0.0),
            average_misses: sea_orm::ActiveValue::Set(0.0),
            created_at: sea_orm::ActiveValue::Set(now),
            updated_at: sea_orm::ActiveValue::Set(now),
        };

        let saved_model = Users::insert(user_model).exec(&self.conn).await?;

        // Fetch the created user
        let created_user = Users::find_by_id(saved_model.last_insert_id)
            .one(&self.conn)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve created user"))?;

        debug!("Created user {}", created_user.name);
        Ok(Self::model_to_user(created_user))
    }

    pub async fn all_users(&self) -> Result<Vec<User>> {
        let users = Users::find()
            .order_by_asc(users::Column::CreatedAt)
            .all(&self.conn)
            .await?;

        Ok(users.into_iter().map(Self::model_to_user).collect())
    }

    /// Users that can receive reminders
    pub async fn users_with_email(&self) -> Result<Vec<User>> {
        let users = Users::find()
            .filter(users::Column::Email.is_not_null())
            .filter(users::Column::Email.ne(""))
            .order_by_asc(users::Column::Name)
            .all(&self.conn)
            .await?;

        Ok(users.into_iter().map(Self::model_to_user).collect())
    }

    /// Persist recomputed win percentage and average misses
    pub async fn save_stats(&self, user: &User) -> Result<()> {
        let updated_user = users::ActiveModel {
            id: sea_orm::ActiveValue::Unchanged(user.id),
            win_percentage: sea_orm::ActiveValue::Set(user.win_percentage),
            average_misses: sea_orm::ActiveValue::Set(user.average_misses),
            updated_at: sea_orm::ActiveValue::Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        let result = Users::update(updated_user).exec(&self.conn).await;
        match result {
            Ok(_) => Ok(()),
            Err(sea_orm::DbErr::RecordNotUpdated) => {
                Err(anyhow::anyhow!("User not found: {}", user.id))
            }
            Err(err) => Err(err.into()),
        }
    }
}
