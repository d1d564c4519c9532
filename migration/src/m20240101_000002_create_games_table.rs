use sea_orm_migration::prelude::*;

use crate::m20240101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Games::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Games::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Games::UserId).uuid().not_null())
                    .col(ColumnDef::new(Games::SecretWord).string().not_null())
                    .col(ColumnDef::new(Games::RevealedPattern).string().not_null())
                    .col(ColumnDef::new(Games::AttemptsAllowed).integer().not_null())
                    .col(ColumnDef::new(Games::AttemptsRemaining).integer().not_null())
                    // JSON array of {guess, was_miss, message, resulting_pattern}
                    .col(
                        ColumnDef::new(Games::GuessHistory)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(Games::LettersMissed)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Games::IsOver)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Games::IsCancelled)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Games::IsWon)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Games::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Games::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_games_user_id")
                            .from(Games::Table, Games::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Owner lookups replace hierarchical keys
        manager
            .create_index(
                Index::create()
                    .name("idx_games_user_id")
                    .table(Games::Table)
                    .col(Games::UserId)
                    .to_owned(),
            )
            .await?;

        // Open game scans for the average attempts cache
        manager
            .create_index(
                Index::create()
                    .name("idx_games_is_over")
                    .table(Games::Table)
                    .col(Games::IsOver)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Games::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Games {
    Table,
    Id,
    UserId,
    SecretWord,
    RevealedPattern,
    AttemptsAllowed,
    AttemptsRemaining,
    GuessHistory,
    LettersMissed,
    IsOver,
    IsCancelled,
    IsWon,
    CreatedAt,
    UpdatedAt,
}
