use sea_orm_migration::prelude::*;

use crate::m20240101_000001_create_users::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .if_not_exists()
                    .table(Token::Table)
                    .col(
                        ColumnDef::new(Token::Key)
                            .string_len(40)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Token::UserId).uuid().not_null().unique_key())
                    .col(ColumnDef::new(Token::CreatedAt).timestamp().not_null())
                    .col(
                        ColumnDef::new(Token::ExpiredAt)
                            .timestamp()
                            .null()
                            .default(None as Option<String>),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tokens_user_id")
                            .from(Token::Table, Token::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .take(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .table(Token::Table)
                    .col(Token::ExpiredAt)
                    .name("idx_tokens_expired_at")
                    .take(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(Token::Table).take())
            .await
    }
}

#[derive(DeriveIden)]
enum Token {
    #[sea_orm(iden = "tokens")]
    Table,
    Key,
    UserId,
    CreatedAt,
    ExpiredAt,
}
