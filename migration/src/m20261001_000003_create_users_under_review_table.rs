use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UsersUnderReview::Table)
                    .if_not_exists()
                    .col(string(UsersUnderReview::UserId).primary_key())
                    .col(timestamp(UsersUnderReview::Since))
                    .col(string(UsersUnderReview::Reason))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UsersUnderReview::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum UsersUnderReview {
    Table,
    UserId,
    Since,
    Reason,
}
