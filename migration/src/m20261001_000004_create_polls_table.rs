use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Polls::Table)
                    .if_not_exists()
                    .col(string(Polls::SessionKey).primary_key())
                    .col(string(Polls::TargetUserId))
                    .col(string(Polls::Kind))
                    .col(integer(Polls::Quorum))
                    .col(text(Polls::Votes))
                    .col(string(Polls::State))
                    .col(string_null(Polls::Decision))
                    .col(string_null(Polls::ChannelId))
                    .col(string_null(Polls::MessageId))
                    .col(timestamp(Polls::CreatedAt))
                    .col(timestamp(Polls::ExpiresAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_polls_target_user_id")
                    .table(Polls::Table)
                    .col(Polls::TargetUserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_polls_target_user_id")
                    .table(Polls::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Polls::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Polls {
    Table,
    SessionKey,
    TargetUserId,
    Kind,
    Quorum,
    Votes,
    State,
    Decision,
    ChannelId,
    MessageId,
    CreatedAt,
    ExpiresAt,
}
