use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserActivity::Table)
                    .if_not_exists()
                    .col(string(UserActivity::UserId).primary_key())
                    .col(timestamp(UserActivity::LastActive))
                    .col(timestamp(UserActivity::FirstSeen))
                    .col(big_integer(UserActivity::ActivityCount).default(0))
                    .col(big_integer(UserActivity::MessageCount).default(0))
                    .col(big_integer(UserActivity::VoiceCount).default(0))
                    .col(string(UserActivity::Status).default("active"))
                    .col(string_null(UserActivity::CurrentRoleId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_activity_last_active")
                    .table(UserActivity::Table)
                    .col(UserActivity::LastActive)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_user_activity_last_active")
                    .table(UserActivity::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(UserActivity::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum UserActivity {
    Table,
    UserId,
    LastActive,
    FirstSeen,
    ActivityCount,
    MessageCount,
    VoiceCount,
    Status,
    CurrentRoleId,
}
