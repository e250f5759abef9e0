use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CleanupActions::Table)
                    .if_not_exists()
                    .col(pk_auto(CleanupActions::Id))
                    .col(string(CleanupActions::UserId))
                    .col(string(CleanupActions::Action))
                    .col(string_null(CleanupActions::AdminId))
                    .col(text(CleanupActions::Reason))
                    .col(
                        timestamp(CleanupActions::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cleanup_actions_user_id")
                    .table(CleanupActions::Table)
                    .col(CleanupActions::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_cleanup_actions_user_id")
                    .table(CleanupActions::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(CleanupActions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum CleanupActions {
    Table,
    Id,
    UserId,
    Action,
    AdminId,
    Reason,
    CreatedAt,
}
