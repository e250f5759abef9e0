use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VoteHistory::Table)
                    .if_not_exists()
                    .col(pk_auto(VoteHistory::Id))
                    .col(string(VoteHistory::SessionKey))
                    .col(string(VoteHistory::TargetUserId))
                    .col(string(VoteHistory::AdminId))
                    .col(string(VoteHistory::Option))
                    .col(
                        timestamp(VoteHistory::CastAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // History outlives the activity record a kick deletes, so target ids
        // are indexed rather than constrained.
        manager
            .create_index(
                Index::create()
                    .name("idx_vote_history_target_user_id")
                    .table(VoteHistory::Table)
                    .col(VoteHistory::TargetUserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_vote_history_target_user_id")
                    .table(VoteHistory::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(VoteHistory::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum VoteHistory {
    Table,
    Id,
    SessionKey,
    TargetUserId,
    AdminId,
    Option,
    CastAt,
}
