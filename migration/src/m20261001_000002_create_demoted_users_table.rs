use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DemotedUsers::Table)
                    .if_not_exists()
                    .col(string(DemotedUsers::UserId).primary_key())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DemotedUsers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum DemotedUsers {
    Table,
    UserId,
}
