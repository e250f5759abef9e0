pub use sea_orm_migration::prelude::*;

mod m20261001_000001_create_user_activity_table;
mod m20261001_000002_create_demoted_users_table;
mod m20261001_000003_create_users_under_review_table;
mod m20261001_000004_create_polls_table;
mod m20261001_000005_create_vote_history_table;
mod m20261001_000006_create_cleanup_actions_table;
mod m20261001_000007_create_bot_settings_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261001_000001_create_user_activity_table::Migration),
            Box::new(m20261001_000002_create_demoted_users_table::Migration),
            Box::new(m20261001_000003_create_users_under_review_table::Migration),
            Box::new(m20261001_000004_create_polls_table::Migration),
            Box::new(m20261001_000005_create_vote_history_table::Migration),
            Box::new(m20261001_000006_create_cleanup_actions_table::Migration),
            Box::new(m20261001_000007_create_bot_settings_table::Migration),
        ]
    }
}
