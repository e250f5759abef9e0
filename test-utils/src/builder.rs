use entity::prelude::*;
use sea_orm::{sea_query::TableCreateStatement, EntityTrait, Schema};

use crate::{context::TestContext, error::TestError};

/// Builder for creating test contexts with customizable database schemas.
///
/// Provides a fluent interface for configuring test environments with in-memory SQLite
/// databases. Use the builder pattern to add entity tables, then call `build()` to
/// create the configured test context.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::builder::TestBuilder;
/// use entity::prelude::{UserActivity, Poll};
///
/// let test = TestBuilder::new()
///     .with_table(UserActivity)
///     .with_table(Poll)
///     .build()
///     .await?;
/// ```
pub struct TestBuilder {
    /// CREATE TABLE statements executed in insertion order during `build()`.
    tables: Vec<TableCreateStatement>,
}

impl TestBuilder {
    /// Creates a new test builder with no tables configured.
    pub fn new() -> Self {
        Self { tables: Vec::new() }
    }

    /// Adds an entity table to the test database schema.
    ///
    /// Generates a CREATE TABLE statement from the provided SeaORM entity using SQLite
    /// backend syntax. The table will be created when `build()` is called.
    ///
    /// # Arguments
    /// - `entity` - SeaORM entity model implementing `EntityTrait` to create table for
    ///
    /// # Returns
    /// - `Self` - Builder instance for method chaining
    pub fn with_table<E: EntityTrait>(mut self, entity: E) -> Self {
        let schema = Schema::new(sea_orm::DbBackend::Sqlite);
        self.tables.push(schema.create_table_from_entity(entity));
        self
    }

    /// Adds the tables backing the tracker state snapshot.
    ///
    /// - UserActivity
    /// - DemotedUser
    /// - UserUnderReview
    /// - Poll
    pub fn with_tracker_tables(self) -> Self {
        self.with_table(UserActivity)
            .with_table(DemotedUser)
            .with_table(UserUnderReview)
            .with_table(Poll)
    }

    /// Adds the append-only history tables and bot settings.
    ///
    /// - VoteHistory
    /// - CleanupAction
    /// - BotSetting
    pub fn with_history_tables(self) -> Self {
        self.with_table(VoteHistory)
            .with_table(CleanupAction)
            .with_table(BotSetting)
    }

    /// Adds every table the bot uses.
    pub fn with_all_tables(self) -> Self {
        self.with_tracker_tables().with_history_tables()
    }

    /// Builds and initializes the test context with configured tables.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Fully initialized test context with database and tables ready
    /// - `Err(TestError::Database)`- Failed to connect to database or create tables
    pub async fn build(self) -> Result<TestContext, TestError> {
        let mut setup = TestContext::new();

        setup.with_tables(self.tables).await?;

        Ok(setup)
    }
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
