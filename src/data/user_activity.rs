//! User activity data repository.
//!
//! Provides the `UserActivityRepository` for the `user_activity` table, used when the
//! ledger is stored in SQLite. Generic over the connection so the state store can run it
//! inside a transaction.

use sea_orm::{ConnectionTrait, EntityTrait};

use crate::{error::AppError, model::activity::UserActivityRecord};

/// Rows per INSERT statement, keeping well below SQLite's bound-parameter limit.
pub(crate) const INSERT_CHUNK: usize = 100;

pub struct UserActivityRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> UserActivityRepository<'a, C> {
    /// Creates a new UserActivityRepository instance.
    ///
    /// # Arguments
    /// - `db` - Database connection or open transaction
    ///
    /// # Returns
    /// - `UserActivityRepository` - New repository instance
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Gets every activity record.
    ///
    /// # Returns
    /// - `Ok(Vec<UserActivityRecord>)` - All records
    /// - `Err(AppError::DbErr)` - Database error during query
    /// - `Err(AppError::InternalErr)` - A stored row failed to convert
    pub async fn get_all(&self) -> Result<Vec<UserActivityRecord>, AppError> {
        entity::prelude::UserActivity::find()
            .all(self.db)
            .await?
            .into_iter()
            .map(UserActivityRecord::from_entity)
            .collect()
    }

    /// Replaces the whole table with `records`.
    ///
    /// # Returns
    /// - `Ok(())` - Table now holds exactly `records`
    /// - `Err(AppError::DbErr)` - Database error during delete or insert
    pub async fn replace_all<I>(&self, records: I) -> Result<(), AppError>
    where
        I: IntoIterator<Item = UserActivityRecord>,
    {
        entity::prelude::UserActivity::delete_many()
            .exec(self.db)
            .await?;

        let models: Vec<_> = records
            .into_iter()
            .map(UserActivityRecord::into_active_model)
            .collect();
        for chunk in models.chunks(INSERT_CHUNK) {
            entity::prelude::UserActivity::insert_many(chunk.to_vec())
                .exec(self.db)
                .await?;
        }
        Ok(())
    }
}
