//! Vote history repository.
//!
//! Appends one row per accepted vote registration so decisions can be audited after the
//! session itself is gone.

use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};

use crate::{
    error::AppError,
    model::action::{CreateVoteHistoryParam, VoteHistoryEntry},
};

pub struct VoteHistoryRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> VoteHistoryRepository<'a> {
    /// Creates a new VoteHistoryRepository instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    ///
    /// # Returns
    /// - `VoteHistoryRepository` - New repository instance
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a vote registration.
    ///
    /// # Arguments
    /// - `param` - Session, admin, chosen option and timestamp
    ///
    /// # Returns
    /// - `Ok(VoteHistoryEntry)` - The stored entry
    /// - `Err(AppError::DbErr)` - Database error during insert
    pub async fn create(&self, param: CreateVoteHistoryParam) -> Result<VoteHistoryEntry, AppError> {
        let entity = entity::vote_history::ActiveModel {
            session_key: ActiveValue::Set(param.session_key.to_string()),
            target_user_id: ActiveValue::Set(param.session_key.user_id.to_string()),
            admin_id: ActiveValue::Set(param.admin_id.to_string()),
            option: ActiveValue::Set(param.option.as_str().to_string()),
            cast_at: ActiveValue::Set(param.cast_at),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        VoteHistoryEntry::from_entity(entity)
    }

    /// Gets every vote cast on sessions targeting `user_id`, oldest first.
    pub async fn get_by_target(&self, user_id: u64) -> Result<Vec<VoteHistoryEntry>, AppError> {
        entity::prelude::VoteHistory::find()
            .filter(entity::vote_history::Column::TargetUserId.eq(user_id.to_string()))
            .order_by_asc(entity::vote_history::Column::CastAt)
            .order_by_asc(entity::vote_history::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(VoteHistoryEntry::from_entity)
            .collect()
    }
}
