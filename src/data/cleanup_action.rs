//! Cleanup action audit log repository.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

use crate::{
    error::AppError,
    model::action::{CleanupAction, CreateCleanupActionParam},
};

/// Repository for the append-only `cleanup_actions` audit log.
pub struct CleanupActionRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CleanupActionRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Appends an audit entry stamped with the current time.
    ///
    /// # Returns
    /// - `Ok(CleanupAction)` - The stored entry
    /// - `Err(AppError::DbErr)` - Database error during insert
    pub async fn create(&self, param: CreateCleanupActionParam) -> Result<CleanupAction, AppError> {
        let entity = entity::cleanup_action::ActiveModel {
            user_id: ActiveValue::Set(param.user_id.to_string()),
            action: ActiveValue::Set(param.action.as_str().to_string()),
            admin_id: ActiveValue::Set(param.admin_id.map(|id| id.to_string())),
            reason: ActiveValue::Set(param.reason),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        CleanupAction::from_entity(entity)
    }

    /// Gets every action applied to `user_id`, newest first.
    pub async fn get_by_user(&self, user_id: u64) -> Result<Vec<CleanupAction>, AppError> {
        entity::prelude::CleanupAction::find()
            .filter(entity::cleanup_action::Column::UserId.eq(user_id.to_string()))
            .order_by_desc(entity::cleanup_action::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(CleanupAction::from_entity)
            .collect()
    }

    /// Gets the `limit` most recent actions across all users, newest first.
    pub async fn get_recent(&self, limit: u64) -> Result<Vec<CleanupAction>, AppError> {
        entity::prelude::CleanupAction::find()
            .order_by_desc(entity::cleanup_action::Column::Id)
            .limit(limit)
            .all(self.db)
            .await?
            .into_iter()
            .map(CleanupAction::from_entity)
            .collect()
    }
}
