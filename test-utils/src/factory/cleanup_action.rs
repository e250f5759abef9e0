//! Cleanup action factory for creating audit log rows.

use crate::factory::helpers::next_id;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating `cleanup_actions` rows.
pub struct CleanupActionFactory<'a> {
    db: &'a DatabaseConnection,
    user_id: u64,
    action: String,
    admin_id: Option<u64>,
    reason: String,
    created_at: DateTime<Utc>,
}

impl<'a> CleanupActionFactory<'a> {
    /// Creates a new factory with default values.
    ///
    /// Defaults:
    /// - user_id: auto-incremented
    /// - action: `"keep"`
    /// - admin_id: `None`
    /// - reason: `"test action"`
    /// - created_at: now
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            user_id: next_id(),
            action: "keep".to_string(),
            admin_id: None,
            reason: "test action".to_string(),
            created_at: Utc::now(),
        }
    }

    /// Sets the target user id.
    pub fn user_id(mut self, user_id: u64) -> Self {
        self.user_id = user_id;
        self
    }

    /// Sets the action name.
    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }

    /// Sets the admin responsible for the action.
    pub fn admin_id(mut self, admin_id: u64) -> Self {
        self.admin_id = Some(admin_id);
        self
    }

    /// Sets the creation timestamp.
    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Builds and inserts the row.
    pub async fn build(self) -> Result<entity::cleanup_action::Model, DbErr> {
        entity::cleanup_action::ActiveModel {
            id: ActiveValue::NotSet,
            user_id: ActiveValue::Set(self.user_id.to_string()),
            action: ActiveValue::Set(self.action),
            admin_id: ActiveValue::Set(self.admin_id.map(|id| id.to_string())),
            reason: ActiveValue::Set(self.reason),
            created_at: ActiveValue::Set(self.created_at),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a `cleanup_actions` row for `user_id` with default values.
pub async fn create_cleanup_action(
    db: &DatabaseConnection,
    user_id: u64,
) -> Result<entity::cleanup_action::Model, DbErr> {
    CleanupActionFactory::new(db).user_id(user_id).build().await
}
