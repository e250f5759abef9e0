//! User activity factory for creating test ledger rows.

use crate::factory::helpers::next_id;
use chrono::{DateTime, Duration, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating `user_activity` rows with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::factory::user_activity::UserActivityFactory;
///
/// let record = UserActivityFactory::new(&db)
///     .user_id(123456789)
///     .inactive_for_days(16)
///     .build()
///     .await?;
/// ```
pub struct UserActivityFactory<'a> {
    db: &'a DatabaseConnection,
    user_id: u64,
    last_active: DateTime<Utc>,
    first_seen: DateTime<Utc>,
    activity_count: i64,
    status: String,
    current_role_id: Option<String>,
}

impl<'a> UserActivityFactory<'a> {
    /// Creates a new factory with default values.
    ///
    /// Defaults:
    /// - user_id: auto-incremented
    /// - last_active / first_seen: now
    /// - activity_count: `1`
    /// - status: `"active"`
    /// - current_role_id: `None`
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let now = Utc::now();
        Self {
            db,
            user_id: next_id(),
            last_active: now,
            first_seen: now,
            activity_count: 1,
            status: "active".to_string(),
            current_role_id: None,
        }
    }

    /// Sets the Discord user id.
    pub fn user_id(mut self, user_id: u64) -> Self {
        self.user_id = user_id;
        self
    }

    /// Sets the last activity timestamp.
    pub fn last_active(mut self, last_active: DateTime<Utc>) -> Self {
        self.last_active = last_active;
        self
    }

    /// Moves the last activity timestamp `days` into the past.
    pub fn inactive_for_days(mut self, days: i64) -> Self {
        self.last_active = Utc::now() - Duration::days(days);
        if self.first_seen > self.last_active {
            self.first_seen = self.last_active;
        }
        self
    }

    /// Sets the total activity counter.
    pub fn activity_count(mut self, activity_count: i64) -> Self {
        self.activity_count = activity_count;
        self
    }

    /// Sets the status string (`active`, `inactive`, `under_review`, `kicked`).
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Sets the role the member held when last observed.
    pub fn current_role_id(mut self, role_id: u64) -> Self {
        self.current_role_id = Some(role_id.to_string());
        self
    }

    /// Builds and inserts the row.
    ///
    /// # Returns
    /// - `Ok(entity::user_activity::Model)` - Created row
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::user_activity::Model, DbErr> {
        entity::user_activity::ActiveModel {
            user_id: ActiveValue::Set(self.user_id.to_string()),
            last_active: ActiveValue::Set(self.last_active),
            first_seen: ActiveValue::Set(self.first_seen),
            activity_count: ActiveValue::Set(self.activity_count),
            message_count: ActiveValue::Set(self.activity_count),
            voice_count: ActiveValue::Set(0),
            status: ActiveValue::Set(self.status),
            current_role_id: ActiveValue::Set(self.current_role_id),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a `user_activity` row with default values.
pub async fn create_user_activity(
    db: &DatabaseConnection,
) -> Result<entity::user_activity::Model, DbErr> {
    UserActivityFactory::new(db).build().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TestBuilder;
    use entity::prelude::*;
    use sea_orm::EntityTrait;

    #[tokio::test]
    async fn creates_row_with_defaults() -> Result<(), DbErr> {
        let test = TestBuilder::new()
            .with_table(UserActivity)
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();

        let row = create_user_activity(db).await?;

        assert_eq!(row.status, "active");
        assert_eq!(row.activity_count, 1);
        assert!(UserActivity::find_by_id(row.user_id).one(db).await?.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn backdates_last_active() -> Result<(), DbErr> {
        let test = TestBuilder::new()
            .with_table(UserActivity)
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();

        let row = UserActivityFactory::new(db)
            .inactive_for_days(20)
            .build()
            .await?;

        assert!(Utc::now() - row.last_active >= Duration::days(20));
        assert!(row.first_seen <= row.last_active);

        Ok(())
    }
}
