//! Key/value bot settings repository.

use chrono::{DateTime, Utc};
use migration::OnConflict;
use sea_orm::{ActiveValue, DatabaseConnection, EntityTrait};

use crate::error::AppError;

/// Key under which the completion time of the last sweep is stored.
pub const LAST_SWEEP_AT: &str = "last_sweep_at";

pub struct BotSettingRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> BotSettingRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets the value stored under `key`.
    ///
    /// # Returns
    /// - `Ok(Some(String))` - The stored value
    /// - `Ok(None)` - Nothing stored under `key`
    /// - `Err(AppError::DbErr)` - Database error during query
    pub async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let entity = entity::prelude::BotSetting::find_by_id(key.to_string())
            .one(self.db)
            .await?;

        Ok(entity.map(|setting| setting.value))
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub async fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        use entity::bot_setting::Column;

        entity::prelude::BotSetting::insert(entity::bot_setting::ActiveModel {
            key: ActiveValue::Set(key.to_string()),
            value: ActiveValue::Set(value.to_string()),
            updated_at: ActiveValue::Set(Utc::now()),
        })
        .on_conflict(
            OnConflict::column(Column::Key)
                .update_columns([Column::Value, Column::UpdatedAt])
                .to_owned(),
        )
        .exec(self.db)
        .await?;

        Ok(())
    }

    /// Gets the last sweep time; an unparsable value is treated as absent.
    pub async fn get_last_sweep_at(&self) -> Result<Option<DateTime<Utc>>, AppError> {
        let value = self.get(LAST_SWEEP_AT).await?;

        Ok(value
            .and_then(|v| DateTime::parse_from_rfc3339(&v).ok())
            .map(|dt| dt.with_timezone(&Utc)))
    }

    pub async fn set_last_sweep_at(&self, at: DateTime<Utc>) -> Result<(), AppError> {
        self.set(LAST_SWEEP_AT, &at.to_rfc3339()).await
    }
}
