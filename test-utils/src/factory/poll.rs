//! Poll factory for creating persisted vote session rows.

use chrono::{DateTime, Duration, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating `polls` rows.
///
/// Votes are stored as the JSON text the bot writes: an array of
/// `{ "admin_id": .., "option": .. }` objects in registration order.
pub struct PollFactory<'a> {
    db: &'a DatabaseConnection,
    kind: String,
    target_user_id: u64,
    quorum: i32,
    votes: Vec<(u64, String)>,
    state: String,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl<'a> PollFactory<'a> {
    /// Creates a new factory for an open session of `kind` targeting `target_user_id`.
    ///
    /// Defaults:
    /// - quorum: `1`
    /// - votes: none
    /// - state: `"open"`
    /// - expires_at: 24 hours after creation
    pub fn new(db: &'a DatabaseConnection, kind: impl Into<String>, target_user_id: u64) -> Self {
        let now = Utc::now();
        Self {
            db,
            kind: kind.into(),
            target_user_id,
            quorum: 1,
            votes: Vec::new(),
            state: "open".to_string(),
            created_at: now,
            expires_at: now + Duration::hours(24),
        }
    }

    /// Sets the quorum.
    pub fn quorum(mut self, quorum: i32) -> Self {
        self.quorum = quorum;
        self
    }

    /// Adds a registered vote.
    pub fn vote(mut self, admin_id: u64, option: impl Into<String>) -> Self {
        self.votes.push((admin_id, option.into()));
        self
    }

    /// Sets the expiry timestamp.
    pub fn expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = expires_at;
        self
    }

    /// Builds and inserts the row.
    pub async fn build(self) -> Result<entity::poll::Model, DbErr> {
        let votes: Vec<serde_json::Value> = self
            .votes
            .iter()
            .map(|(admin_id, option)| serde_json::json!({ "admin_id": admin_id, "option": option }))
            .collect();

        entity::poll::ActiveModel {
            session_key: ActiveValue::Set(format!("{}:{}", self.kind, self.target_user_id)),
            target_user_id: ActiveValue::Set(self.target_user_id.to_string()),
            kind: ActiveValue::Set(self.kind),
            quorum: ActiveValue::Set(self.quorum),
            votes: ActiveValue::Set(serde_json::Value::Array(votes).to_string()),
            state: ActiveValue::Set(self.state),
            decision: ActiveValue::Set(None),
            channel_id: ActiveValue::Set(None),
            message_id: ActiveValue::Set(None),
            created_at: ActiveValue::Set(self.created_at),
            expires_at: ActiveValue::Set(self.expires_at),
        }
        .insert(self.db)
        .await
    }
}

/// Creates an open `polls` row with default values.
pub async fn create_poll(
    db: &DatabaseConnection,
    kind: &str,
    target_user_id: u64,
) -> Result<entity::poll::Model, DbErr> {
    PollFactory::new(db, kind, target_user_id).build().await
}
