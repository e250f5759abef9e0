//! Activity ledger records.
//!
//! A record is created the first time a member is observed doing something and tracks
//! when they were last active together with simple per-kind counters.

use chrono::{DateTime, Utc};
use sea_orm::ActiveValue;
use serde::{Deserialize, Serialize};

use crate::{
    error::{internal::InternalError, AppError},
    util::parse::{parse_optional_u64, parse_u64_from_string},
};

/// Days reported for a user the ledger has never observed.
pub const NEVER_SEEN_DAYS: i64 = 999;

/// Membership status tracked alongside activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityStatus {
    Active,
    Inactive,
    UnderReview,
    Kicked,
}

impl ActivityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::UnderReview => "under_review",
            Self::Kicked => "kicked",
        }
    }

    pub fn parse(value: &str) -> Result<Self, AppError> {
        match value {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "under_review" => Ok(Self::UnderReview),
            "kicked" => Ok(Self::Kicked),
            other => Err(InternalError::UnknownVariant {
                kind: "activity status",
                value: other.to_string(),
            }
            .into()),
        }
    }
}

/// What kind of event counted as activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Message,
    Voice,
}

/// Per-user activity bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserActivityRecord {
    pub user_id: u64,
    pub last_active: DateTime<Utc>,
    pub first_seen: DateTime<Utc>,
    pub activity_count: u64,
    #[serde(default)]
    pub message_count: u64,
    #[serde(default)]
    pub voice_count: u64,
    pub status: ActivityStatus,
    #[serde(default)]
    pub current_role_id: Option<u64>,
}

impl UserActivityRecord {
    /// A fresh record for a user first observed at `now`, with no counted activity.
    pub fn new(user_id: u64, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            last_active: now,
            first_seen: now,
            activity_count: 0,
            message_count: 0,
            voice_count: 0,
            status: ActivityStatus::Active,
            current_role_id: None,
        }
    }

    /// Counts one event of `kind` observed at `now`.
    ///
    /// `last_active` never moves backwards, so events delivered out of order cannot make
    /// a member look less active than they are.
    pub fn record(&mut self, kind: ActivityKind, now: DateTime<Utc>) {
        if now > self.last_active {
            self.last_active = now;
        }
        self.activity_count += 1;
        match kind {
            ActivityKind::Message => self.message_count += 1,
            ActivityKind::Voice => self.voice_count += 1,
        }
    }

    /// Whole days between the last activity and `now`, never negative.
    pub fn days_inactive(&self, now: DateTime<Utc>) -> i64 {
        (now - self.last_active).num_days().max(0)
    }

    /// Converts an entity model to a domain model at the repository boundary.
    ///
    /// # Returns
    /// - `Ok(UserActivityRecord)` - The converted record
    /// - `Err(AppError::InternalErr)` - A stored id or status failed to parse
    pub fn from_entity(entity: entity::user_activity::Model) -> Result<Self, AppError> {
        Ok(Self {
            user_id: parse_u64_from_string(entity.user_id)?,
            last_active: entity.last_active,
            first_seen: entity.first_seen,
            activity_count: entity.activity_count.max(0) as u64,
            message_count: entity.message_count.max(0) as u64,
            voice_count: entity.voice_count.max(0) as u64,
            status: ActivityStatus::parse(&entity.status)?,
            current_role_id: parse_optional_u64(entity.current_role_id)?,
        })
    }

    pub fn into_active_model(self) -> entity::user_activity::ActiveModel {
        entity::user_activity::ActiveModel {
            user_id: ActiveValue::Set(self.user_id.to_string()),
            last_active: ActiveValue::Set(self.last_active),
            first_seen: ActiveValue::Set(self.first_seen),
            activity_count: ActiveValue::Set(self.activity_count as i64),
            message_count: ActiveValue::Set(self.message_count as i64),
            voice_count: ActiveValue::Set(self.voice_count as i64),
            status: ActiveValue::Set(self.status.as_str().to_string()),
            current_role_id: ActiveValue::Set(self.current_role_id.map(|id| id.to_string())),
        }
    }
}

/// Why and since when a user is under review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewEntry {
    pub since: DateTime<Utc>,
    pub reason: String,
}
