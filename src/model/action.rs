//! Moderation actions, executor reports and their audit records.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{internal::InternalError, AppError},
    model::vote::{SessionKey, VoteSession},
    util::parse::{parse_optional_u64, parse_u64_from_string},
};

/// An action the executor can apply to a member.
///
/// Vote session options are expressed with the same type, so a resolved decision is
/// directly executable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationAction {
    Kick,
    Demote,
    Promote,
    Keep,
    Review,
}

impl ModerationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kick => "kick",
            Self::Demote => "demote",
            Self::Promote => "promote",
            Self::Keep => "keep",
            Self::Review => "review",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "kick" => Some(Self::Kick),
            "demote" => Some(Self::Demote),
            "promote" => Some(Self::Promote),
            "keep" => Some(Self::Keep),
            "review" => Some(Self::Review),
            _ => None,
        }
    }

    /// Past-tense verb used in notifications.
    pub fn past_tense(&self) -> &'static str {
        match self {
            Self::Kick => "kicked",
            Self::Demote => "demoted",
            Self::Promote => "promoted",
            Self::Keep => "kept",
            Self::Review => "put under review",
        }
    }
}

impl fmt::Display for ModerationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a successfully applied action.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionReport {
    pub action: ModerationAction,
    pub user_id: u64,
    /// `None` for automatic actions.
    pub admin_id: Option<u64>,
    /// Human-readable summary, also posted to the log channel.
    pub message: String,
    /// Sessions closed as a side effect, whose prompts should be disabled.
    pub closed_sessions: Vec<VoteSession>,
}

/// Audit log entry for an applied moderation action.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanupAction {
    pub id: i32,
    pub user_id: u64,
    pub action: ModerationAction,
    pub admin_id: Option<u64>,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

impl CleanupAction {
    /// Converts an entity model to a domain model at the repository boundary.
    ///
    /// # Returns
    /// - `Ok(CleanupAction)` - The converted entry
    /// - `Err(AppError::InternalErr)` - Stored ids or action name failed to parse
    pub fn from_entity(entity: entity::cleanup_action::Model) -> Result<Self, AppError> {
        let action =
            ModerationAction::parse(&entity.action).ok_or_else(|| InternalError::UnknownVariant {
                kind: "moderation action",
                value: entity.action.clone(),
            })?;

        Ok(Self {
            id: entity.id,
            user_id: parse_u64_from_string(entity.user_id)?,
            action,
            admin_id: parse_optional_u64(entity.admin_id)?,
            reason: entity.reason,
            created_at: entity.created_at,
        })
    }
}

/// Parameters for appending an audit log entry.
#[derive(Debug, Clone)]
pub struct CreateCleanupActionParam {
    pub user_id: u64,
    pub action: ModerationAction,
    pub admin_id: Option<u64>,
    pub reason: String,
}

/// One accepted vote registration.
#[derive(Debug, Clone, PartialEq)]
pub struct VoteHistoryEntry {
    pub id: i32,
    pub session_key: String,
    pub target_user_id: u64,
    pub admin_id: u64,
    pub option: String,
    pub cast_at: DateTime<Utc>,
}

impl VoteHistoryEntry {
    pub fn from_entity(entity: entity::vote_history::Model) -> Result<Self, AppError> {
        Ok(Self {
            id: entity.id,
            session_key: entity.session_key,
            target_user_id: parse_u64_from_string(entity.target_user_id)?,
            admin_id: parse_u64_from_string(entity.admin_id)?,
            option: entity.option,
            cast_at: entity.cast_at,
        })
    }
}

/// Parameters for recording a vote registration.
#[derive(Debug, Clone)]
pub struct CreateVoteHistoryParam {
    pub session_key: SessionKey,
    pub admin_id: u64,
    pub option: ModerationAction,
    pub cast_at: DateTime<Utc>,
}
