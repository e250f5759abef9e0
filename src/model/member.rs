//! Guild member view used by the scanner and executor.

use chrono::{DateTime, Utc};
use serenity::all::Member;

use crate::model::vote::SessionKind;

/// The parts of a guild member the tracker looks at.
///
/// `role_ids` excludes the implicit everyone role, which every member holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSnapshot {
    pub user_id: u64,
    pub display_name: String,
    pub is_bot: bool,
    pub role_ids: Vec<u64>,
    pub joined_at: Option<DateTime<Utc>>,
}

impl MemberSnapshot {
    pub fn from_member(member: &Member) -> Self {
        Self {
            user_id: member.user.id.get(),
            display_name: member.display_name().to_string(),
            is_bot: member.user.bot,
            role_ids: member.roles.iter().map(|role| role.get()).collect(),
            joined_at: member
                .joined_at
                .and_then(|ts| DateTime::from_timestamp(ts.unix_timestamp(), 0)),
        }
    }

    /// Number of roles including the implicit everyone role.
    pub fn role_count(&self) -> usize {
        self.role_ids.len() + 1
    }

    pub fn has_role(&self, role_id: u64) -> bool {
        self.role_ids.contains(&role_id)
    }

    pub fn mention(&self) -> String {
        format!("<@{}>", self.user_id)
    }
}

/// How a sweep classified a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Ghost,
    DemotionCandidate,
    ReviewCandidate,
    Fine,
}

impl Classification {
    /// The session kind a flagged member is put to vote under.
    pub fn session_kind(&self) -> Option<SessionKind> {
        match self {
            Self::Ghost => Some(SessionKind::Ghost),
            Self::DemotionCandidate => Some(SessionKind::Demotion),
            Self::ReviewCandidate => Some(SessionKind::FinalReview),
            Self::Fine => None,
        }
    }
}
