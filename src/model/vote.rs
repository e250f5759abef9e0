//! Admin vote sessions.
//!
//! A session is opened against one member for one [`SessionKind`]. Admins register a
//! single ballot each (re-voting overwrites it) and the session resolves to the plurality
//! option once the number of distinct voters reaches its quorum. Ties go to the option
//! listed first for the kind.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Duration, Utc};
use sea_orm::ActiveValue;
use serde::{Deserialize, Serialize};

use crate::{
    error::{internal::InternalError, AppError},
    model::action::ModerationAction,
    util::parse::{parse_optional_u64, parse_u64_from_string},
};

/// Why a member was flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    /// No roles beyond the implicit everyone role.
    Ghost,
    /// Holds the privileged role but has been inactive too long.
    Demotion,
    /// A demoted member became active again.
    Return,
    /// A demoted member stayed inactive past the review threshold.
    FinalReview,
}

impl SessionKind {
    pub const ALL: [SessionKind; 4] = [
        SessionKind::Ghost,
        SessionKind::Demotion,
        SessionKind::Return,
        SessionKind::FinalReview,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ghost => "ghost",
            Self::Demotion => "demotion",
            Self::Return => "return",
            Self::FinalReview => "final_review",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }

    /// Options offered to voters, in tie-break order.
    pub fn options(&self) -> &'static [ModerationAction] {
        use ModerationAction::*;
        match self {
            Self::Ghost => &[Kick, Keep],
            Self::Demotion => &[Demote, Keep, Review],
            Self::Return => &[Promote, Keep],
            Self::FinalReview => &[Kick, Keep],
        }
    }

    pub fn offers(&self, option: ModerationAction) -> bool {
        self.options().contains(&option)
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies the (at most one) open session of a kind for a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub kind: SessionKind,
    pub user_id: u64,
}

impl SessionKey {
    pub fn new(kind: SessionKind, user_id: u64) -> Self {
        Self { kind, user_id }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.user_id)
    }
}

impl FromStr for SessionKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AppError::BadRequest(format!("Invalid session key '{}'", s));

        let (kind, user) = s.rsplit_once(':').ok_or_else(invalid)?;
        let kind = SessionKind::parse(kind).ok_or_else(invalid)?;
        let user_id = user.parse::<u64>().map_err(|_| invalid())?;

        Ok(Self::new(kind, user_id))
    }
}

/// One admin's current choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    pub admin_id: u64,
    pub option: ModerationAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Open,
    Resolved(ModerationAction),
    Expired,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Resolved(_) => "resolved",
            Self::Expired => "expired",
        }
    }
}

/// Where a session's prompt was posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRef {
    pub channel_id: u64,
    pub message_id: u64,
}

/// Why a vote was not registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    Unauthorized,
    UnknownSession,
    InvalidOption,
    AlreadyResolved,
    Expired,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Unauthorized => "Only admins can vote on cleanup sessions.",
            Self::UnknownSession => "This vote is no longer active.",
            Self::InvalidOption => "That option is not available for this vote.",
            Self::AlreadyResolved => "This vote has already been decided.",
            Self::Expired => "This vote has expired.",
        };
        f.write_str(text)
    }
}

/// Result of casting a vote through the session registry.
#[derive(Debug, Clone, PartialEq)]
pub enum VoteOutcome {
    /// The ballot was stored; the session is still open.
    Recorded { session: VoteSession },
    /// The ballot completed the quorum.
    Resolved {
        decision: ModerationAction,
        session: VoteSession,
    },
    Rejected(RejectReason),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteSession {
    pub kind: SessionKind,
    pub target_user_id: u64,
    pub quorum: usize,
    /// Ballots in first-registration order, at most one per admin.
    pub votes: Vec<Ballot>,
    pub state: SessionState,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub prompt: Option<PromptRef>,
}

impl VoteSession {
    pub fn open(
        kind: SessionKind,
        target_user_id: u64,
        quorum: usize,
        now: DateTime<Utc>,
        timeout: Duration,
    ) -> Self {
        Self {
            kind,
            target_user_id,
            quorum: quorum.max(1),
            votes: Vec::new(),
            state: SessionState::Open,
            created_at: now,
            expires_at: now + timeout,
            prompt: None,
        }
    }

    pub fn key(&self) -> SessionKey {
        SessionKey::new(self.kind, self.target_user_id)
    }

    pub fn is_open(&self) -> bool {
        self.state == SessionState::Open
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn voter_count(&self) -> usize {
        self.votes.len()
    }

    /// Vote count per option, in the kind's option order.
    pub fn tally(&self) -> Vec<(ModerationAction, usize)> {
        self.kind
            .options()
            .iter()
            .map(|option| {
                let count = self
                    .votes
                    .iter()
                    .filter(|ballot| ballot.option == *option)
                    .count();
                (*option, count)
            })
            .collect()
    }

    /// The plurality option so far; ties go to the earlier option of the kind.
    pub fn leading_option(&self) -> ModerationAction {
        let mut tally = self.tally().into_iter();
        let Some(mut best) = tally.next() else {
            return ModerationAction::Keep;
        };
        for candidate in tally {
            if candidate.1 > best.1 {
                best = candidate;
            }
        }
        best.0
    }

    /// Registers `admin_id`'s ballot.
    ///
    /// Authorization is the caller's concern. A re-vote replaces the admin's earlier
    /// ballot without adding a voter.
    ///
    /// # Returns
    /// - `Ok(None)` - Ballot stored, quorum not yet reached
    /// - `Ok(Some(decision))` - Quorum reached, session is now resolved
    /// - `Err(RejectReason)` - Session not open, expired, or option not offered
    pub fn cast(
        &mut self,
        admin_id: u64,
        option: ModerationAction,
        now: DateTime<Utc>,
    ) -> Result<Option<ModerationAction>, RejectReason> {
        match self.state {
            SessionState::Resolved(_) => return Err(RejectReason::AlreadyResolved),
            SessionState::Expired => return Err(RejectReason::Expired),
            SessionState::Open => {}
        }
        if self.is_expired(now) {
            return Err(RejectReason::Expired);
        }
        if !self.kind.offers(option) {
            return Err(RejectReason::InvalidOption);
        }

        match self.votes.iter_mut().find(|b| b.admin_id == admin_id) {
            Some(ballot) => ballot.option = option,
            None => self.votes.push(Ballot { admin_id, option }),
        }

        if self.voter_count() >= self.quorum {
            let decision = self.leading_option();
            self.state = SessionState::Resolved(decision);
            return Ok(Some(decision));
        }

        Ok(None)
    }

    /// Marks an open session as expired. Returns whether the state changed.
    pub fn expire(&mut self) -> bool {
        if self.is_open() {
            self.state = SessionState::Expired;
            true
        } else {
            false
        }
    }

    /// Converts a `polls` row to a domain model at the repository boundary.
    ///
    /// # Returns
    /// - `Ok(VoteSession)` - The converted session
    /// - `Err(AppError::InternalErr)` - Stored kind, state, decision or id failed to parse
    /// - `Err(AppError::JsonErr)` - Stored ballots are not valid JSON
    pub fn from_entity(entity: entity::poll::Model) -> Result<Self, AppError> {
        let kind = SessionKind::parse(&entity.kind).ok_or_else(|| InternalError::UnknownVariant {
            kind: "session kind",
            value: entity.kind.clone(),
        })?;
        let votes: Vec<Ballot> = serde_json::from_str(&entity.votes)?;

        let state = match (entity.state.as_str(), entity.decision.as_deref()) {
            ("open", _) => SessionState::Open,
            ("expired", _) => SessionState::Expired,
            ("resolved", Some(decision)) => SessionState::Resolved(
                ModerationAction::parse(decision).ok_or_else(|| InternalError::UnknownVariant {
                    kind: "moderation action",
                    value: decision.to_string(),
                })?,
            ),
            (other, _) => {
                return Err(InternalError::UnknownVariant {
                    kind: "session state",
                    value: other.to_string(),
                }
                .into())
            }
        };

        let prompt = match (
            parse_optional_u64(entity.channel_id)?,
            parse_optional_u64(entity.message_id)?,
        ) {
            (Some(channel_id), Some(message_id)) => Some(PromptRef {
                channel_id,
                message_id,
            }),
            _ => None,
        };

        Ok(Self {
            kind,
            target_user_id: parse_u64_from_string(entity.target_user_id)?,
            quorum: entity.quorum.max(1) as usize,
            votes,
            state,
            created_at: entity.created_at,
            expires_at: entity.expires_at,
            prompt,
        })
    }

    pub fn into_active_model(self) -> Result<entity::poll::ActiveModel, AppError> {
        let decision = match self.state {
            SessionState::Resolved(decision) => Some(decision.as_str().to_string()),
            _ => None,
        };

        Ok(entity::poll::ActiveModel {
            session_key: ActiveValue::Set(self.key().to_string()),
            target_user_id: ActiveValue::Set(self.target_user_id.to_string()),
            kind: ActiveValue::Set(self.kind.as_str().to_string()),
            quorum: ActiveValue::Set(self.quorum as i32),
            votes: ActiveValue::Set(serde_json::to_string(&self.votes)?),
            state: ActiveValue::Set(self.state.as_str().to_string()),
            decision: ActiveValue::Set(decision),
            channel_id: ActiveValue::Set(self.prompt.map(|p| p.channel_id.to_string())),
            message_id: ActiveValue::Set(self.prompt.map(|p| p.message_id.to_string())),
            created_at: ActiveValue::Set(self.created_at),
            expires_at: ActiveValue::Set(self.expires_at),
        })
    }
}
