//! Capability trait over the Discord guild.
//!
//! Services talk to Discord only through [`GuildGateway`]. The bot layer provides the
//! serenity-backed implementation; tests use an in-memory fake.

use crate::{error::AppError, model::member::MemberSnapshot};

/// What the bot may do to one member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capability {
    pub manage_roles: bool,
    pub kick_members: bool,
    /// The bot's highest role is above the member's highest role (owners are never
    /// outranked).
    pub outranks_target: bool,
    /// The bot's highest role is above every role it would add or remove.
    pub outranks_managed_roles: bool,
}

impl Capability {
    pub fn can_change_roles(&self) -> bool {
        self.manage_roles && self.outranks_target && self.outranks_managed_roles
    }

    pub fn can_kick(&self) -> bool {
        self.kick_members && self.outranks_target
    }
}

#[serenity::async_trait]
pub trait GuildGateway: Send + Sync {
    /// Every member of the guild.
    async fn members(&self) -> Result<Vec<MemberSnapshot>, AppError>;

    /// A single member, or `None` if they are not in the guild.
    async fn member(&self, user_id: u64) -> Result<Option<MemberSnapshot>, AppError>;

    /// What the bot is allowed to do to `user_id`, considering `managed_roles`.
    async fn capability(&self, user_id: u64, managed_roles: &[u64])
        -> Result<Capability, AppError>;

    /// Adds a role. Adding a role the member already holds succeeds.
    async fn add_role(&self, user_id: u64, role_id: u64, reason: &str) -> Result<(), AppError>;

    /// Removes a role. Removing a role the member lacks succeeds.
    async fn remove_role(&self, user_id: u64, role_id: u64, reason: &str)
        -> Result<(), AppError>;

    async fn kick(&self, user_id: u64, reason: &str) -> Result<(), AppError>;

    async fn send_dm(&self, user_id: u64, content: &str) -> Result<(), AppError>;

    /// Posts plain text into a channel and returns the message id.
    async fn post_message(&self, channel_id: u64, content: &str) -> Result<u64, AppError>;
}
