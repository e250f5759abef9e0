//! Serenity implementation of [`GuildGateway`].
//!
//! Built per use from the bot's shared HTTP client; it holds no state of its own.

use std::sync::Arc;

use serenity::{
    all::{ChannelId, CreateMessage, GuildId, Permissions, Role, RoleId, UserId},
    http::Http,
};

use crate::{
    error::AppError,
    model::member::MemberSnapshot,
    service::gateway::{Capability, GuildGateway},
};

/// Largest page Discord returns from the list-members endpoint.
const MEMBER_PAGE_SIZE: u64 = 1000;

pub struct SerenityGateway {
    http: Arc<Http>,
    guild_id: GuildId,
}

impl SerenityGateway {
    /// Creates a new SerenityGateway.
    ///
    /// # Arguments
    /// - `http` - Discord HTTP client shared with the rest of the bot
    /// - `guild_id` - The guild being moderated
    pub fn new(http: Arc<Http>, guild_id: u64) -> Self {
        Self {
            http,
            guild_id: GuildId::new(guild_id),
        }
    }
}

#[serenity::async_trait]
impl GuildGateway for SerenityGateway {
    async fn members(&self) -> Result<Vec<MemberSnapshot>, AppError> {
        let mut members = Vec::new();
        let mut after = None;

        loop {
            let page = self
                .http
                .get_guild_members(self.guild_id, Some(MEMBER_PAGE_SIZE), after)
                .await?;
            let page_len = page.len() as u64;

            after = page.last().map(|member| member.user.id.get());
            members.extend(page.iter().map(MemberSnapshot::from_member));

            if page_len < MEMBER_PAGE_SIZE {
                break;
            }
        }

        tracing::debug!("Fetched {} members of guild {}", members.len(), self.guild_id);
        Ok(members)
    }

    async fn member(&self, user_id: u64) -> Result<Option<MemberSnapshot>, AppError> {
        match self.http.get_member(self.guild_id, UserId::new(user_id)).await {
            Ok(member) => Ok(Some(MemberSnapshot::from_member(&member))),
            Err(e) => match AppError::from(e) {
                AppError::NotFound(_) => Ok(None),
                err => Err(err),
            },
        }
    }

    async fn capability(
        &self,
        user_id: u64,
        managed_roles: &[u64],
    ) -> Result<Capability, AppError> {
        let roles = self.http.get_guild_roles(self.guild_id).await?;
        let guild = self.http.get_guild(self.guild_id).await?;

        let bot_id = self.http.get_current_user().await?.id;
        let bot = self.http.get_member(self.guild_id, bot_id).await?;
        let bot_roles: Vec<u64> = bot.roles.iter().map(|role| role.get()).collect();

        let target_roles = self
            .member(user_id)
            .await?
            .map(|member| member.role_ids)
            .unwrap_or_default();

        Ok(compute_capability(
            &roles,
            self.guild_id.get(),
            &bot_roles,
            &target_roles,
            guild.owner_id.get() == user_id,
            managed_roles,
        ))
    }

    async fn add_role(&self, user_id: u64, role_id: u64, reason: &str) -> Result<(), AppError> {
        self.http
            .add_member_role(
                self.guild_id,
                UserId::new(user_id),
                RoleId::new(role_id),
                Some(reason),
            )
            .await?;
        Ok(())
    }

    async fn remove_role(
        &self,
        user_id: u64,
        role_id: u64,
        reason: &str,
    ) -> Result<(), AppError> {
        self.http
            .remove_member_role(
                self.guild_id,
                UserId::new(user_id),
                RoleId::new(role_id),
                Some(reason),
            )
            .await?;
        Ok(())
    }

    async fn kick(&self, user_id: u64, reason: &str) -> Result<(), AppError> {
        self.http
            .kick_member(self.guild_id, UserId::new(user_id), Some(reason))
            .await?;
        Ok(())
    }

    async fn send_dm(&self, user_id: u64, content: &str) -> Result<(), AppError> {
        UserId::new(user_id)
            .direct_message(&self.http, CreateMessage::new().content(content))
            .await?;
        Ok(())
    }

    async fn post_message(&self, channel_id: u64, content: &str) -> Result<u64, AppError> {
        let message = ChannelId::new(channel_id)
            .send_message(&self.http, CreateMessage::new().content(content))
            .await?;
        Ok(message.id.get())
    }
}

/// Works out what the bot may do to a member from the guild's role list.
///
/// Guild permissions are the everyone role (whose id equals the guild id) combined with
/// every role the bot holds; Administrator grants everything. Hierarchy compares the
/// highest role positions, and the guild owner is never outranked.
///
/// # Arguments
/// - `roles` - Every role of the guild
/// - `guild_id` - Guild id, which is also the everyone role id
/// - `bot_role_ids` - Roles held by the bot
/// - `target_role_ids` - Roles held by the member being acted on
/// - `target_is_owner` - Whether the member owns the guild
/// - `managed_roles` - Roles the action would add or remove
pub fn compute_capability(
    roles: &[Role],
    guild_id: u64,
    bot_role_ids: &[u64],
    target_role_ids: &[u64],
    target_is_owner: bool,
    managed_roles: &[u64],
) -> Capability {
    let find = |role_id: u64| roles.iter().find(|role| role.id.get() == role_id);
    let top_position = |role_ids: &[u64]| {
        role_ids
            .iter()
            .filter_map(|id| find(*id))
            .map(|role| role.position)
            .max()
            .unwrap_or(0)
    };

    let permissions = std::iter::once(guild_id)
        .chain(bot_role_ids.iter().copied())
        .filter_map(find)
        .fold(Permissions::empty(), |acc, role| acc | role.permissions);
    let admin = permissions.administrator();

    let bot_top = top_position(bot_role_ids);

    Capability {
        manage_roles: admin || permissions.manage_roles(),
        kick_members: admin || permissions.kick_members(),
        outranks_target: !target_is_owner && bot_top > top_position(target_role_ids),
        outranks_managed_roles: managed_roles
            .iter()
            .all(|id| find(*id).is_some_and(|role| role.position < bot_top)),
    }
}
