use serenity::all::{
    Context, EventHandler, GuildId, Interaction, Member, Message, Presence, Ready, User,
    VoiceState,
};
use serenity::async_trait;

use crate::state::AppContext;

pub mod interaction;
pub mod member;
pub mod message;
pub mod presence;
pub mod ready;
pub mod voice;

/// Discord bot event handler
pub struct Handler {
    pub app: AppContext,
}

impl Handler {
    pub fn new(app: AppContext) -> Self {
        Self { app }
    }
}

#[async_trait]
impl EventHandler for Handler {
    /// Called when the bot is ready and connected to Discord
    async fn ready(&self, ctx: Context, ready: Ready) {
        ready::handle_ready(&self.app, ctx, ready).await;
    }

    /// Called when a message is sent in a guild channel or a DM
    async fn message(&self, ctx: Context, message: Message) {
        message::handle_message(&self.app, ctx, message).await;
    }

    /// Called when a member joins, leaves or moves between voice channels
    async fn voice_state_update(&self, ctx: Context, old: Option<VoiceState>, new: VoiceState) {
        voice::handle_voice_state_update(&self.app, ctx, old, new).await;
    }

    /// Called when a member's online status changes
    async fn presence_update(&self, ctx: Context, new_data: Presence) {
        presence::handle_presence_update(&self.app, ctx, new_data).await;
    }

    /// Called when a member joins a guild
    async fn guild_member_addition(&self, ctx: Context, new_member: Member) {
        member::handle_guild_member_addition(&self.app, ctx, new_member).await;
    }

    /// Called when a member leaves a guild
    async fn guild_member_removal(
        &self,
        ctx: Context,
        guild_id: GuildId,
        user: User,
        member_data_if_available: Option<Member>,
    ) {
        member::handle_guild_member_removal(&self.app, ctx, guild_id, user, member_data_if_available)
            .await;
    }

    /// Called when a button is clicked
    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        interaction::handle_interaction_create(&self.app, ctx, interaction).await;
    }
}
