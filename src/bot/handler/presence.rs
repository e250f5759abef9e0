use chrono::Utc;
use serenity::all::{ChannelId, Context, OnlineStatus, Presence};

use crate::{bot::view, state::AppContext};

/// Announces members coming online in the welcome channel.
pub async fn handle_presence_update(app: &AppContext, ctx: Context, presence: Presence) {
    let Some(channel_id) = app.config.channels.welcome else {
        return;
    };
    if presence.guild_id.map(|id| id.get()) != Some(app.config.guild_id) {
        return;
    }
    if presence.user.bot == Some(true) {
        return;
    }

    let user_id = presence.user.id.get();
    let online = presence.status == OnlineStatus::Online;

    if !app.presence.observe(user_id, online, Utc::now()).await {
        return;
    }

    if let Err(e) = ChannelId::new(channel_id)
        .say(&ctx.http, view::online_text(user_id))
        .await
    {
        tracing::error!("Failed to announce {} coming online: {}", user_id, e);
    }
}
