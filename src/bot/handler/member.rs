use serenity::all::{Context, GuildId, Member, User};

use crate::{
    bot::{command::start_interview, gateway::SerenityGateway, prompt},
    state::AppContext,
};

/// Sends the recruit interview to new members when enabled.
pub async fn handle_guild_member_addition(app: &AppContext, ctx: Context, new_member: Member) {
    if new_member.guild_id.get() != app.config.guild_id || new_member.user.bot {
        return;
    }

    let user_id = new_member.user.id.get();
    tracing::info!("{} joined the guild", user_id);

    if !app.config.auto_interview {
        return;
    }

    let gateway = SerenityGateway::new(ctx.http.clone(), app.config.guild_id);
    if let Err(e) = start_interview(&gateway, app, user_id, None).await {
        tracing::warn!("Could not start interview with {}: {}", user_id, e);
    }
}

/// Closes votes and interviews for members who left.
///
/// The activity record is kept; only a kick removes it.
pub async fn handle_guild_member_removal(
    app: &AppContext,
    ctx: Context,
    guild_id: GuildId,
    user: User,
    _member_data_if_available: Option<Member>,
) {
    if guild_id.get() != app.config.guild_id {
        return;
    }

    let user_id = user.id.get();
    tracing::info!("{} left the guild", user_id);

    if app.interviews.cancel(user_id).await {
        tracing::debug!("Cancelled interview with {}", user_id);
    }

    let closed = app.tracker.sessions.remove_for_user(user_id).await;
    if closed.is_empty() {
        return;
    }

    prompt::close_vote_prompts(&ctx.http, &closed, "Member left the server.").await;
    if let Err(e) = app.tracker.persist().await {
        tracing::error!("Failed to persist tracker after {} left: {}", user_id, e);
    }
}
