use chrono::Utc;
use serenity::all::{ChannelId, Context, Message};

use crate::{
    bot::{
        command::{self, Command},
        gateway::SerenityGateway,
        prompt, view,
    },
    model::{activity::ActivityKind, interview::InterviewStep},
    service::cleanup::CleanupService,
    state::AppContext,
};

/// Handle a message in a guild channel or a DM.
///
/// Guild messages count as activity and may be commands; DMs are interview answers.
pub async fn handle_message(app: &AppContext, ctx: Context, message: Message) {
    if message.author.bot {
        return;
    }

    match message.guild_id {
        None => handle_direct_message(app, &ctx, &message).await,
        Some(guild_id) if guild_id.get() == app.config.guild_id => {
            handle_guild_message(app, &ctx, &message).await
        }
        Some(_) => {}
    }
}

async fn handle_guild_message(app: &AppContext, ctx: &Context, message: &Message) {
    let user_id = message.author.id.get();
    let now = Utc::now();

    app.tracker
        .record_activity(user_id, ActivityKind::Message, now)
        .await;

    let gateway = SerenityGateway::new(ctx.http.clone(), app.config.guild_id);
    if let Some(session) = CleanupService::new(&app.db, &app.tracker, &gateway, &app.config)
        .detect_return(user_id, now)
        .await
    {
        prompt::post_vote_prompts(&ctx.http, app, &[session]).await;
    }

    let Some(parsed) = Command::parse(&app.config.command_prefix, &message.content) else {
        return;
    };

    let reply = match parsed {
        Ok(command) if command.requires_admin() && !is_admin(app, message) => {
            "❌ Only admins can use this command.".to_string()
        }
        Ok(command) => {
            tracing::info!("{} ran {:?}", user_id, command);
            match command::execute(&ctx.http, app, user_id, command).await {
                Ok(text) => text,
                Err(e) => e.user_message(),
            }
        }
        Err(e) => e.user_message(),
    };

    if let Err(e) = message
        .channel_id
        .say(&ctx.http, view::fit_message(reply))
        .await
    {
        tracing::error!("Failed to reply in channel {}: {}", message.channel_id, e);
    }
}

fn is_admin(app: &AppContext, message: &Message) -> bool {
    let roles: Vec<u64> = message
        .member
        .as_ref()
        .map(|member| member.roles.iter().map(|role| role.get()).collect())
        .unwrap_or_default();

    app.config.roles.is_admin(&roles)
}

async fn handle_direct_message(app: &AppContext, ctx: &Context, message: &Message) {
    let user_id = message.author.id.get();

    let Some(step) = app
        .interviews
        .answer(user_id, &message.content, Utc::now())
        .await
    else {
        return;
    };

    match step {
        InterviewStep::Ask(question) => {
            if let Err(e) = message.channel_id.say(&ctx.http, question).await {
                tracing::error!("Failed to send interview question to {}: {}", user_id, e);
            }
        }
        InterviewStep::Finished(transcript) => {
            tracing::info!("Interview with {} finished", user_id);

            if let Err(e) = message
                .channel_id
                .say(&ctx.http, "✅ Thanks! Your answers were passed on to the admins.")
                .await
            {
                tracing::warn!("Failed to thank {} for the interview: {}", user_id, e);
            }

            if let Err(e) = ChannelId::new(app.config.channels.admin)
                .say(
                    &ctx.http,
                    view::fit_message(view::interview_summary_text(&transcript)),
                )
                .await
            {
                tracing::error!("Failed to relay interview with {}: {}", user_id, e);
            }
        }
    }
}
