//! Posting and closing vote prompts in the admin channel.

use std::sync::Arc;

use chrono::Utc;
use serenity::{
    all::{ChannelId, CreateMessage, EditMessage, MessageId},
    http::Http,
};

use crate::{
    bot::{gateway::SerenityGateway, view},
    error::AppError,
    model::vote::{PromptRef, VoteSession},
    service::{cleanup::CleanupService, scanner::SweepReport},
    state::AppContext,
    util::retry::retry_rate_limited,
};

/// Posts the prompt for a newly opened session and remembers where it was posted.
///
/// # Returns
/// - `Ok(())` - Prompt posted and linked to the session
/// - `Err(AppError)` - Discord rejected the message
pub async fn post_vote_prompt(
    http: &Arc<Http>,
    app: &AppContext,
    session: &VoteSession,
) -> Result<(), AppError> {
    let days = app
        .tracker
        .ledger
        .days_inactive(session.target_user_id, Utc::now())
        .await;
    let message = CreateMessage::new()
        .embed(view::session_embed(session, days))
        .components(view::session_components(session, false));
    let channel_id = ChannelId::new(app.config.channels.admin);

    let posted = retry_rate_limited(|| {
        let message = message.clone();
        async move {
            channel_id
                .send_message(http, message)
                .await
                .map_err(AppError::from)
        }
    })
    .await?;

    app.tracker
        .sessions
        .set_prompt(
            &session.key(),
            PromptRef {
                channel_id: channel_id.get(),
                message_id: posted.id.get(),
            },
        )
        .await;

    tracing::info!("Posted vote prompt for session {}", session.key());
    Ok(())
}

/// Posts prompts for every session, then flushes so prompt references survive a restart.
pub async fn post_vote_prompts(http: &Arc<Http>, app: &AppContext, sessions: &[VoteSession]) {
    if sessions.is_empty() {
        return;
    }

    for session in sessions {
        if let Err(e) = post_vote_prompt(http, app, session).await {
            tracing::error!("Failed to post prompt for {}: {}", session.key(), e);
        }
    }

    if let Err(e) = app.tracker.persist().await {
        tracing::error!("Failed to persist prompt references: {}", e);
    }
}

/// Replaces a session's prompt with a closed embed and disabled buttons.
///
/// Sessions that were never posted are skipped.
pub async fn close_vote_prompt(
    http: &Arc<Http>,
    session: &VoteSession,
    note: &str,
) -> Result<(), AppError> {
    let Some(prompt) = session.prompt else {
        return Ok(());
    };

    let edit = EditMessage::new()
        .embed(view::closed_embed(session, note))
        .components(view::session_components(session, true));

    http.edit_message(
        ChannelId::new(prompt.channel_id),
        MessageId::new(prompt.message_id),
        &edit,
        vec![],
    )
    .await?;

    Ok(())
}

/// Closes several prompts, logging failures.
pub async fn close_vote_prompts(http: &Arc<Http>, sessions: &[VoteSession], note: &str) {
    for session in sessions {
        if let Err(e) = close_vote_prompt(http, session, note).await {
            tracing::warn!("Failed to close prompt for {}: {}", session.key(), e);
        }
    }
}

/// Runs an inactivity sweep and posts prompts for the sessions it opened.
pub async fn sweep_and_prompt(http: &Arc<Http>, app: &AppContext) -> Result<SweepReport, AppError> {
    let gateway = SerenityGateway::new(http.clone(), app.config.guild_id);
    let report = CleanupService::new(&app.db, &app.tracker, &gateway, &app.config)
        .run_sweep(Utc::now())
        .await?;

    post_vote_prompts(http, app, &report.opened).await;

    Ok(report)
}
