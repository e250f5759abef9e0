//! Vote button handling.
//!
//! A click is acknowledged right away by updating the prompt in place; applying a decision
//! can take several Discord requests, so its result is reported in a followup message.

use chrono::Utc;
use serenity::all::{
    ComponentInteraction, Context, CreateInteractionResponse, CreateInteractionResponseFollowup,
    CreateInteractionResponseMessage, Interaction,
};

use crate::{
    bot::{gateway::SerenityGateway, prompt, view},
    data::vote_history::VoteHistoryRepository,
    model::{
        action::{CreateVoteHistoryParam, ModerationAction},
        vote::{SessionKey, VoteOutcome, VoteSession},
    },
    service::executor::ActionExecutor,
    state::AppContext,
};

pub async fn handle_interaction_create(app: &AppContext, ctx: Context, interaction: Interaction) {
    let Interaction::Component(component) = interaction else {
        return;
    };
    let Some((key, option)) = view::parse_vote_custom_id(&component.data.custom_id) else {
        return;
    };

    let voter_id = component.user.id.get();
    let voter_roles: Vec<u64> = component
        .member
        .as_ref()
        .map(|member| member.roles.iter().map(|role| role.get()).collect())
        .unwrap_or_default();
    let now = Utc::now();

    let outcome = app
        .tracker
        .sessions
        .cast_vote(&key, voter_id, &voter_roles, option, now)
        .await;

    match outcome {
        VoteOutcome::Rejected(reason) => {
            tracing::debug!("Rejected vote by {} on {}: {:?}", voter_id, key, reason);
            respond(
                &ctx,
                &component,
                CreateInteractionResponse::Message(
                    CreateInteractionResponseMessage::new()
                        .content(reason.to_string())
                        .ephemeral(true),
                ),
            )
            .await;
        }
        VoteOutcome::Recorded { session } => {
            record_history(app, key, voter_id, option, now).await;
            if let Err(e) = app.tracker.persist().await {
                tracing::error!("Failed to persist vote on {}: {}", key, e);
            }

            let days = app
                .tracker
                .ledger
                .days_inactive(session.target_user_id, now)
                .await;
            respond(
                &ctx,
                &component,
                CreateInteractionResponse::UpdateMessage(
                    CreateInteractionResponseMessage::new()
                        .embed(view::session_embed(&session, days))
                        .components(view::session_components(&session, false)),
                ),
            )
            .await;
        }
        VoteOutcome::Resolved { decision, session } => {
            record_history(app, key, voter_id, option, now).await;
            tracing::info!("Session {} resolved to {}", key, decision);

            respond(
                &ctx,
                &component,
                CreateInteractionResponse::UpdateMessage(
                    CreateInteractionResponseMessage::new()
                        .embed(view::closed_embed(
                            &session,
                            &format!("Decision: **{}**", decision),
                        ))
                        .components(view::session_components(&session, true)),
                ),
            )
            .await;

            let followup = apply_decision(app, &ctx, decision, &session, voter_id).await;
            if let Err(e) = component
                .create_followup(
                    &ctx.http,
                    CreateInteractionResponseFollowup::new().content(view::fit_message(followup)),
                )
                .await
            {
                tracing::error!("Failed to send followup for {}: {}", key, e);
            }
        }
    }
}

/// Applies a decision and returns the text to report back.
async fn apply_decision(
    app: &AppContext,
    ctx: &Context,
    decision: ModerationAction,
    session: &VoteSession,
    voter_id: u64,
) -> String {
    let gateway = SerenityGateway::new(ctx.http.clone(), app.config.guild_id);
    let executor = ActionExecutor::from_config(&app.db, &app.tracker, &gateway, &app.config);

    let result = executor
        .apply(decision, session.target_user_id, Some(voter_id))
        .await;

    if let Err(e) = app.tracker.persist().await {
        tracing::error!("Failed to persist tracker after {}: {}", session.key(), e);
    }

    match result {
        Ok(report) => {
            prompt::close_vote_prompts(
                &ctx.http,
                &report.closed_sessions,
                &format!("Closed: member was {}.", decision.past_tense()),
            )
            .await;
            report.message
        }
        Err(e) => {
            tracing::error!(
                "Failed to apply {} to {}: {}",
                decision,
                session.target_user_id,
                e
            );
            e.user_message()
        }
    }
}

async fn record_history(
    app: &AppContext,
    session_key: SessionKey,
    admin_id: u64,
    option: ModerationAction,
    cast_at: chrono::DateTime<Utc>,
) {
    if let Err(e) = VoteHistoryRepository::new(&app.db)
        .create(CreateVoteHistoryParam {
            session_key,
            admin_id,
            option,
            cast_at,
        })
        .await
    {
        tracing::error!("Failed to record vote history for {}: {}", session_key, e);
    }
}

async fn respond(ctx: &Context, component: &ComponentInteraction, response: CreateInteractionResponse) {
    if let Err(e) = component.create_response(&ctx.http, response).await {
        tracing::error!("Failed to respond to interaction: {}", e);
    }
}
