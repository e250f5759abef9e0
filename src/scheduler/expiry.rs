use std::sync::Arc;

use chrono::Utc;
use serenity::http::Http;
use tokio_cron_scheduler::Job;

use crate::{
    bot::{gateway::SerenityGateway, prompt},
    error::AppError,
    service::cleanup::CleanupService,
    state::AppContext,
};

const SCHEDULE: &str = "0 */5 * * * *";

/// Closes overdue vote sessions and drops stale interviews and announcement times every
/// 5 minutes.
pub fn job(app: AppContext, discord_http: Arc<Http>) -> Result<Job, AppError> {
    let job = Job::new_async(SCHEDULE, move |_uuid, _lock| {
        let app = app.clone();
        let http = discord_http.clone();

        Box::pin(async move {
            run(&app, &http).await;
        })
    })?;

    Ok(job)
}

pub async fn run(app: &AppContext, http: &Arc<Http>) {
    let now = Utc::now();

    let gateway = SerenityGateway::new(http.clone(), app.config.guild_id);
    let expired = CleanupService::new(&app.db, &app.tracker, &gateway, &app.config)
        .expire_sessions(now)
        .await;
    prompt::close_vote_prompts(http, &expired, "Expired before reaching quorum.").await;

    let stale = app.interviews.expire_stale(now).await;
    if !stale.is_empty() {
        tracing::info!("Dropped {} stale interviews", stale.len());
    }

    let pruned = app.presence.prune(now).await;
    if pruned > 0 {
        tracing::debug!("Pruned {} online announcement times", pruned);
    }
}
