use std::sync::{atomic::Ordering, Arc};

use serenity::{all::ChannelId, http::Http};
use tokio_cron_scheduler::Job;

use crate::{
    bot::{prompt::sweep_and_prompt, view},
    error::AppError,
    state::AppContext,
};

/// Inactivity sweep on `config.sweep_schedule`.
pub fn job(app: AppContext, discord_http: Arc<Http>) -> Result<Job, AppError> {
    let schedule = app.config.sweep_schedule.clone();

    let job = Job::new_async(schedule.as_str(), move |_uuid, _lock| {
        let app = app.clone();
        let http = discord_http.clone();

        Box::pin(async move {
            run(&app, &http).await;
        })
    })?;

    Ok(job)
}

/// Runs one sweep and keeps the consecutive failure count.
///
/// When failures reach `alert_after_failures` the admins are alerted once; the count
/// starts over after the next successful sweep.
pub async fn run(app: &AppContext, http: &Arc<Http>) {
    match sweep_and_prompt(http, app).await {
        Ok(report) => {
            app.sweep_failures.store(0, Ordering::SeqCst);

            if report.opened.is_empty() && report.errors.is_empty() {
                return;
            }
            if let Err(e) = ChannelId::new(app.config.channels.log)
                .say(http, view::fit_message(view::sweep_summary_text(&report)))
                .await
            {
                tracing::error!("Failed to post sweep summary: {}", e);
            }
        }
        Err(e) => {
            let failures = app.sweep_failures.fetch_add(1, Ordering::SeqCst) + 1;
            tracing::error!("Inactivity sweep failed ({} in a row): {}", failures, e);

            if failures != app.config.alert_after_failures {
                return;
            }
            let alert = view::sweep_alert_text(failures, &e.to_string());
            if let Err(post_err) = ChannelId::new(app.config.channels.admin)
                .say(http, alert)
                .await
            {
                tracing::error!("Failed to post sweep failure alert: {}", post_err);
            }
        }
    }
}
