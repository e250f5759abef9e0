//! Cron jobs driving the tracker.
//!
//! - `sweep` - Inactivity sweep on the configured schedule
//! - `expiry` - Closes overdue vote sessions and stale interviews every 5 minutes
//! - `flush` - Writes the activity ledger every 10 minutes

pub mod expiry;
pub mod flush;
pub mod sweep;

use std::sync::Arc;

use serenity::http::Http;
use tokio_cron_scheduler::JobScheduler;

use crate::{error::AppError, state::AppContext};

/// Starts every job and returns the running scheduler so it can be shut down.
///
/// # Arguments
/// - `app` - Shared application context
/// - `discord_http` - Discord HTTP client for prompts and alerts
pub async fn start_scheduler(
    app: AppContext,
    discord_http: Arc<Http>,
) -> Result<JobScheduler, AppError> {
    let scheduler = JobScheduler::new().await?;

    scheduler
        .add(sweep::job(app.clone(), discord_http.clone())?)
        .await?;
    scheduler
        .add(expiry::job(app.clone(), discord_http)?)
        .await?;
    scheduler.add(flush::job(app.clone())?).await?;

    scheduler.start().await?;

    tracing::info!(
        "Scheduler started, sweeping on \"{}\"",
        app.config.sweep_schedule
    );

    Ok(scheduler)
}
