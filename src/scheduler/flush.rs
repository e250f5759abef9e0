use tokio_cron_scheduler::Job;

use crate::{error::AppError, state::AppContext};

const SCHEDULE: &str = "0 */10 * * * *";

/// Writes the tracker to its store every 10 minutes.
pub fn job(app: AppContext) -> Result<Job, AppError> {
    let job = Job::new_async(SCHEDULE, move |_uuid, _lock| {
        let app = app.clone();

        Box::pin(async move {
            if let Err(e) = app.tracker.persist().await {
                tracing::error!("Scheduled ledger flush failed: {}", e);
            }
        })
    })?;

    Ok(job)
}
