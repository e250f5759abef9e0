use std::future::Future;

use crate::error::AppError;

/// Runs `operation`, retrying it once if Discord rate limits the first attempt.
///
/// The task sleeps for the interval carried by [`AppError::RateLimited`] before the
/// second attempt. Any other error, or a second rate limit, is returned as is.
pub async fn retry_rate_limited<T, F, Fut>(mut operation: F) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    match operation().await {
        Err(AppError::RateLimited { retry_after }) => {
            tracing::warn!("Rate limited by Discord, retrying in {:?}", retry_after);
            tokio::time::sleep(retry_after).await;
            operation().await
        }
        result => result,
    }
}
