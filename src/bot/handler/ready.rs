//! Ready event handler for bot initialization.
//!
//! Fired once the bot has connected to Discord's gateway. Logs the connection, sets the
//! bot's activity and reports what was restored from persistence.

use serenity::all::{ActivityData, Context, Ready};

use crate::state::AppContext;

/// Handles the ready event when the bot connects to Discord.
///
/// # Arguments
/// - `app` - Shared application context
/// - `ctx` - Discord context for setting activity status
/// - `ready` - Ready event data containing bot user information
pub async fn handle_ready(app: &AppContext, ctx: Context, ready: Ready) {
    tracing::info!("{} is connected to Discord", ready.user.name);

    ctx.set_activity(Some(ActivityData::custom("Keeping an eye on activity")));

    let counts = app.tracker.ledger.counts().await;
    tracing::info!(
        "Tracking {} members ({} demoted, {} under review) with {} open votes",
        counts.tracked,
        counts.demoted,
        counts.under_review,
        app.tracker.sessions.len().await
    );
}
