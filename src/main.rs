mod bot;
mod config;
mod data;
mod error;
mod model;
mod scheduler;
mod service;
mod startup;
mod state;
mod util;

use crate::{config::Config, error::AppError, state::AppContext};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    startup::init_tracing();

    let config = Config::from_env()?;

    let db = startup::connect_to_database(&config).await?;
    let tracker = startup::load_tracker(&config, &db).await?;
    let app = AppContext::new(config, db, tracker);

    tracing::info!("Starting warden");

    // Take the HTTP client and shard manager before the client moves into its task
    let client = bot::start::init_bot(app.clone()).await?;
    let discord_http = client.http.clone();
    let shard_manager = client.shard_manager.clone();

    let bot_task = tokio::spawn(async move {
        if let Err(e) = bot::start::start_bot(client).await {
            tracing::error!("Discord bot error: {}", e);
        }
    });

    let mut scheduler = scheduler::start_scheduler(app.clone(), discord_http).await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");

    if let Err(e) = scheduler.shutdown().await {
        tracing::error!("Failed to stop scheduler: {}", e);
    }

    bot_task.abort();
    if let Err(e) = bot_task.await {
        if !e.is_cancelled() {
            tracing::error!("Discord bot task failed: {}", e);
        }
    }
    shard_manager.shutdown_all().await;

    app.tracker.persist().await?;
    tracing::info!("Activity ledger flushed");

    Ok(())
}
