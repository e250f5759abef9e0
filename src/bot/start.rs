use serenity::all::{Client, GatewayIntents};

use crate::{bot::handler::Handler, error::AppError, state::AppContext};

/// Builds the Discord client without connecting.
///
/// The caller takes the client's HTTP client and shard manager before handing it to
/// [`start_bot`], so scheduler jobs and shutdown can use them.
///
/// # Arguments
/// - `app` - Shared application context given to the event handler
///
/// # Returns
/// - `Ok(Client)` - Client ready to start
/// - `Err(AppError)` - The token was rejected while building the client
pub async fn init_bot(app: AppContext) -> Result<Client, AppError> {
    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::GUILD_VOICE_STATES
        | GatewayIntents::GUILD_PRESENCES;

    let token = app.config.discord_bot_token.clone();
    let client = Client::builder(&token, intents)
        .event_handler(Handler::new(app))
        .await?;

    Ok(client)
}

/// Runs the bot until the gateway connection ends.
///
/// This blocks until shutdown, so it should run in its own task.
pub async fn start_bot(mut client: Client) -> Result<(), AppError> {
    tracing::info!("Starting Discord bot...");

    client.start().await?;

    Ok(())
}
