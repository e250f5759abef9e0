//! Discord presentation layer.
//!
//! Turns gateway events into tracker and service calls and renders their results as
//! messages, embeds and buttons. Services never depend on this module; they reach
//! Discord through [`gateway::SerenityGateway`], which implements the service-side
//! `GuildGateway` trait on top of the bot's HTTP client.
//!
//! # Gateway Intents
//!
//! The bot requires the following gateway intents:
//! - `GUILDS` - Guild availability
//! - `GUILD_MEMBERS` - Member joins and leaves (privileged intent)
//! - `GUILD_MESSAGES` and `MESSAGE_CONTENT` - Activity tracking and prefix commands
//!   (`MESSAGE_CONTENT` is privileged)
//! - `DIRECT_MESSAGES` - Interview answers
//! - `GUILD_VOICE_STATES` - Voice activity tracking
//! - `GUILD_PRESENCES` - Online announcements (privileged intent)

pub mod command;
pub mod gateway;
pub mod handler;
pub mod prompt;
pub mod start;
pub mod view;
