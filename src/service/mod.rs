//! Business logic.
//!
//! Services hold the tracker's state machines and orchestrate persistence and Discord
//! mutations. They reach Discord only through the [`gateway::GuildGateway`] trait and never
//! depend on the bot's presentation layer.

pub mod cleanup;
pub mod executor;
pub mod gateway;
pub mod interview;
pub mod ledger;
pub mod presence;
pub mod scanner;
pub mod session;
pub mod tracker;

#[cfg(test)]
mod test;
