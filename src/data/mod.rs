//! Persistence layer.
//!
//! SQL repositories wrap SeaORM queries and convert entity models into domain models at
//! the boundary. `json_store` handles the file-based backend and `store` selects between
//! the two for the tracker snapshot. Vote history, the audit log and settings always live
//! in SQLite.

pub mod bot_setting;
pub mod cleanup_action;
pub mod json_store;
pub mod membership;
pub mod poll;
pub mod store;
pub mod user_activity;
pub mod vote_history;

#[cfg(test)]
mod test;
