//! SeaORM entity definitions for the warden database.

pub mod prelude;

pub mod bot_setting;
pub mod cleanup_action;
pub mod demoted_user;
pub mod poll;
pub mod user_activity;
pub mod user_under_review;
pub mod vote_history;
