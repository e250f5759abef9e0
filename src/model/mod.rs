//! Domain models for the tracker and the bot's supplementary features.
//!
//! Models are plain data with conversion helpers at the persistence boundary
//! (`from_entity`/`into_active_model`) and the pure state transitions the services
//! build upon.

pub mod action;
pub mod activity;
pub mod interview;
pub mod member;
pub mod snapshot;
pub mod vote;
