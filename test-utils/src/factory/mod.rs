//! Factory methods for creating test data.
//!
//! This module provides factory methods for inserting tracker rows with sensible defaults,
//! reducing boilerplate in tests.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), sea_orm::DbErr> {
//!     let db = /* ... */;
//!
//!     // Create with defaults
//!     let record = factory::create_user_activity(&db).await?;
//!
//!     // Customize
//!     let stale = factory::user_activity::UserActivityFactory::new(&db)
//!         .inactive_for_days(20)
//!         .status("inactive")
//!         .build()
//!         .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Available Factories
//!
//! - `user_activity` - Create user activity rows
//! - `poll` - Create persisted vote session rows
//! - `cleanup_action` - Create audit log rows
//! - `helpers` - Unique id generation

pub mod cleanup_action;
pub mod helpers;
pub mod poll;
pub mod user_activity;

pub use cleanup_action::create_cleanup_action;
pub use poll::create_poll;
pub use user_activity::create_user_activity;
