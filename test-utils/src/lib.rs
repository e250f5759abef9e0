//! Warden Test Utils
//!
//! Provides shared testing utilities for building unit and integration tests for the warden
//! bot. This crate offers a builder pattern for creating test contexts with in-memory SQLite
//! databases, factories for persisted tracker rows, Serenity object factories, and a
//! temporary data directory for JSON persistence tests.
//!
//! # Overview
//!
//! The test utilities consist of these main components:
//! - **TestBuilder**: Fluent builder for configuring test environments
//! - **TestContext**: Test environment containing the database connection
//! - **TestError**: Error types that can occur during test setup
//! - **TempDataDir**: `tempfile` backed data directory, removed on drop
//!
//! # Usage
//!
//! Use `TestBuilder` to create a test context with the required database tables:
//!
//! ```rust,ignore
//! use test_utils::builder::TestBuilder;
//! use entity::prelude::CleanupAction;
//!
//! #[tokio::test]
//! async fn test_audit_log() -> Result<(), TestError> {
//!     let test = TestBuilder::new()
//!         .with_table(CleanupAction)
//!         .build()
//!         .await?;
//!
//!     let db = test.db.unwrap();
//!     // Perform database operations...
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod factory;
pub mod serenity;
pub mod temp_dir;
