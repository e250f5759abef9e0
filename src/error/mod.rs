//! Error types and reply-text mapping.
//!
//! This module provides the bot's error hierarchy. `AppError` is the top-level error type
//! wrapping library errors and the domain taxonomy (permission denied, not found, rate
//! limited, corrupt persistence). Failures are caught where they happen, logged, and turned
//! into a reply string via [`AppError::user_message`]; only startup errors reach `main`.

pub mod config;
pub mod internal;

use std::time::Duration;

use serenity::http::HttpError;
use thiserror::Error;

use crate::error::{config::ConfigError, internal::InternalError};

/// Fallback wait when Discord reports a rate limit without a usable retry interval.
pub const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(1);

/// Top-level application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup or environment variable loading.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Internal invariant violation, such as an unparsable persisted id.
    #[error(transparent)]
    InternalErr(#[from] InternalError),

    /// Database operation error from SeaORM.
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),

    /// Filesystem error while reading or writing persisted state.
    #[error(transparent)]
    IoErr(#[from] std::io::Error),

    /// JSON encoding or decoding error.
    #[error(transparent)]
    JsonErr(#[from] serde_json::Error),

    /// Discord API error from Serenity that has no more specific mapping.
    ///
    /// Boxed due to large size.
    #[error(transparent)]
    DiscordErr(#[from] Box<serenity::Error>),

    /// Cron scheduler error.
    #[error(transparent)]
    SchedulerErr(#[from] tokio_cron_scheduler::JobSchedulerError),

    /// The bot lacks a permission or role-hierarchy position required for the operation.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// A channel, role, member or session does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Discord asked us to back off.
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited {
        /// How long to wait before retrying.
        retry_after: Duration,
    },

    /// A persisted file could not be decoded.
    ///
    /// Loading recovers from this by falling back to a backup or an empty default;
    /// it only surfaces when a single document is read directly.
    #[error("Corrupt persisted file {path}: {reason}")]
    CorruptPersistence {
        /// Path of the unreadable file
        path: String,
        /// Decoder error message
        reason: String,
    },

    /// Invalid command input.
    #[error("{0}")]
    BadRequest(String),
}

/// Manual conversion from serenity::Error to AppError.
///
/// Unsuccessful HTTP responses with status 403, 404 or 429 map onto the domain variants so
/// call sites can react to them. Everything else is boxed to keep `AppError` small.
impl From<serenity::Error> for AppError {
    fn from(err: serenity::Error) -> Self {
        if let serenity::Error::Http(HttpError::UnsuccessfulRequest(response)) = &err {
            match response.status_code.as_u16() {
                403 => return AppError::PermissionDenied(response.error.message.clone()),
                404 => return AppError::NotFound(response.error.message.clone()),
                429 => {
                    return AppError::RateLimited {
                        retry_after: DEFAULT_RETRY_AFTER,
                    }
                }
                _ => {}
            }
        }

        AppError::DiscordErr(Box::new(err))
    }
}

impl AppError {
    /// Human-readable text for replying in a channel.
    ///
    /// Domain errors carry their message through; infrastructure errors are logged and
    /// replaced by a generic message so internals never leak into Discord.
    pub fn user_message(&self) -> String {
        match self {
            Self::PermissionDenied(msg) => format!("❌ I don't have permission to do that: {}", msg),
            Self::NotFound(msg) => format!("❌ Not found: {}", msg),
            Self::BadRequest(msg) => format!("❌ {}", msg),
            Self::RateLimited { .. } => {
                "⏳ Discord is rate limiting me, please try again shortly.".to_string()
            }
            err => {
                tracing::error!("{}", err);
                "❌ Something went wrong, check the bot logs.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_keep_their_message() {
        let err = AppError::BadRequest("Usage: !checkmember <user>".to_string());
        assert_eq!(err.user_message(), "❌ Usage: !checkmember <user>");

        let err = AppError::NotFound("member 42".to_string());
        assert!(err.user_message().contains("member 42"));
    }

    #[test]
    fn infrastructure_errors_are_hidden() {
        let err = AppError::IoErr(std::io::Error::other("secret detail"));
        assert!(!err.user_message().contains("secret detail"));
    }
}
