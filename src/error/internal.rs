use std::num::ParseIntError;
use thiserror::Error;

/// Internal issues with the codebase indicating unexpected behavior & possible bugs
#[derive(Error, Debug)]
pub enum InternalError {
    /// Failure to parse id from String
    ///
    /// Discord ids are persisted as strings; a row that fails to parse back into
    /// a u64 indicates a corrupted or hand-edited database.
    #[error("Failed to parse ID from String '{value}': {source}")]
    ParseStringId {
        /// The string value that failed to parse
        value: String,
        /// The underlying parse error
        #[source]
        source: ParseIntError,
    },

    /// Failure to parse a persisted enum value such as a status or action name.
    #[error("Unknown {kind} value '{value}'")]
    UnknownVariant {
        /// Which enum was being parsed
        kind: &'static str,
        /// The value that did not match any variant
        value: String,
    },
}
