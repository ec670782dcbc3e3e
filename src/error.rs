//! Error types for the chunking library

use thiserror::Error;

/// Result type alias for this library
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring, cleaning or serializing
///
/// Chunking itself never fails; these cover the edges around it.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A user-supplied cleaning pattern that does not compile
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Error serializing chunks
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
