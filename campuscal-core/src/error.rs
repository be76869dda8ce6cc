//! Error types for campuscal.

use thiserror::Error;

/// Errors that can occur in the feed → snapshot pipeline.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Event '{title}' has no start time")]
    MissingStart { title: String },

    #[error("Could not resolve {field} '{value}' to an instant")]
    UnresolvableTime { field: &'static str, value: String },

    #[error("Feed parse error: {0}")]
    FeedParse(String),

    #[error("Invalid pattern for '{key}': {source}")]
    InvalidPattern {
        key: String,
        #[source]
        source: regex::Error,
    },

    #[error("Display table is missing the '{0}' fallback entry")]
    MissingFallback(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for campuscal operations.
pub type CoreResult<T> = Result<T, CoreError>;
