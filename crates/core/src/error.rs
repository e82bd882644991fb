//! Unified error types for the airwatch pipeline.
//!
//! A remote "no data for this city" response is deliberately NOT an error;
//! it is modeled as [`crate::measurement::FetchOutcome::NoData`].

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the airwatch pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or invalid configuration (e.g. no API token). Fatal, no retry.
    #[error("configuration error: {0}")]
    Config(String),

    /// HTTP or network failure talking to the feed endpoint. Propagated, no
    /// internal retry.
    #[error("transport error: {0}")]
    Transport(String),

    /// Malformed JSON in the feed response body.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// I/O or schema mutation failure on the persistent store.
    #[error("storage error: {0}")]
    Storage(String),

    /// A column name unsafe to use as a store identifier.
    #[error("invalid column name: {0:?}")]
    InvalidColumn(String),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn invalid_column(name: impl Into<String>) -> Self {
        Self::InvalidColumn(name.into())
    }

    /// True for errors that signal misconfiguration rather than a transient
    /// runtime condition.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
