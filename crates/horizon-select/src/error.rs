//! Error types for the select widget.

use thiserror::Error;

/// Error reported by a host-supplied filter predicate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct FilterError {
    message: String,
}

impl FilterError {
    /// Create a filter error with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors that can occur while driving a [`SelectBox`](crate::SelectBox).
#[derive(Error, Debug)]
pub enum SelectError {
    /// The filter predicate failed; the previous filtered view is kept.
    #[error("filter predicate failed: {0}")]
    Filter(#[from] FilterError),

    /// An option could not be serialized for structural comparison.
    #[error("failed to serialize option for comparison: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for select operations.
pub type SelectResult<T> = Result<T, SelectError>;
