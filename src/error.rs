//! Error types for the fence engine

use thiserror::Error;

/// Errors that can occur while building or querying a fence
///
/// Every failure is synchronous and immediate; nothing is retried internally
/// and no operation produces a partial result after one of these surfaces.
#[derive(Debug, Error)]
pub enum FenceError {
    /// A rule was constructed without a usable name
    #[error("Invalid rule: {0}")]
    InvalidRule(String),

    /// A report was constructed over malformed rule/outcome sequences
    #[error("Invalid result: {0}")]
    InvalidResult(String),

    /// A bad argument was supplied to a report query
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Registration was attempted under an empty or blank name
    #[error("Invalid registration name {0:?}")]
    InvalidName(String),

    /// A rule name was called or hydrated without being registered
    #[error("Unknown rule '{0}'")]
    UnknownRule(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for fence operations
pub type FenceResult<T> = Result<T, FenceError>;

impl FenceError {
    /// Create an invalid rule error
    pub fn invalid_rule(message: impl Into<String>) -> Self {
        FenceError::InvalidRule(message.into())
    }

    /// Create an invalid result error
    pub fn invalid_result(message: impl Into<String>) -> Self {
        FenceError::InvalidResult(message.into())
    }

    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        FenceError::InvalidArgument(message.into())
    }

    /// Create an invalid registration name error
    pub fn invalid_name(name: impl Into<String>) -> Self {
        FenceError::InvalidName(name.into())
    }

    /// Create an unknown rule error
    pub fn unknown_rule(name: impl Into<String>) -> Self {
        FenceError::UnknownRule(name.into())
    }

    /// Check if this is an unknown rule error
    pub fn is_unknown_rule(&self) -> bool {
        matches!(self, FenceError::UnknownRule(_))
    }

    /// Check if this is a malformed result error
    pub fn is_invalid_result(&self) -> bool {
        matches!(self, FenceError::InvalidResult(_))
    }
}
