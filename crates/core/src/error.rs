//! Core Error Types
//!
//! Errors raised by `SessionSource` implementations. The application crate
//! wraps these in its own error type alongside driver and config failures.

use thiserror::Error;

/// Core error type for the notifier workspace.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Data source (session store) query or connectivity errors
    #[error("Data source error: {0}")]
    DataSource(String),

    /// A row could not be decoded into a session
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for core errors
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    pub fn data_source(msg: impl Into<String>) -> Self {
        Self::DataSource(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
