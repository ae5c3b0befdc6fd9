//! Error types for Rolodex core operations.
//!
//! This module defines the error hierarchy for all core operations.
//! Errors are descriptive at the core level; the CLI layer will map these
//! to user-friendly messages.

use thiserror::Error;

/// Result type alias for Rolodex operations.
pub type Result<T> = std::result::Result<T, RolodexError>;

/// Core error type for Rolodex operations.
#[derive(Debug, Error)]
pub enum RolodexError {
    /// Data validation error (blank required field)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Storage backend unavailable or failing
    #[error("Storage error: {0}")]
    Storage(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Generic error (fallback)
    #[error("{0}")]
    Other(String),
}

impl RolodexError {
    /// True for errors the caller recovers from locally without losing state.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, RolodexError::Validation(_) | RolodexError::NotFound(_))
    }
}

impl From<std::io::Error> for RolodexError {
    fn from(err: std::io::Error) -> Self {
        RolodexError::Storage(err.to_string())
    }
}
