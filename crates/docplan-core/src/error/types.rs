//! Core error types and traits for docplan

use crate::security::Violation;
use thiserror::Error;

/// Result type alias for docplan operations
pub type DocplanResult<T> = Result<T, DocplanError>;

/// Uniform accessors shared by every docplan error.
pub trait UnifiedError: std::error::Error + Send + Sync {
    /// Stable code for programmatic handling
    fn error_code(&self) -> &str;

    /// Human-readable message
    fn message(&self) -> &str;

    /// Optional context about where the error occurred
    fn context(&self) -> Option<&str> {
        None
    }

    /// Whether retrying the same call could succeed
    fn is_retryable(&self) -> bool {
        false
    }

    /// Whether the error invalidates the whole call rather than one item
    fn is_structural(&self) -> bool {
        false
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Convert the error into a configuration error carrying `context`
    fn config_context<C: std::fmt::Display>(self, context: C) -> DocplanResult<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn config_context<C: std::fmt::Display>(self, context: C) -> DocplanResult<T> {
        self.map_err(|e| DocplanError::config_with_context(e.to_string(), context.to_string()))
    }
}

/// Main error type for docplan
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DocplanError {
    /// A code snippet matched a rejection rule before execution
    #[error("Security violation [{violation}]: {message}")]
    Security { violation: Violation, message: String },

    /// The recursion budget was exhausted before any sub-call ran
    #[error("Maximum sub-call depth {max_depth} reached (current depth {depth})")]
    DepthLimit { max_depth: u32, depth: u32 },

    /// An optional host capability was not supplied
    #[error("Capability not available: {capability}")]
    CapabilityUnavailable { capability: String },

    /// The sampling gateway failed to produce a message
    #[error("Sampling error: {message}")]
    Sampling { message: String },

    /// A single item's operation lost its timeout race
    #[error("Operation timed out after {millis}ms")]
    Timeout { millis: u64 },

    /// The operation was cancelled before it settled
    #[error("Operation was cancelled")]
    Cancelled,

    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },

    /// Invalid input errors
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        field: Option<String>,
    },
}
