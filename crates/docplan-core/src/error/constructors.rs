//! Constructor methods for DocplanError

use super::types::DocplanError;
use crate::security::Violation;
use std::time::Duration;

impl DocplanError {
    /// Create a security violation error
    pub fn security(violation: Violation, message: impl Into<String>) -> Self {
        Self::Security {
            violation,
            message: message.into(),
        }
    }

    /// Create a depth limit error
    pub fn depth_limit(max_depth: u32, depth: u32) -> Self {
        Self::DepthLimit { max_depth, depth }
    }

    /// Create a capability-not-available error
    pub fn capability_unavailable(capability: impl Into<String>) -> Self {
        Self::CapabilityUnavailable {
            capability: capability.into(),
        }
    }

    /// Create a sampling error
    pub fn sampling(message: impl Into<String>) -> Self {
        Self::Sampling {
            message: message.into(),
        }
    }

    /// Create a timeout error from the elapsed budget
    pub fn timeout(duration: Duration) -> Self {
        Self::Timeout {
            millis: duration.as_millis() as u64,
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: None,
        }
    }

    /// Create a configuration error with context
    pub fn config_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create an IO error for a specific path
    pub fn io_with_path(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Create an invalid input error for a named field
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: Some(field.into()),
        }
    }
}
