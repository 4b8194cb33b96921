//! UnifiedError trait implementation for DocplanError

use super::types::{DocplanError, UnifiedError};

impl UnifiedError for DocplanError {
    fn error_code(&self) -> &str {
        match self {
            Self::Security { .. } => "security_violation",
            Self::DepthLimit { .. } => "depth_limit",
            Self::CapabilityUnavailable { .. } => "capability_unavailable",
            Self::Sampling { .. } => "sampling",
            Self::Timeout { .. } => "timeout",
            Self::Cancelled => "cancelled",
            Self::Config { .. } => "config",
            Self::Io { .. } => "io",
            Self::InvalidInput { .. } => "invalid_input",
        }
    }

    fn message(&self) -> &str {
        match self {
            Self::Security { message, .. } => message,
            Self::DepthLimit { .. } => "Sub-call depth limit reached",
            Self::CapabilityUnavailable { .. } => "Capability not available",
            Self::Sampling { message } => message,
            Self::Timeout { .. } => "Operation timed out",
            Self::Cancelled => "Operation was cancelled",
            Self::Config { message, .. } => message,
            Self::Io { message, .. } => message,
            Self::InvalidInput { message, .. } => message,
        }
    }

    fn context(&self) -> Option<&str> {
        match self {
            Self::Config { context, .. } => context.as_deref(),
            Self::Io { path, .. } => path.as_deref(),
            Self::InvalidInput { field, .. } => field.as_deref(),
            Self::CapabilityUnavailable { capability } => Some(capability),
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Sampling { .. })
    }

    fn is_structural(&self) -> bool {
        matches!(self, Self::Security { .. } | Self::DepthLimit { .. })
    }
}
