//! Per-item execution outcomes

use crate::error::DocplanError;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::time::Duration;

/// Why an item failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The operation returned an error
    Error,
    /// The operation lost its timeout race
    Timeout,
    /// The operation panicked
    Panicked,
    /// The executor was cancelled before the operation settled
    Cancelled,
}

/// Result slot for one input item
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Success(T),
    Failure { error: String, kind: FailureKind },
}

impl<T> Outcome<T> {
    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure {
            error: error.into(),
            kind: FailureKind::Error,
        }
    }

    pub fn timed_out(limit: Duration) -> Self {
        Self::Failure {
            error: DocplanError::timeout(limit).to_string(),
            kind: FailureKind::Timeout,
        }
    }

    pub fn panicked(message: impl AsRef<str>) -> Self {
        Self::Failure {
            error: format!("Operation panicked: {}", message.as_ref()),
            kind: FailureKind::Panicked,
        }
    }

    pub fn cancelled() -> Self {
        Self::Failure {
            error: DocplanError::Cancelled.to_string(),
            kind: FailureKind::Cancelled,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure { error, .. } => Some(error),
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Success(_) => None,
            Self::Failure { kind, .. } => Some(*kind),
        }
    }
}

// Wire shape: {"success": true, "value": ..} | {"success": false, "error": ".."}
impl<T: Serialize> Serialize for Outcome<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Outcome", 2)?;
        match self {
            Self::Success(value) => {
                state.serialize_field("success", &true)?;
                state.serialize_field("value", value)?;
            }
            Self::Failure { error, .. } => {
                state.serialize_field("success", &false)?;
                state.serialize_field("error", error)?;
            }
        }
        state.end()
    }
}

/// Aggregate counts over a finished run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub timed_out: usize,
    pub panicked: usize,
    pub cancelled: usize,
}

impl BatchSummary {
    pub fn from_outcomes<T>(outcomes: &[Outcome<T>]) -> Self {
        let mut summary = Self {
            total: outcomes.len(),
            ..Default::default()
        };
        for outcome in outcomes {
            match outcome.failure_kind() {
                None => summary.succeeded += 1,
                Some(kind) => {
                    summary.failed += 1;
                    match kind {
                        FailureKind::Timeout => summary.timed_out += 1,
                        FailureKind::Panicked => summary.panicked += 1,
                        FailureKind::Cancelled => summary.cancelled += 1,
                        FailureKind::Error => {}
                    }
                }
            }
        }
        summary
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}
