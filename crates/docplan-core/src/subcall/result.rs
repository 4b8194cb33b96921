//! Per-item sub-call results

use crate::executor::Outcome;
use crate::sampling::{SamplingResponse, ToolCallRecord};
use serde::{Deserialize, Serialize};

/// Result slot for one delegated item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubCallResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Position of the item in the input batch
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCallRecord>>,
}

impl SubCallResult {
    pub fn success(index: usize, response: SamplingResponse) -> Self {
        Self {
            success: true,
            result: Some(response.content),
            error: None,
            index,
            tool_calls: response.tool_calls,
        }
    }

    pub fn failure(index: usize, error: impl Into<String>) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(error.into()),
            index,
            tool_calls: None,
        }
    }

    pub fn from_outcome(index: usize, outcome: Outcome<SamplingResponse>) -> Self {
        match outcome {
            Outcome::Success(response) => Self::success(index, response),
            Outcome::Failure { error, .. } => Self::failure(index, error),
        }
    }
}
