//! Configuration data model

use super::logging_config::LoggingConfig;
use crate::error::{DocplanError, DocplanResult};
use serde::{Deserialize, Serialize};

/// Token ceiling for a single delegated sub-call
pub const SUB_CALL_MAX_TOKENS: u32 = 4096;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocplanConfig {
    pub subcall: SubCallConfig,
    pub executor: ExecutorConfig,
    pub logging: LoggingConfig,
}

/// Defaults for recursive sub-call delegation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubCallConfig {
    /// Nested delegation levels permitted below a top-level call
    pub max_depth: u32,
    /// Items sampled concurrently per wave
    pub concurrency: usize,
    /// Per-item timeout in milliseconds
    pub timeout_ms: Option<u64>,
    /// Token ceiling for each sub-call request
    pub max_tokens: u32,
}

impl Default for SubCallConfig {
    fn default() -> Self {
        Self {
            max_depth: 1,
            concurrency: 5,
            timeout_ms: None,
            max_tokens: SUB_CALL_MAX_TOKENS,
        }
    }
}

/// Defaults for standalone parallel execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    pub concurrency: usize,
    pub timeout_ms: Option<u64>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            concurrency: 5,
            timeout_ms: None,
        }
    }
}

impl DocplanConfig {
    /// Reject values that are certainly configuration mistakes
    pub fn validate(&self) -> DocplanResult<()> {
        if self.subcall.max_depth == 0 {
            return Err(DocplanError::invalid_field(
                "subcall.max_depth",
                "max_depth must be at least 1",
            ));
        }
        if self.subcall.concurrency == 0 {
            return Err(DocplanError::invalid_field(
                "subcall.concurrency",
                "concurrency must be at least 1",
            ));
        }
        if self.executor.concurrency == 0 {
            return Err(DocplanError::invalid_field(
                "executor.concurrency",
                "concurrency must be at least 1",
            ));
        }
        if self.subcall.max_tokens == 0 {
            return Err(DocplanError::invalid_field(
                "subcall.max_tokens",
                "max_tokens must be positive",
            ));
        }
        Ok(())
    }
}
