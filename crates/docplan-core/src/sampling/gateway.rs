//! Sampling gateway trait

use super::types::{SamplingRequest, SamplingResponse};
use crate::error::DocplanResult;
use async_trait::async_trait;
use std::sync::Arc;

/// Creates one model message per request.
///
/// A call is a single round trip. When the response stops with
/// [`StopReason::ToolUse`](super::StopReason::ToolUse), running the tool and
/// resuming sampling with its output is up to the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SamplingGateway: Send + Sync {
    async fn create_message(&self, request: SamplingRequest) -> DocplanResult<SamplingResponse>;
}

/// Shared handle to a gateway
pub type SharedSamplingGateway = Arc<dyn SamplingGateway>;
