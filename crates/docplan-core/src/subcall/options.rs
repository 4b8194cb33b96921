//! Inputs and options for sub-call processing

use crate::sampling::{SharedSamplingGateway, ToolDefinition};
use crate::subcall::SubCallContext;
use serde_json::Value;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// A single item or a batch of items to delegate
#[derive(Debug, Clone, PartialEq)]
pub enum SubCallInput {
    Single(Value),
    Batch(Vec<Value>),
}

impl SubCallInput {
    /// Normalize to a batch; a single item becomes a one-element batch
    pub fn into_items(self) -> Vec<Value> {
        match self {
            SubCallInput::Single(item) => vec![item],
            SubCallInput::Batch(items) => items,
        }
    }
}

impl From<Value> for SubCallInput {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => SubCallInput::Batch(items),
            item => SubCallInput::Single(item),
        }
    }
}

impl<T: Into<Value>> From<Vec<T>> for SubCallInput {
    fn from(items: Vec<T>) -> Self {
        SubCallInput::Batch(items.into_iter().map(Into::into).collect())
    }
}

impl From<&str> for SubCallInput {
    fn from(item: &str) -> Self {
        SubCallInput::Single(Value::String(item.to_string()))
    }
}

impl From<String> for SubCallInput {
    fn from(item: String) -> Self {
        SubCallInput::Single(Value::String(item))
    }
}

/// Per-call overrides; unset fields fall back to the orchestrator defaults
#[derive(Clone, Default)]
pub struct SubCallOptions {
    pub max_depth: Option<u32>,
    pub concurrency: Option<usize>,
    pub timeout: Option<Duration>,
    pub tools: Option<Vec<ToolDefinition>>,
    pub gateway: Option<SharedSamplingGateway>,
    /// Context of the enclosing call when re-entering from a nested level
    pub context: Option<SubCallContext>,
    pub cancellation_token: Option<CancellationToken>,
}

impl SubCallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = Some(concurrency);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn with_gateway(mut self, gateway: SharedSamplingGateway) -> Self {
        self.gateway = Some(gateway);
        self
    }

    pub fn with_context(mut self, context: SubCallContext) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }
}

impl std::fmt::Debug for SubCallOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubCallOptions")
            .field("max_depth", &self.max_depth)
            .field("concurrency", &self.concurrency)
            .field("timeout", &self.timeout)
            .field("tools", &self.tools.as_ref().map(Vec::len))
            .field("has_gateway", &self.gateway.is_some())
            .field("context", &self.context)
            .finish()
    }
}
