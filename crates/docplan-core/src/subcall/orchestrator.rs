//! Sub-call orchestrator

use super::context::SubCallContext;
use super::options::{SubCallInput, SubCallOptions};
use super::result::SubCallResult;
use crate::config::SubCallConfig;
use crate::error::{DocplanError, DocplanResult};
use crate::executor::{BatchSummary, ParallelExecutor};
use crate::sampling::{SamplingRequest, SharedSamplingGateway, ToolChoice, ToolDefinition};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Capability name reported when no sampling gateway is available
const SAMPLING_CAPABILITY: &str = "sampling";

/// Delegates batches of items to the model, one sampling request per item
#[derive(Clone, Default)]
pub struct SubCallOrchestrator {
    config: SubCallConfig,
    gateway: Option<SharedSamplingGateway>,
}

impl SubCallOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &SubCallConfig) -> Self {
        Self {
            config: config.clone(),
            gateway: None,
        }
    }

    /// Gateway used when the per-call options do not carry one
    pub fn with_gateway(mut self, gateway: SharedSamplingGateway) -> Self {
        self.gateway = Some(gateway);
        self
    }

    pub fn config(&self) -> &SubCallConfig {
        &self.config
    }

    /// Delegate every item with `prompt` and collect one result per item.
    ///
    /// Returns `Err` only for structural problems that stop the whole call
    /// (the depth budget). Timeouts, gateway failures and a missing gateway
    /// are reported in the affected item's [`SubCallResult`].
    pub async fn process(
        &self,
        input: impl Into<SubCallInput>,
        prompt: &str,
        options: SubCallOptions,
    ) -> DocplanResult<Vec<SubCallResult>> {
        let items = input.into().into_items();
        if items.is_empty() {
            debug!("No items to delegate");
            return Ok(Vec::new());
        }

        let context = self.resolve_context(&options);
        if let Err(err) = context.ensure_can_delegate() {
            warn!(
                depth = context.depth,
                max_depth = context.max_depth,
                parent_path = context.parent_path.as_deref().unwrap_or(""),
                "Refusing sub-call past depth budget"
            );
            return Err(err);
        }

        let gateway = options.gateway.clone().or_else(|| self.gateway.clone());
        let executor = self.executor_for(&options);
        let requests: Vec<SamplingRequest> = items
            .iter()
            .map(|item| self.build_request(prompt, item, options.tools.clone()))
            .collect();

        debug!(
            items = requests.len(),
            depth = context.depth,
            concurrency = executor.concurrency(),
            timeout_ms = executor.timeout().map(|t| t.as_millis() as u64),
            task_id = context.task_id.as_deref().unwrap_or(""),
            "Dispatching sub-calls"
        );

        let started = Instant::now();
        let outcomes = executor
            .run(requests, |request, _index| {
                let gateway = gateway.clone();
                async move {
                    match gateway {
                        Some(gateway) => gateway.create_message(request).await,
                        None => Err(DocplanError::capability_unavailable(SAMPLING_CAPABILITY)),
                    }
                }
            })
            .await;

        let summary = BatchSummary::from_outcomes(&outcomes);
        info!(
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            timed_out = summary.timed_out,
            depth = context.depth,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Sub-calls finished"
        );

        Ok(outcomes
            .into_iter()
            .enumerate()
            .map(|(index, outcome)| SubCallResult::from_outcome(index, outcome))
            .collect())
    }

    fn resolve_context(&self, options: &SubCallOptions) -> SubCallContext {
        let max_depth = options.max_depth.unwrap_or(self.config.max_depth);
        match &options.context {
            Some(parent) => SubCallContext {
                max_depth: options.max_depth.unwrap_or(parent.max_depth),
                ..parent.clone()
            },
            None => SubCallContext::root(max_depth),
        }
    }

    fn executor_for(&self, options: &SubCallOptions) -> ParallelExecutor {
        let concurrency = options.concurrency.unwrap_or(self.config.concurrency);
        let timeout = options
            .timeout
            .or_else(|| self.config.timeout_ms.map(Duration::from_millis))
            .unwrap_or(Duration::ZERO);

        let executor = ParallelExecutor::new(concurrency).with_timeout(timeout);
        match &options.cancellation_token {
            Some(token) => executor.with_cancellation_token(token.child_token()),
            None => executor,
        }
    }

    fn build_request(
        &self,
        prompt: &str,
        item: &Value,
        tools: Option<Vec<ToolDefinition>>,
    ) -> SamplingRequest {
        let tool_choice = match &tools {
            Some(tools) if !tools.is_empty() => ToolChoice::Auto,
            _ => ToolChoice::None,
        };

        let mut request = SamplingRequest::user(build_prompt(prompt, item))
            .with_tool_choice(tool_choice)
            .with_max_tokens(self.config.max_tokens);
        request.tools = tools;
        request
    }
}

impl std::fmt::Debug for SubCallOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubCallOrchestrator")
            .field("config", &self.config)
            .field("has_gateway", &self.gateway.is_some())
            .finish()
    }
}

/// Human-readable rendering of an item: strings verbatim, anything else as
/// pretty-printed JSON
pub fn describe_item(item: &Value) -> String {
    match item {
        Value::String(text) => text.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

/// The instruction followed by the item under a `Context:` label
pub fn build_prompt(prompt: &str, item: &Value) -> String {
    format!("{}\n\nContext:\n{}", prompt, describe_item(item))
}
