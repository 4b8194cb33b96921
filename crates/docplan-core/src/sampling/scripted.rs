//! Deterministic sampling gateway for tests

use super::gateway::SamplingGateway;
use super::types::{SamplingRequest, SamplingResponse};
use crate::error::{DocplanError, DocplanResult};
use async_trait::async_trait;
use parking_lot::Mutex;
use regex::Regex;
use std::sync::Arc;
use std::time::Duration;

/// Content returned when no rule matches and no generator is configured
pub const DEFAULT_MOCK_RESPONSE: &str = "Mock response";

type ResponseGenerator = Arc<dyn Fn(&SamplingRequest) -> SamplingResponse + Send + Sync>;

#[derive(Debug, Clone)]
enum Matcher {
    Pattern(Regex),
    Exact(String),
}

impl Matcher {
    fn matches(&self, content: &str) -> bool {
        match self {
            Matcher::Pattern(pattern) => pattern.is_match(content),
            Matcher::Exact(text) => text == content,
        }
    }
}

#[derive(Debug, Clone)]
enum Reply {
    Respond(SamplingResponse),
    Fail(String),
}

#[derive(Debug, Clone)]
struct ScriptedRule {
    matcher: Matcher,
    reply: Reply,
    delay: Option<Duration>,
}

/// Replies from an ordered rule list matched against the latest message.
///
/// Pattern rules always sit ahead of exact rules, whatever the
/// registration order; within each group the first registered rule wins.
/// Unmatched requests go to the default generator, then to
/// [`DEFAULT_MOCK_RESPONSE`].
#[derive(Clone, Default)]
pub struct ScriptedSamplingGateway {
    rules: Vec<ScriptedRule>,
    default_generator: Option<ResponseGenerator>,
    latency: Option<Duration>,
    requests: Arc<Mutex<Vec<SamplingRequest>>>,
}

impl ScriptedSamplingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply with `response` when the latest message equals `content`
    pub fn on_exact(mut self, content: impl Into<String>, response: SamplingResponse) -> Self {
        self.rules.push(ScriptedRule {
            matcher: Matcher::Exact(content.into()),
            reply: Reply::Respond(response),
            delay: None,
        });
        self
    }

    /// Reply with `response` when the latest message matches `pattern`
    pub fn on_pattern(self, pattern: Regex, response: SamplingResponse) -> Self {
        self.push_pattern(pattern, Reply::Respond(response), None)
    }

    /// Reply with `response` after `delay` when `pattern` matches
    pub fn slow_on_pattern(self, pattern: Regex, delay: Duration, response: SamplingResponse) -> Self {
        self.push_pattern(pattern, Reply::Respond(response), Some(delay))
    }

    /// Fail with a sampling error when `pattern` matches
    pub fn fail_on_pattern(self, pattern: Regex, message: impl Into<String>) -> Self {
        self.push_pattern(pattern, Reply::Fail(message.into()), None)
    }

    /// Build replies for requests no rule matched
    pub fn with_default_generator<F>(mut self, generator: F) -> Self
    where
        F: Fn(&SamplingRequest) -> SamplingResponse + Send + Sync + 'static,
    {
        self.default_generator = Some(Arc::new(generator));
        self
    }

    /// Delay every reply by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Requests received so far, in arrival order
    pub fn requests(&self) -> Vec<SamplingRequest> {
        self.requests.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    fn push_pattern(mut self, pattern: Regex, reply: Reply, delay: Option<Duration>) -> Self {
        let position = self
            .rules
            .iter()
            .position(|rule| matches!(rule.matcher, Matcher::Exact(_)))
            .unwrap_or(self.rules.len());
        self.rules.insert(
            position,
            ScriptedRule {
                matcher: Matcher::Pattern(pattern),
                reply,
                delay,
            },
        );
        self
    }

    fn resolve(&self, request: &SamplingRequest) -> (Reply, Option<Duration>) {
        let content = request.latest_content().unwrap_or_default();
        if let Some(rule) = self.rules.iter().find(|rule| rule.matcher.matches(content)) {
            return (rule.reply.clone(), rule.delay);
        }
        let response = match &self.default_generator {
            Some(generator) => generator(request),
            None => SamplingResponse::text(DEFAULT_MOCK_RESPONSE),
        };
        (Reply::Respond(response), None)
    }
}

#[async_trait]
impl SamplingGateway for ScriptedSamplingGateway {
    async fn create_message(&self, request: SamplingRequest) -> DocplanResult<SamplingResponse> {
        let (reply, delay) = self.resolve(&request);
        self.requests.lock().push(request);

        let wait = self.latency.unwrap_or_default() + delay.unwrap_or_default();
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }

        match reply {
            Reply::Respond(response) => Ok(response),
            Reply::Fail(message) => Err(DocplanError::sampling(message)),
        }
    }
}

impl std::fmt::Debug for ScriptedSamplingGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedSamplingGateway")
            .field("rules", &self.rules.len())
            .field("has_default_generator", &self.default_generator.is_some())
            .field("latency", &self.latency)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::StopReason;

    fn regex(pattern: &str) -> Regex {
        Regex::new(pattern).unwrap()
    }

    async fn reply_to(gateway: &ScriptedSamplingGateway, content: &str) -> DocplanResult<String> {
        gateway
            .create_message(SamplingRequest::user(content))
            .await
            .map(|r| r.content)
    }

    #[tokio::test]
    async fn test_canned_fallback() {
        let gateway = ScriptedSamplingGateway::new();
        assert_eq!(reply_to(&gateway, "anything").await.unwrap(), DEFAULT_MOCK_RESPONSE);
    }

    #[tokio::test]
    async fn test_exact_match() {
        let gateway =
            ScriptedSamplingGateway::new().on_exact("ping", SamplingResponse::text("pong"));
        assert_eq!(reply_to(&gateway, "ping").await.unwrap(), "pong");
        assert_eq!(reply_to(&gateway, "ping!").await.unwrap(), DEFAULT_MOCK_RESPONSE);
    }

    #[tokio::test]
    async fn test_pattern_beats_exact_regardless_of_registration_order() {
        let gateway = ScriptedSamplingGateway::new()
            .on_exact("summarize intro", SamplingResponse::text("exact"))
            .on_pattern(regex("^summarize"), SamplingResponse::text("pattern"))
            .on_pattern(regex("intro$"), SamplingResponse::text("second pattern"));

        assert_eq!(reply_to(&gateway, "summarize intro").await.unwrap(), "pattern");
        assert_eq!(reply_to(&gateway, "the intro").await.unwrap(), "second pattern");
    }

    #[tokio::test]
    async fn test_default_generator_used_when_nothing_matches() {
        let gateway = ScriptedSamplingGateway::new()
            .on_exact("known", SamplingResponse::text("rule"))
            .with_default_generator(|request| {
                SamplingResponse::text(request.latest_content().unwrap_or_default().len().to_string())
            });

        assert_eq!(reply_to(&gateway, "known").await.unwrap(), "rule");
        assert_eq!(reply_to(&gateway, "abcd").await.unwrap(), "4");
    }

    #[tokio::test]
    async fn test_matching_uses_latest_message_only() {
        let gateway = ScriptedSamplingGateway::new()
            .on_pattern(regex("secret"), SamplingResponse::text("matched"));
        let request = SamplingRequest::new(vec![
            crate::sampling::SamplingMessage::user("secret"),
            crate::sampling::SamplingMessage::user("plain"),
        ]);
        let response = gateway.create_message(request).await.unwrap();
        assert_eq!(response.content, DEFAULT_MOCK_RESPONSE);
    }

    #[tokio::test]
    async fn test_failure_rule_and_request_log() {
        let gateway = ScriptedSamplingGateway::new().fail_on_pattern(regex("bad"), "rate limited");
        let err = reply_to(&gateway, "bad input").await.unwrap_err();
        assert_eq!(err, DocplanError::sampling("rate limited"));
        assert_eq!(reply_to(&gateway, "fine").await.unwrap(), DEFAULT_MOCK_RESPONSE);

        assert_eq!(gateway.call_count(), 2);
        let requests = gateway.requests();
        assert_eq!(requests[0].latest_content(), Some("bad input"));
        assert_eq!(requests[1].latest_content(), Some("fine"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_rule_delays_reply() {
        let gateway = ScriptedSamplingGateway::new().slow_on_pattern(
            regex("slow"),
            Duration::from_millis(50),
            SamplingResponse::text("late").with_stop_reason(StopReason::MaxTokens),
        );
        let started = tokio::time::Instant::now();
        let response = gateway
            .create_message(SamplingRequest::user("slow one"))
            .await
            .unwrap();
        assert!(started.elapsed() >= Duration::from_millis(50));
        assert_eq!(response.stop_reason, StopReason::MaxTokens);
    }

    #[tokio::test]
    async fn test_clones_share_request_log() {
        let gateway = ScriptedSamplingGateway::new();
        let observer = gateway.clone();
        reply_to(&gateway, "x").await.unwrap();
        assert_eq!(observer.call_count(), 1);
    }
}
