//! Sampling request and response types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Author of a sampling message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in a sampling conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingMessage {
    pub role: Role,
    pub content: String,
}

impl SamplingMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A caller-supplied capability the model may ask to invoke
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON Schema describing the tool input
    pub input_schema: Value,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: serde_json::json!({"type": "object", "properties": {}}),
        }
    }

    pub fn with_input_schema(mut self, schema: Value) -> Self {
        self.input_schema = schema;
        self
    }
}

/// How the model may use the offered tools
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToolChoice {
    Auto,
    None,
    /// Force a call to the named tool
    ForceTool(String),
}

/// Terminal condition of one sampling round
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    #[default]
    EndTurn,
    ToolUse,
    MaxTokens,
}

/// A tool invocation recorded during sampling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRecord {
    pub name: String,
    pub input: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
}

impl ToolCallRecord {
    pub fn new(name: impl Into<String>, input: Value) -> Self {
        Self {
            name: name.into(),
            input,
            output: None,
        }
    }

    pub fn with_output(mut self, output: Value) -> Self {
        self.output = Some(output);
        self
    }
}

/// A request to create one model message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplingRequest {
    pub messages: Vec<SamplingMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

impl SamplingRequest {
    pub fn new(messages: Vec<SamplingMessage>) -> Self {
        Self {
            messages,
            tools: None,
            tool_choice: None,
            max_tokens: None,
            system_prompt: None,
        }
    }

    /// Single user-message request
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(vec![SamplingMessage::user(content)])
    }

    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn with_tool_choice(mut self, choice: ToolChoice) -> Self {
        self.tool_choice = Some(choice);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Content of the most recent message
    pub fn latest_content(&self) -> Option<&str> {
        self.messages.last().map(|m| m.content.as_str())
    }
}

/// The model's reply to a [`SamplingRequest`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplingResponse {
    pub content: String,
    pub stop_reason: StopReason,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCallRecord>>,
}

impl SamplingResponse {
    /// Plain text reply ending the turn
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            stop_reason: StopReason::EndTurn,
            tool_calls: None,
        }
    }

    pub fn with_stop_reason(mut self, stop_reason: StopReason) -> Self {
        self.stop_reason = stop_reason;
        self
    }

    pub fn with_tool_calls(mut self, tool_calls: Vec<ToolCallRecord>) -> Self {
        self.tool_calls = Some(tool_calls);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_wire_shape() {
        let request = SamplingRequest::user("hello")
            .with_tools(vec![ToolDefinition::new("search", "Search the index")])
            .with_tool_choice(ToolChoice::Auto)
            .with_max_tokens(256);

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["messages"][0], json!({"role": "user", "content": "hello"}));
        assert_eq!(value["toolChoice"], json!("auto"));
        assert_eq!(value["maxTokens"], json!(256));
        assert_eq!(value["tools"][0]["inputSchema"]["type"], json!("object"));
        assert!(value.get("systemPrompt").is_none());
    }

    #[test]
    fn test_forced_tool_choice_shape() {
        let choice = ToolChoice::ForceTool("search".to_string());
        assert_eq!(
            serde_json::to_value(&choice).unwrap(),
            json!({"forceTool": "search"})
        );
        assert_eq!(serde_json::to_value(ToolChoice::None).unwrap(), json!("none"));

        let parsed: ToolChoice = serde_json::from_value(json!({"forceTool": "lookup"})).unwrap();
        assert_eq!(parsed, ToolChoice::ForceTool("lookup".to_string()));
    }

    #[test]
    fn test_response_round_trip_with_tool_calls() {
        let response = SamplingResponse::text("")
            .with_stop_reason(StopReason::ToolUse)
            .with_tool_calls(vec![
                ToolCallRecord::new("search", json!({"q": "auth"})).with_output(json!(["a.md"])),
            ]);
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["stopReason"], json!("tool_use"));
        let parsed: SamplingResponse = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, response);
    }

    #[test]
    fn test_latest_content() {
        let request = SamplingRequest::new(vec![
            SamplingMessage::user("first"),
            SamplingMessage::assistant("reply"),
            SamplingMessage::user("second"),
        ]);
        assert_eq!(request.latest_content(), Some("second"));
        assert_eq!(SamplingRequest::new(Vec::new()).latest_content(), None);
    }
}
