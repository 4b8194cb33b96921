//! Rule table for the code security validator

use crate::error::DocplanResult;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Identifier of a rejected code pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Violation {
    #[serde(rename = "require")]
    Require,
    #[serde(rename = "dynamic_import")]
    DynamicImport,
    #[serde(rename = "eval")]
    Eval,
    #[serde(rename = "function_constructor")]
    FunctionConstructor,
    #[serde(rename = "process")]
    Process,
    #[serde(rename = "global")]
    Global,
    #[serde(rename = "globalThis")]
    GlobalThis,
    #[serde(rename = "fetch")]
    Fetch,
    #[serde(rename = "xmlhttprequest")]
    XmlHttpRequest,
    #[serde(rename = "websocket")]
    WebSocket,
    #[serde(rename = "timers")]
    Timers,
    #[serde(rename = "buffer")]
    Buffer,
    #[serde(rename = "array_buffer_transfer")]
    ArrayBufferTransfer,
    #[serde(rename = "proto")]
    Proto,
    #[serde(rename = "constructor_chain")]
    ConstructorChain,
}

impl Violation {
    /// Stable identifier reported to callers
    pub fn as_str(&self) -> &'static str {
        match self {
            Violation::Require => "require",
            Violation::DynamicImport => "dynamic_import",
            Violation::Eval => "eval",
            Violation::FunctionConstructor => "function_constructor",
            Violation::Process => "process",
            Violation::Global => "global",
            Violation::GlobalThis => "globalThis",
            Violation::Fetch => "fetch",
            Violation::XmlHttpRequest => "xmlhttprequest",
            Violation::WebSocket => "websocket",
            Violation::Timers => "timers",
            Violation::Buffer => "buffer",
            Violation::ArrayBufferTransfer => "array_buffer_transfer",
            Violation::Proto => "proto",
            Violation::ConstructorChain => "constructor_chain",
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detection rule: a pattern and the message raised when it matches
#[derive(Debug, Clone)]
pub struct ValidationRule {
    pub violation: Violation,
    pub pattern: Regex,
    pub message: String,
}

impl ValidationRule {
    /// Compile a rule from a pattern string
    pub fn new(
        violation: Violation,
        pattern: &str,
        message: impl Into<String>,
    ) -> DocplanResult<Self> {
        Ok(Self {
            violation,
            pattern: Regex::new(pattern)?,
            message: message.into(),
        })
    }

    /// Whether the rule matches anywhere in `code`
    pub fn matches(&self, code: &str) -> bool {
        self.pattern.is_match(code)
    }
}

// `global` relies on the trailing word boundary so that `globalThis` only
// ever reports the `globalThis` rule below it.
const RULE_TABLE: &[(Violation, &str, &str)] = &[
    (
        Violation::Require,
        r"\brequire\s*\(",
        "require() is not allowed: module loading is disabled",
    ),
    (
        Violation::DynamicImport,
        r"\bimport\s*\(",
        "Dynamic import() is not allowed",
    ),
    (
        Violation::Eval,
        r"\beval\b",
        "eval is not allowed",
    ),
    (
        Violation::FunctionConstructor,
        r"\bFunction\s*\(",
        "The Function constructor is not allowed",
    ),
    (
        Violation::Process,
        r"\bprocess\b",
        "Access to process is not allowed",
    ),
    (
        Violation::Global,
        r"\bglobal\b",
        "Access to global is not allowed",
    ),
    (
        Violation::GlobalThis,
        r"\bglobalThis\b",
        "Access to globalThis is not allowed",
    ),
    (
        Violation::Fetch,
        r"\bfetch\b",
        "fetch is not allowed: network access is disabled",
    ),
    (
        Violation::XmlHttpRequest,
        r"\bXMLHttpRequest\b",
        "XMLHttpRequest is not allowed: network access is disabled",
    ),
    (
        Violation::WebSocket,
        r"\bWebSocket\b",
        "WebSocket is not allowed: network access is disabled",
    ),
    (
        Violation::Timers,
        r"\b(?:setTimeout|setInterval|setImmediate)\s*\(",
        "Timers (setTimeout/setInterval/setImmediate) are not allowed",
    ),
    (
        Violation::Buffer,
        r"\bBuffer\b",
        "Buffer is not allowed",
    ),
    (
        Violation::ArrayBufferTransfer,
        r"\bSharedArrayBuffer\b|\.\s*transfer(?:ToFixedLength)?\s*\(",
        "ArrayBuffer transfer and SharedArrayBuffer are not allowed",
    ),
    (
        Violation::Proto,
        r"__proto__",
        "__proto__ access is not allowed",
    ),
    (
        Violation::ConstructorChain,
        r#"\bconstructor\s*(?:\.\s*constructor\b|\[\s*["'`]constructor["'`]\s*\])"#,
        "constructor.constructor access is not allowed",
    ),
];

static DEFAULT_RULES: LazyLock<Vec<ValidationRule>> = LazyLock::new(|| {
    RULE_TABLE
        .iter()
        .map(|(violation, pattern, message)| {
            ValidationRule::new(*violation, pattern, *message)
                .expect("built-in validation patterns are valid")
        })
        .collect()
});

/// The built-in ordered rule set
pub fn default_rules() -> Vec<ValidationRule> {
    DEFAULT_RULES.clone()
}
