//! Gate in front of the external code-isolation runtime

use crate::error::DocplanResult;
use crate::security::CodeSecurityValidator;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Value produced by a snippet plus anything it logged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SandboxOutput {
    pub value: Value,
    #[serde(default)]
    pub logs: Vec<String>,
}

impl SandboxOutput {
    pub fn new(value: Value) -> Self {
        Self {
            value,
            logs: Vec::new(),
        }
    }
}

/// An isolated runtime that executes code against retrieved content
#[async_trait]
pub trait CodeSandbox: Send + Sync {
    async fn execute(&self, code: &str, input: Value) -> DocplanResult<SandboxOutput>;
}

/// Validates every snippet before handing it to the wrapped runtime
#[derive(Debug, Clone)]
pub struct GatedSandbox<S> {
    validator: CodeSecurityValidator,
    runtime: S,
}

impl<S: CodeSandbox> GatedSandbox<S> {
    pub fn new(runtime: S) -> Self {
        Self {
            validator: CodeSecurityValidator::new(),
            runtime,
        }
    }

    pub fn with_validator(mut self, validator: CodeSecurityValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn runtime(&self) -> &S {
        &self.runtime
    }
}

#[async_trait]
impl<S: CodeSandbox> CodeSandbox for GatedSandbox<S> {
    async fn execute(&self, code: &str, input: Value) -> DocplanResult<SandboxOutput> {
        self.validator.validate(code)?;
        debug!(code_len = code.len(), "Snippet passed validation");
        self.runtime.execute(code, input).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DocplanError;
    use crate::security::Violation;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio_test::{assert_err, assert_ok};

    #[derive(Default)]
    struct CountingRuntime {
        runs: AtomicUsize,
    }

    #[async_trait]
    impl CodeSandbox for CountingRuntime {
        async fn execute(&self, _code: &str, input: Value) -> DocplanResult<SandboxOutput> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            Ok(SandboxOutput::new(input))
        }
    }

    #[tokio::test]
    async fn test_valid_code_reaches_runtime() {
        let sandbox = GatedSandbox::new(CountingRuntime::default());
        let output = assert_ok!(sandbox.execute("return input.length", json!([1, 2])).await);
        assert_eq!(output.value, json!([1, 2]));
        assert_eq!(sandbox.runtime().runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_rejected_code_never_reaches_runtime() {
        let sandbox = GatedSandbox::new(CountingRuntime::default());
        let err = assert_err!(sandbox.execute("fetch('http://x')", Value::Null).await);
        assert!(matches!(
            err,
            DocplanError::Security {
                violation: Violation::Fetch,
                ..
            }
        ));
        assert_eq!(sandbox.runtime().runs.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_snippet_is_forwarded() {
        let sandbox = GatedSandbox::new(CountingRuntime::default());
        assert_ok!(sandbox.execute("  ", Value::Null).await);
        assert_eq!(sandbox.runtime().runs.load(Ordering::SeqCst), 1);
    }
}
