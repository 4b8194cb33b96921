//! Code security validator

use super::rules::{ValidationRule, default_rules};
use crate::error::{DocplanError, DocplanResult};
use tracing::warn;

/// Ordered, first-match-wins scan over model-authored code.
#[derive(Debug, Clone)]
pub struct CodeSecurityValidator {
    rules: Vec<ValidationRule>,
}

impl CodeSecurityValidator {
    /// Create a validator with the built-in rule set
    pub fn new() -> Self {
        Self {
            rules: default_rules(),
        }
    }

    /// Create a validator over a caller-supplied ordered rule table
    pub fn with_rules(rules: Vec<ValidationRule>) -> Self {
        Self { rules }
    }

    /// The rules in evaluation order
    pub fn rules(&self) -> &[ValidationRule] {
        &self.rules
    }

    /// Return the first rule matching `code`, if any.
    ///
    /// Empty and whitespace-only snippets never match.
    pub fn check(&self, code: &str) -> Option<&ValidationRule> {
        if code.trim().is_empty() {
            return None;
        }
        self.rules.iter().find(|rule| rule.matches(code))
    }

    /// Reject `code` with the first violated rule.
    pub fn validate(&self, code: &str) -> DocplanResult<()> {
        match self.check(code) {
            Some(rule) => {
                warn!(
                    violation = rule.violation.as_str(),
                    code_len = code.len(),
                    "Rejected code snippet"
                );
                Err(DocplanError::security(rule.violation, rule.message.clone()))
            }
            None => Ok(()),
        }
    }

    pub fn is_allowed(&self, code: &str) -> bool {
        self.check(code).is_none()
    }
}

impl Default for CodeSecurityValidator {
    fn default() -> Self {
        Self::new()
    }
}
