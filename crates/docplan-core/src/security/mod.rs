//! Pre-execution gate for model-authored code.
//!
//! A fast pattern scan that rejects snippets reaching for module loading,
//! dynamic evaluation, host globals, network primitives, timers, raw buffers
//! or prototype tampering. It runs ahead of the isolated runtime that
//! actually executes code and is not an isolation boundary on its own.

mod rules;
mod validator;

pub use rules::{ValidationRule, Violation, default_rules};
pub use validator::CodeSecurityValidator;
