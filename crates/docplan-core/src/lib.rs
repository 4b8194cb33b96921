//! Docplan Core Library
//!
//! Sub-call orchestration core of the docplan document-planning server:
//! a pre-execution gate for model-authored code, a bounded-concurrency
//! parallel executor, the sampling gateway seam, and the depth-limited
//! orchestrator that fans extracted items out as model sub-queries.

pub mod config;
pub mod error;
pub mod executor;
pub mod logging;
pub mod sampling;
pub mod sandbox;
pub mod security;
pub mod subcall;

// Re-export commonly used types
pub use config::{ConfigLoader, DocplanConfig, ExecutorConfig, LoggingConfig, SubCallConfig};
pub use error::{DocplanError, DocplanResult, UnifiedError};
pub use executor::{BatchSummary, FailureKind, Outcome, ParallelExecutor};
pub use sampling::{
    SamplingGateway, SamplingRequest, SamplingResponse, ScriptedSamplingGateway,
    SharedSamplingGateway, StopReason, ToolChoice, ToolDefinition,
};
pub use sandbox::{CodeSandbox, GatedSandbox, SandboxOutput};
pub use security::{CodeSecurityValidator, ValidationRule, Violation};
pub use subcall::{SubCallContext, SubCallInput, SubCallOptions, SubCallOrchestrator, SubCallResult};
