//! Sampling gateway: the seam to the host's language model
//!
//! The hosting protocol runtime supplies a [`SamplingGateway`]; this crate
//! ships no production implementation. [`ScriptedSamplingGateway`] is a
//! deterministic double for tests and local runs.

mod gateway;
mod scripted;
mod types;

pub use gateway::{SamplingGateway, SharedSamplingGateway};
#[cfg(test)]
pub use gateway::MockSamplingGateway;
pub use scripted::{DEFAULT_MOCK_RESPONSE, ScriptedSamplingGateway};
pub use types::{
    Role, SamplingMessage, SamplingRequest, SamplingResponse, StopReason, ToolCallRecord,
    ToolChoice, ToolDefinition,
};
