//! Depth-limited recursive delegation of extracted items to the model
//!
//! [`SubCallOrchestrator::process`] turns a batch of items and an
//! instruction into one sampling request per item, drives them through the
//! [`ParallelExecutor`](crate::executor::ParallelExecutor) and returns one
//! [`SubCallResult`] per item in input order. The depth guard runs before
//! any request is built.

mod context;
mod options;
mod orchestrator;
mod result;

pub use context::SubCallContext;
pub use options::{SubCallInput, SubCallOptions};
pub use orchestrator::{SubCallOrchestrator, build_prompt, describe_item};
pub use result::SubCallResult;
