//! Bounded-concurrency batch execution
//!
//! Items run in consecutive waves of at most `concurrency` operations. A wave
//! must fully settle before the next one starts, every item gets exactly one
//! [`Outcome`] in input order, and no item's failure, timeout or panic can
//! reach its siblings.

mod outcome;
mod parallel;

pub use outcome::{BatchSummary, FailureKind, Outcome};
pub use parallel::ParallelExecutor;
