//! Error types for docplan
//!
//! Errors fall into two classes:
//! - structural errors (`Security`, `DepthLimit`) abort a whole call before
//!   any work is started and are never retried
//! - runtime errors (timeouts, gateway failures, missing capabilities) are
//!   raised by a single item's operation and captured into that item's slot
//!   by the executor instead of propagating to the caller

mod constructors;
mod conversions;
mod types;
mod unified_error;

pub use types::{DocplanError, DocplanResult, ResultExt, UnifiedError};
