//! Configuration for docplan
//!
//! Values are layered: built-in defaults, then a config file (JSON, TOML or
//! YAML), then `DOCPLAN_*` environment variables.

mod env_loader;
mod file_loader;
mod loader;
mod logging_config;
mod model;

pub use env_loader::apply_env_vars;
pub use file_loader::load_from_file;
pub use loader::{ConfigLoader, default_config_path};
pub use logging_config::{LogFormat, LoggingConfig};
pub use model::{DocplanConfig, ExecutorConfig, SUB_CALL_MAX_TOKENS, SubCallConfig};
