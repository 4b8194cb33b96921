//! Tracing subscriber setup

use crate::config::{LogFormat, LoggingConfig};
use crate::error::{DocplanResult, ResultExt};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber described by `config`.
///
/// `RUST_LOG` takes precedence over the configured level. Logs go to
/// stderr; stdout belongs to the protocol transport.
pub fn init(config: &LoggingConfig) -> DocplanResult<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(build_filter(config)?)
        .with_writer(std::io::stderr);

    let installed = match config.format {
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.config_context("Installing the global tracing subscriber")
}

/// Resolve the filter from `RUST_LOG`, falling back to the configured level
pub fn build_filter(config: &LoggingConfig) -> DocplanResult<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.level)
            .config_context(format!("Parsing log level '{}'", config.level)),
    }
}
