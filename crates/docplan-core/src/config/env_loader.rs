//! Environment variable-based configuration overrides

use super::model::DocplanConfig;
use crate::error::{DocplanError, DocplanResult};
use std::str::FromStr;

/// Overlay variables resolved through `lookup` onto `config`
///
/// Recognised keys: `DOCPLAN_MAX_DEPTH`, `DOCPLAN_CONCURRENCY`,
/// `DOCPLAN_TIMEOUT_MS`, `DOCPLAN_MAX_TOKENS`, `DOCPLAN_LOG_LEVEL`,
/// `DOCPLAN_LOG_FORMAT`.
pub fn apply_env_vars<F>(config: &mut DocplanConfig, lookup: F) -> DocplanResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(max_depth) = parse_var(&lookup, "DOCPLAN_MAX_DEPTH")? {
        config.subcall.max_depth = max_depth;
    }

    if let Some(concurrency) = parse_var(&lookup, "DOCPLAN_CONCURRENCY")? {
        config.subcall.concurrency = concurrency;
        config.executor.concurrency = concurrency;
    }

    if let Some(timeout_ms) = parse_var::<u64, _>(&lookup, "DOCPLAN_TIMEOUT_MS")? {
        let timeout = (timeout_ms > 0).then_some(timeout_ms);
        config.subcall.timeout_ms = timeout;
        config.executor.timeout_ms = timeout;
    }

    if let Some(max_tokens) = parse_var(&lookup, "DOCPLAN_MAX_TOKENS")? {
        config.subcall.max_tokens = max_tokens;
    }

    if let Some(level) = lookup("DOCPLAN_LOG_LEVEL") {
        config.logging.level = level;
    }

    if let Some(format) = parse_var(&lookup, "DOCPLAN_LOG_FORMAT")? {
        config.logging.format = format;
    }

    Ok(())
}

fn parse_var<T, F>(lookup: &F, key: &str) -> DocplanResult<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| DocplanError::config(format!("Invalid {} value: '{}'", key, raw))),
    }
}
