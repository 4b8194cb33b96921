//! Layered configuration loader

use super::env_loader::apply_env_vars;
use super::file_loader::load_from_file;
use super::model::DocplanConfig;
use crate::error::DocplanResult;
use std::env;
use std::path::PathBuf;
use tracing::debug;

/// `<config_dir>/docplan/config.toml`, when a config directory exists
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("docplan").join("config.toml"))
}

/// Builds a [`DocplanConfig`] from defaults, a file and the environment
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_file: Option<PathBuf>,
    use_env: bool,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            config_file: default_config_path(),
            use_env: true,
        }
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    pub fn without_file(mut self) -> Self {
        self.config_file = None;
        self
    }

    pub fn without_env(mut self) -> Self {
        self.use_env = false;
        self
    }

    /// Load and validate the layered configuration
    pub fn load(&self) -> DocplanResult<DocplanConfig> {
        self.load_with(|key| env::var(key).ok())
    }

    /// Same as [`load`](Self::load) with a custom variable source
    pub fn load_with<F>(&self, lookup: F) -> DocplanResult<DocplanConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match &self.config_file {
            Some(path) => {
                debug!(path = %path.display(), "Loading configuration file");
                load_from_file(path)?
            }
            None => DocplanConfig::default(),
        };

        if self.use_env {
            apply_env_vars(&mut config, lookup)?;
        }

        config.validate()?;
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DocplanError;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_env_overrides_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[subcall]\nmax_depth = 2\nconcurrency = 4\n").unwrap();

        let config = ConfigLoader::new()
            .with_file(&path)
            .load_with(|key| (key == "DOCPLAN_CONCURRENCY").then(|| "6".to_string()))
            .unwrap();

        assert_eq!(config.subcall.max_depth, 2);
        assert_eq!(config.subcall.concurrency, 6);
    }

    #[test]
    fn test_without_env_ignores_variables() {
        let config = ConfigLoader::new()
            .without_file()
            .without_env()
            .load_with(|_| Some("not-a-number".to_string()))
            .unwrap();
        assert_eq!(config, DocplanConfig::default());
    }

    #[test]
    fn test_invalid_layered_config_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, r#"{"subcall": {"concurrency": 0}}"#).unwrap();

        let err = ConfigLoader::new()
            .with_file(&path)
            .without_env()
            .load()
            .unwrap_err();
        assert!(matches!(err, DocplanError::InvalidInput { .. }));
    }
}
