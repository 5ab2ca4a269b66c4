//! Infrastructure implementation of the `ConfigStore` port.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::application::ports::ConfigStore;
use crate::domain::AuthConfig;

/// Environment variable that points at an alternate config file.
pub const CONFIG_ENV: &str = "KROWN_AUTH_CONFIG";

/// Production implementation of `ConfigStore` that reads a YAML file on disk.
pub struct YamlConfigStore {
    path: Option<PathBuf>,
}

impl YamlConfigStore {
    /// Locate the file from `KROWN_AUTH_CONFIG`, else `~/.krown/config.yaml`.
    #[must_use]
    pub fn from_env() -> Self {
        let path = std::env::var_os(CONFIG_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| {
                super::home::resolve_home()
                    .ok()
                    .map(|h| h.join(".krown").join("config.yaml"))
            });
        Self { path }
    }

    /// Read from an explicit path.
    #[must_use]
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<AuthConfig> {
        let Some(path) = &self.path else {
            return Ok(AuthConfig::default());
        };
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(AuthConfig::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let config: AuthConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("cannot parse {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid config {}", path.display()))?;
        tracing::debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    fn path(&self) -> Option<PathBuf> {
        self.path.clone()
    }
}
