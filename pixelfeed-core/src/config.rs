use crate::error::{ConfigError, CoreError};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Application configuration, loaded from an optional TOML file with
/// environment overrides for secrets.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// API key for the chat provider. The OPENAI_API_KEY environment
    /// variable takes precedence over the config file.
    pub openai_api_key: Option<String>,
    /// Path of the SQLite database holding settings and the shelf.
    pub database_path: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from a TOML file, then apply env overrides.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let contents = std::fs::read_to_string(path).map_err(|_| {
            CoreError::Config(ConfigError::FileNotFound {
                path: path.display().to_string(),
            })
        })?;
        let mut config: AppConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
        config.apply_env_overrides();
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Configuration without a file: defaults plus environment variables.
    pub fn from_env() -> Self {
        let mut config = AppConfig::default();
        config.apply_env_overrides();
        config
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var(OPENAI_API_KEY_VAR) {
            if !key.is_empty() {
                self.openai_api_key = Some(key);
            }
        }
    }

    /// Resolved database path, defaulting to `pixelfeed.db` in the
    /// current directory.
    pub fn database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("pixelfeed.db"))
    }
}
