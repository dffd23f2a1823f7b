use std::path::Path;
use std::sync::Arc;

use crate::GameConfig;

/// Errors from reading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config format for {0:?} (expected .yaml, .yml or .json)")]
    UnsupportedFormat(String),
}

/// On-disk configuration formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

impl GameConfig {
    /// Parse a configuration document. Missing fields keep their defaults.
    pub fn parse(text: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        let config = match format {
            ConfigFormat::Yaml => serde_yaml::from_str(text)?,
            ConfigFormat::Json => serde_json::from_str(text)?,
        };
        Ok(config)
    }

    /// Read a configuration file, choosing the format by extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let text = std::fs::read_to_string(path)?;
        let config = Self::parse(&text, format)?;
        tracing::info!(path = %path.display(), ?format, "configuration loaded");
        Ok(config)
    }

    /// Load from `path` if given, otherwise use the reference values.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => {
                tracing::debug!("using built-in configuration");
                Ok(Self::default())
            }
        }
    }

    /// Serialize to the given format.
    pub fn render(&self, format: ConfigFormat) -> Result<String, ConfigError> {
        let text = match format {
            ConfigFormat::Yaml => serde_yaml::to_string(self)?,
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
        };
        Ok(text)
    }

    /// Freeze into the shared, read-only handle used by the rest of the game.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}
