//! Coordinator configuration.
//!
//! Loaded from a JSON file by the binary, with every field defaulting so
//! an empty object (or a missing file) yields a working configuration.
//! Durations are encoded as integer milliseconds on the wire.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(String),

    #[error("Failed to parse config file: {0}")]
    Parse(String),
}

/// Top-level configuration for one window's coordinator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// Cadence of position publishing.
    #[serde(default = "default_interval", with = "duration_ms")]
    pub publish_interval: Duration,

    /// Cadence of indicator rendering. Independent of the publish
    /// cadence.
    #[serde(default = "default_interval", with = "duration_ms")]
    pub render_interval: Duration,

    #[serde(default)]
    pub store: StoreConfig,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            publish_interval: default_interval(),
            render_interval: default_interval(),
            store: StoreConfig::default(),
        }
    }
}

impl CoordinatorConfig {
    /// Load configuration from a JSON file, falling back to defaults if
    /// the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

/// Configuration for the file-backed shared store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory shared by every window process of the group.
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,

    /// File extension for record files.
    #[serde(default = "default_file_extension")]
    pub file_extension: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            file_extension: default_file_extension(),
        }
    }
}

fn default_interval() -> Duration {
    Duration::from_millis(150)
}

fn default_base_dir() -> PathBuf {
    PathBuf::from(".winlink")
}

fn default_file_extension() -> String {
    "json".to_string()
}

pub mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = CoordinatorConfig::default();
        assert_eq!(config.publish_interval, Duration::from_millis(150));
        assert_eq!(config.render_interval, Duration::from_millis(150));
        assert_eq!(config.store.base_dir, PathBuf::from(".winlink"));
        assert_eq!(config.store.file_extension, "json");
    }

    #[test]
    fn test_empty_object_yields_defaults() {
        let config: CoordinatorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.publish_interval, Duration::from_millis(150));
    }

    #[test]
    fn test_durations_encoded_as_millis() {
        let config: CoordinatorConfig =
            serde_json::from_str(r#"{"publish_interval": 50, "render_interval": 200}"#).unwrap();
        assert_eq!(config.publish_interval, Duration::from_millis(50));
        assert_eq!(config.render_interval, Duration::from_millis(200));

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["publish_interval"], 50);
        assert_eq!(json["render_interval"], 200);
    }

    #[test]
    fn test_load_missing_file_yields_defaults() {
        let config = CoordinatorConfig::load(Path::new("/nonexistent/config.json")).unwrap();
        assert_eq!(config.publish_interval, Duration::from_millis(150));
    }
}
