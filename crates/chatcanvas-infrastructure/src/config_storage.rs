//! TOML-backed configuration storage.

use std::path::{Path, PathBuf};

use chatcanvas_core::config::ChatCanvasConfig;
use chatcanvas_core::error::{ChatCanvasError, Result};
use tokio::fs;

use crate::paths::ChatCanvasPaths;

/// Reads and writes `config.toml`.
///
/// A missing or empty file is not an error: loading yields the defaults,
/// so a fresh install runs against `http://localhost:10002` without setup.
#[derive(Debug, Clone)]
pub struct ConfigStorage {
    path: PathBuf,
}

impl ConfigStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Storage at `~/.config/chatcanvas/config.toml`.
    pub fn default_location() -> Result<Self> {
        let path = ChatCanvasPaths::config_file()
            .map_err(|e| ChatCanvasError::config(e.to_string()))?;
        Ok(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the configuration.
    ///
    /// # Errors
    ///
    /// Fails when the file exists but cannot be read or is not valid TOML.
    pub async fn load(&self) -> Result<ChatCanvasConfig> {
        if !fs::try_exists(&self.path).await? {
            tracing::debug!(path = %self.path.display(), "No config file, using defaults");
            return Ok(ChatCanvasConfig::default());
        }

        let content = fs::read_to_string(&self.path).await.map_err(|e| {
            ChatCanvasError::io(format!(
                "Failed to read config file at {:?}: {}",
                self.path, e
            ))
        })?;

        if content.trim().is_empty() {
            return Ok(ChatCanvasConfig::default());
        }

        let config = toml::from_str(&content)?;
        tracing::debug!(path = %self.path.display(), "Loaded config");
        Ok(config)
    }

    /// Writes the configuration, creating the parent directory if needed.
    pub async fn save(&self, config: &ChatCanvasConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                ChatCanvasError::io(format!(
                    "Failed to create config directory at {:?}: {}",
                    parent, e
                ))
            })?;
        }

        let toml_string = toml::to_string_pretty(config)?;
        fs::write(&self.path, toml_string).await.map_err(|e| {
            ChatCanvasError::io(format!(
                "Failed to write config file at {:?}: {}",
                self.path, e
            ))
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let storage = ConfigStorage::new(dir.path().join("config.toml"));

        let config = storage.load().await.unwrap();
        assert_eq!(config, ChatCanvasConfig::default());
    }

    #[tokio::test]
    async fn test_empty_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "  \n").unwrap();

        let config = ConfigStorage::new(path).load().await.unwrap();
        assert_eq!(config, ChatCanvasConfig::default());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let storage = ConfigStorage::new(dir.path().join("nested").join("config.toml"));

        let mut config = ChatCanvasConfig::default();
        config.agent.endpoint = "https://agent.example.com".to_string();
        config.logging.format = "json".to_string();
        storage.save(&config).await.unwrap();

        let loaded = storage.load().await.unwrap();
        assert_eq!(loaded.agent.endpoint, "https://agent.example.com");
        assert_eq!(loaded.logging.format, "json");
    }

    #[tokio::test]
    async fn test_invalid_toml_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[agent\nendpoint = ").unwrap();

        let err = ConfigStorage::new(path).load().await.unwrap_err();
        assert!(err.is_serialization());
    }
}
