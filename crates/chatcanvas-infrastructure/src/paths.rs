//! Unified path management for chatcanvas files.

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    /// Home directory could not be determined.
    #[error("Cannot find home directory")]
    HomeDirNotFound,
}

/// Unified path management for chatcanvas.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/chatcanvas/        # Config directory
/// └── config.toml              # Application configuration
/// ```
pub struct ChatCanvasPaths;

impl ChatCanvasPaths {
    const APP_DIR: &'static str = "chatcanvas";

    /// Returns the chatcanvas configuration directory (e.g. `~/.config/chatcanvas/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(Self::APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_in_config_dir() {
        // Environments without a home directory cannot resolve anything.
        let Ok(config_dir) = ChatCanvasPaths::config_dir() else {
            return;
        };
        assert!(config_dir.ends_with("chatcanvas"));
        assert_eq!(
            ChatCanvasPaths::config_file().unwrap(),
            config_dir.join("config.toml")
        );
    }
}
