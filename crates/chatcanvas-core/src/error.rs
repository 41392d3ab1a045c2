//! Error types for ChatCanvas.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire ChatCanvas workspace.
///
/// Transport-side variants (`Transport`, `Upstream`, `Cancelled`) are expected at
/// runtime and are folded into visible history by the conversation session.
/// `ComponentLoad` is a programmer defect and is propagated to the caller.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum ChatCanvasError {
    /// The in-flight request was aborted through its cancellation token.
    #[error("Request cancelled")]
    Cancelled,

    /// Network-level failure reaching the agent.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The agent answered with a non-success status.
    #[error("Upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// A renderer or decorator loader failed.
    #[error("Failed to load component for '{key}': {message}")]
    ComponentLoad { key: String, message: String },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ChatCanvasError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates an Upstream error
    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    /// Creates a ComponentLoad error
    pub fn component_load(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ComponentLoad {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this error is a cancellation of the in-flight request
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Check if this error came from the transport or the agent
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Upstream { .. })
    }

    /// Check if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for ChatCanvasError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for ChatCanvasError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ChatCanvasError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for ChatCanvasError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error, used by loaders written against anyhow
impl From<anyhow::Error> for ChatCanvasError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, ChatCanvasError>`.
pub type Result<T> = std::result::Result<T, ChatCanvasError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_is_distinguished() {
        assert!(ChatCanvasError::Cancelled.is_cancelled());
        assert!(!ChatCanvasError::transport("reset").is_cancelled());
        assert!(ChatCanvasError::upstream(502, "bad gateway").is_upstream());
    }

    #[test]
    fn test_json_error_conversion() {
        let err: ChatCanvasError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(err.is_serialization());
        assert!(err.to_string().starts_with("Serialization error: JSON"));
    }

    #[test]
    fn test_upstream_display() {
        let err = ChatCanvasError::upstream(500, "agent exploded");
        assert_eq!(err.to_string(), "Upstream error (500): agent exploded");
    }
}
