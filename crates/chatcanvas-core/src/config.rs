use serde::{Deserialize, Serialize};

/// Fallback agent name used until (or unless) the agent card arrives.
pub const DEFAULT_AGENT_NAME: &str = "Agent";

/// Fallback agent icon.
pub const DEFAULT_AGENT_ICON_URL: &str = "gemini-color.svg";

/// Catalog advertised to agents when none is configured.
pub const STANDARD_CATALOG_ID: &str =
    "https://github.com/google/A2UI/blob/main/specification/0.8/json/standard_catalog_definition.json";

/// Root of `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ChatCanvasConfig {
    pub agent: AgentConfig,
    pub logging: LoggingConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AgentConfig {
    /// Base URL of the agent; `/a2a` and `/a2a/agent-card` are appended.
    pub endpoint: String,
    pub default_name: String,
    pub default_icon_url: String,
    pub supported_catalog_ids: Vec<String>,
    /// 0 disables the timeout.
    pub request_timeout_secs: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:10002".to_string(),
            default_name: DEFAULT_AGENT_NAME.to_string(),
            default_icon_url: DEFAULT_AGENT_ICON_URL.to_string(),
            supported_catalog_ids: vec![STANDARD_CATALOG_ID.to_string()],
            request_timeout_secs: 120,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives; overridden by `CHATCANVAS_LOG` / `RUST_LOG`.
    pub filter: String,
    /// `pretty`, `compact` or `json`.
    pub format: String,
    /// Directory for daily rolling log files. Console only when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            format: "compact".to_string(),
            log_dir: None,
        }
    }
}
