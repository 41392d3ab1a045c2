//! Structured logging setup.
//!
//! ## Environment Variables
//!
//! - `CHATCANVAS_LOG` or `RUST_LOG`: filter directives, overriding `[logging] filter`
//! - `CHATCANVAS_LOG_FORMAT`: `pretty`, `compact` or `json`, overriding `[logging] format`

use std::path::PathBuf;

use chatcanvas_core::config::LoggingConfig;
use chatcanvas_core::error::{ChatCanvasError, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const FALLBACK_FILTER: &str = "info";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable, multi-line
    Pretty,
    /// Single-line output
    #[default]
    Compact,
    /// JSON lines for log aggregation
    Json,
}

impl LogFormat {
    /// Parses a format name, case-insensitively. Unknown names fall back to compact.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            "pretty" => Self::Pretty,
            _ => Self::Compact,
        }
    }
}

/// Resolved logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub filter: String,
    pub format: LogFormat,
    /// Daily rolling files are written here in addition to stderr.
    pub log_dir: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: FALLBACK_FILTER.to_string(),
            format: LogFormat::default(),
            log_dir: None,
        }
    }
}

impl LogConfig {
    /// Builds the configuration from `config.toml`, then applies environment overrides.
    pub fn from_config(config: &LoggingConfig) -> Self {
        Self::resolve(config, |key| std::env::var(key).ok())
    }

    fn resolve(config: &LoggingConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        let filter = env("CHATCANVAS_LOG")
            .or_else(|| env("RUST_LOG"))
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| config.filter.clone());
        let format = env("CHATCANVAS_LOG_FORMAT")
            .map(|value| LogFormat::parse(&value))
            .unwrap_or_else(|| LogFormat::parse(&config.format));

        Self {
            filter,
            format,
            log_dir: config.log_dir.as_ref().map(PathBuf::from),
        }
    }
}

/// Installs the global subscriber.
///
/// Returns the file writer guard when file output is enabled; it must be held
/// for the lifetime of the process or buffered lines are lost.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_new(&config.filter).unwrap_or_else(|e| {
        eprintln!(
            "Invalid log filter {:?} ({e}), using {FALLBACK_FILTER:?}",
            config.filter
        );
        EnvFilter::new(FALLBACK_FILTER)
    });

    let (file_writer, guard) = match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "chatcanvas.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(writer), Some(guard))
        }
        None => (None, None),
    };
    // Files always get JSON lines, independent of the console format.
    let file_layer = file_writer.map(|writer| fmt::layer().json().with_writer(writer));

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer);

    let result = match config.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init(),
    };
    result.map_err(|e| ChatCanvasError::config(format!("Failed to initialize logging: {e}")))?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_log_format_parsing() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("compact"), LogFormat::Compact);
        assert_eq!(LogFormat::parse("unknown"), LogFormat::Compact);
    }

    #[test]
    fn test_config_values_without_env() {
        let logging = LoggingConfig {
            filter: "chatcanvas_application=debug".to_string(),
            format: "pretty".to_string(),
            log_dir: Some("/tmp/chatcanvas-logs".to_string()),
        };

        let config = LogConfig::resolve(&logging, env_of(&[]));
        assert_eq!(config.filter, "chatcanvas_application=debug");
        assert_eq!(config.format, LogFormat::Pretty);
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/chatcanvas-logs")));
    }

    #[test]
    fn test_env_overrides_config() {
        let logging = LoggingConfig::default();

        let config = LogConfig::resolve(
            &logging,
            env_of(&[
                ("RUST_LOG", "warn"),
                ("CHATCANVAS_LOG", "trace"),
                ("CHATCANVAS_LOG_FORMAT", "json"),
            ]),
        );
        assert_eq!(config.filter, "trace");
        assert_eq!(config.format, LogFormat::Json);

        let rust_log_only = LogConfig::resolve(&logging, env_of(&[("RUST_LOG", "warn")]));
        assert_eq!(rust_log_only.filter, "warn");
        assert_eq!(rust_log_only.format, LogFormat::Compact);
    }
}
