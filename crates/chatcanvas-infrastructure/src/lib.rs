//! Filesystem-backed configuration and process-wide logging.

pub mod config_storage;
pub mod logging;
pub mod paths;

pub use config_storage::ConfigStorage;
pub use logging::{LogConfig, LogFormat};
pub use paths::{ChatCanvasPaths, PathError};
