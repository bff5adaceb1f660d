//! Error types for configuration loading.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading the environment configuration or the
/// generator settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment configuration not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read environment configuration {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed environment configuration {path}: {message}")]
    Malformed { path: PathBuf, message: String },

    #[error("Environment '{name}' is declared more than once in {path}")]
    DuplicateEnvironment { path: PathBuf, name: String },

    #[error("Failed to read settings file {path}: {source}")]
    SettingsIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings file {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
