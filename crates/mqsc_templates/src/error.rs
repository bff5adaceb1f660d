//! Error types for template processing.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Errors that can occur while discovering, rendering or writing templates.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Failed to read template fragment {path}: {source}")]
    FragmentRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write output {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to clean output directory {path}: {message}")]
    Clean { path: PathBuf, message: String },

    #[error("Invalid fragment extension '{extension}': {message}")]
    Pattern { extension: String, message: String },

    #[error("Failed to build token matcher for environment '{environment}': {message}")]
    Matcher { environment: String, message: String },
}
