//! Error types for the engine.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that stop a run.
///
/// Unreadable fragments and failed writes do not stop a run; they are
/// collected in the [`RunReport`](crate::RunReport) instead.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration load failed: {0}")]
    ConfigLoad(#[from] mqsc_config::ConfigError),

    #[error("Output directory {output} would delete the input {input}")]
    UnsafeOutputRoot { output: PathBuf, input: PathBuf },

    #[error("Release group '{name}' under {source_dir} clashes with the combined scope name")]
    ReservedGroupName { name: String, source_dir: PathBuf },

    #[error("Could not rebuild the output tree: {0}")]
    Clean(#[source] mqsc_templates::TemplateError),

    #[error("Template error: {0}")]
    Template(#[from] mqsc_templates::TemplateError),
}
