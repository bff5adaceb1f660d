//! Generator settings.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};

/// Conventional location of the environment configuration document.
pub const DEFAULT_ENVIRONMENT_CONFIG: &str = "src/main/resources/mq_env_config.xml";
/// Conventional root of the template tree.
pub const DEFAULT_SOURCE_DIR: &str = "src/main/resources";
/// Conventional output root, rebuilt on every run.
pub const DEFAULT_OUTPUT_DIR: &str = "target/generated_mqsc";
/// Extension of template fragments and generated scripts.
pub const DEFAULT_EXTENSION: &str = "mqsc";
/// Name of the optional settings file looked up in the project directory.
pub const SETTINGS_FILE_NAME: &str = "mqsc.yaml";

/// How the normalizer treats whitespace runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WhitespaceMode {
    /// Collapse runs within a line; line breaks survive.
    #[default]
    PreserveLines,
    /// Collapse every whitespace run, line breaks included.
    Flatten,
}

/// Settings for one generator run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    /// Environment configuration document
    pub environment_config: PathBuf,
    /// Root of the template tree
    pub source_dir: PathBuf,
    /// Output root
    pub output_dir: PathBuf,
    /// Fragment and output extension, without the leading dot
    pub extension: String,
    /// Process the environments of a scope in parallel
    pub parallel: bool,
    /// Whitespace normalization mode
    pub whitespace: WhitespaceMode,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            environment_config: PathBuf::from(DEFAULT_ENVIRONMENT_CONFIG),
            source_dir: PathBuf::from(DEFAULT_SOURCE_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            extension: DEFAULT_EXTENSION.to_string(),
            parallel: false,
            whitespace: WhitespaceMode::default(),
        }
    }
}

impl GeneratorSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a YAML file. Missing fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        debug!("Loading settings from {:?}", path);

        let content = fs::read_to_string(path).map_err(|source| ConfigError::SettingsIo {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `mqsc.yaml` from `project_dir` if present, defaults otherwise.
    pub fn discover(project_dir: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = project_dir.as_ref().join(SETTINGS_FILE_NAME);
        if path.is_file() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn environment_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.environment_config = path.into();
        self
    }

    pub fn source_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.source_dir = dir.into();
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn whitespace(mut self, mode: WhitespaceMode) -> Self {
        self.whitespace = mode;
        self
    }

    /// Anchor relative paths at `base`. Absolute paths are left alone.
    pub fn resolve_against(mut self, base: impl AsRef<Path>) -> Self {
        let base = base.as_ref();
        for path in [
            &mut self.environment_config,
            &mut self.source_dir,
            &mut self.output_dir,
        ] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
        self
    }
}
