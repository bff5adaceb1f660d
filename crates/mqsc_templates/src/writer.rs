//! Output tree management.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::aggregator::AggregatedDocument;
use crate::error::{TemplateError, TemplateResult};

/// Writes aggregated documents to `<root>/<env>/<scope>-<env>.<ext>`.
#[derive(Debug, Clone)]
pub struct OutputWriter {
    root: PathBuf,
    extension: String,
}

impl OutputWriter {
    pub fn new(root: impl Into<PathBuf>, extension: &str) -> Self {
        Self {
            root: root.into(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, scope: &str, environment: &str) -> PathBuf {
        self.root
            .join(environment)
            .join(format!("{}-{}.{}", scope, environment, self.extension))
    }

    /// Remove the whole output tree. A missing tree is not an error.
    pub fn clean(&self) -> TemplateResult<()> {
        debug!("Cleaning output directory {:?}", self.root);
        fs_extra::dir::remove(&self.root).map_err(|e| TemplateError::Clean {
            path: self.root.clone(),
            message: e.to_string(),
        })
    }

    /// Persist `document`, creating parent directories as needed.
    pub fn write(&self, document: &AggregatedDocument) -> TemplateResult<PathBuf> {
        let path = self.path_for(&document.scope, &document.environment);
        let write_err = |source: std::io::Error| TemplateError::OutputWrite {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(&path, &document.content).map_err(write_err)?;

        info!(
            "Generated {:?} ({} fragment(s))",
            path, document.fragment_count
        );
        Ok(path)
    }
}
