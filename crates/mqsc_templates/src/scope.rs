//! Scopes and their loaded fragments.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error, warn};

use crate::error::{TemplateError, TemplateResult};

/// Name of the scope holding every fragment under the source root.
pub const ALL_SCOPE: &str = "all";

/// One template file and its raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFragment {
    pub path: PathBuf,
    pub content: String,
}

impl TemplateFragment {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Read a fragment from disk.
    ///
    /// Only I/O failures are errors. Bytes that are not valid UTF-8 are
    /// replaced with U+FFFD and the fragment is kept.
    pub fn read(path: impl AsRef<Path>) -> TemplateResult<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| TemplateError::FragmentRead {
            path: path.to_path_buf(),
            source,
        })?;

        let content = match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(e) => {
                warn!("Fragment {:?} is not valid UTF-8; undecodable bytes were replaced", path);
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };
        Ok(Self::new(path, content))
    }
}

/// A named, ordered list of fragments: `all` or one release group.
///
/// The fragment list is fixed once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    name: String,
    fragments: Vec<TemplateFragment>,
}

impl Scope {
    pub fn new(name: impl Into<String>, fragments: Vec<TemplateFragment>) -> Self {
        Self {
            name: name.into(),
            fragments,
        }
    }

    /// Read every fragment in `paths`, keeping discovery order.
    ///
    /// Fragments that cannot be read are left out of the scope and returned
    /// alongside it; the rest of the scope is still usable.
    pub fn load(name: impl Into<String>, paths: Vec<PathBuf>) -> (Self, Vec<TemplateError>) {
        let name = name.into();
        let mut fragments = Vec::with_capacity(paths.len());
        let mut failures = Vec::new();

        for path in paths {
            match TemplateFragment::read(&path) {
                Ok(fragment) => fragments.push(fragment),
                Err(e) => {
                    error!("Skipping fragment in scope '{}': {}", name, e);
                    failures.push(e);
                }
            }
        }

        debug!("Loaded scope '{}' with {} fragment(s)", name, fragments.len());
        (Self { name, fragments }, failures)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fragments(&self) -> &[TemplateFragment] {
        &self.fragments
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }
}
