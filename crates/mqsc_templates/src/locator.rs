//! Template fragment discovery.

use std::path::{Path, PathBuf};

use glob::Pattern;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{TemplateError, TemplateResult};
use crate::paths::normalize_path;

/// Finds template fragments and release groups under a source root.
///
/// Every result is sorted explicitly so discovery order does not depend on
/// the host filesystem.
#[derive(Debug, Clone)]
pub struct TemplateLocator {
    root: PathBuf,
    pattern: Pattern,
    /// Subtrees to skip, relative to the root.
    excluded: Vec<PathBuf>,
}

impl TemplateLocator {
    /// Create a locator for files named `*.<extension>` under `root`.
    pub fn new(root: impl Into<PathBuf>, extension: &str) -> TemplateResult<Self> {
        let extension = extension.trim_start_matches('.');
        let pattern = Pattern::new(&format!("*.{}", Pattern::escape(extension))).map_err(|e| {
            TemplateError::Pattern {
                extension: extension.to_string(),
                message: e.to_string(),
            }
        })?;

        Ok(Self {
            root: root.into(),
            pattern,
            excluded: Vec::new(),
        })
    }

    /// Skip everything under `dir` when it lies inside the root.
    ///
    /// Used for the output root, so generated scripts are never read back
    /// as fragments.
    pub fn exclude(mut self, dir: impl AsRef<Path>) -> Self {
        let dir = normalize_path(dir.as_ref());
        if let Ok(relative) = dir.strip_prefix(normalize_path(&self.root)) {
            if relative.as_os_str().is_empty() {
                warn!("Ignoring exclusion of the template root itself: {:?}", self.root);
            } else {
                debug!("Excluding {:?} from template discovery", dir);
                self.excluded.push(relative.to_path_buf());
            }
        }
        self
    }

    fn is_excluded(&self, path: &Path) -> bool {
        path.strip_prefix(&self.root)
            .map(|relative| self.excluded.iter().any(|e| relative.starts_with(e)))
            .unwrap_or(false)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Every fragment anywhere under the root.
    pub fn discover_all(&self) -> Vec<PathBuf> {
        self.discover_in(&self.root)
    }

    /// Fragments under `root/group`, recursively.
    pub fn discover_scope(&self, group: &str) -> Vec<PathBuf> {
        self.discover_in(&self.root.join(group))
    }

    /// Names of the first-level subdirectories of the root.
    pub fn discover_groups(&self) -> Vec<String> {
        if !self.root.is_dir() {
            warn!("Template directory does not exist: {:?}", self.root);
            return Vec::new();
        }

        let mut groups: Vec<String> = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_entry(|e| !self.is_excluded(e.path()))
            .filter_map(|entry| match entry {
                Ok(e) => Some(e),
                Err(e) => {
                    warn!("Skipping unreadable entry under {:?}: {}", self.root, e);
                    None
                }
            })
            .filter(|e| e.file_type().is_dir())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();

        groups.sort();
        debug!("Discovered {} release group(s) under {:?}", groups.len(), self.root);
        groups
    }

    fn discover_in(&self, dir: &Path) -> Vec<PathBuf> {
        if !dir.is_dir() {
            warn!("Template directory does not exist: {:?}", dir);
            return Vec::new();
        }

        let mut fragments: Vec<PathBuf> = WalkDir::new(dir)
            .min_depth(1)
            .into_iter()
            .filter_entry(|e| !self.is_excluded(e.path()))
            .filter_map(|entry| match entry {
                Ok(e) => Some(e),
                Err(e) => {
                    warn!("Skipping unreadable entry under {:?}: {}", dir, e);
                    None
                }
            })
            // Broken links are kept so the failure surfaces when reading.
            .filter(|e| e.file_type().is_file() || e.path_is_symlink())
            .filter(|e| self.pattern.matches(&e.file_name().to_string_lossy()))
            .map(|e| e.into_path())
            .collect();

        fragments.sort();
        debug!("Discovered {} fragment(s) under {:?}", fragments.len(), dir);
        fragments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "DEFINE QLOCAL(X)").unwrap();
    }

    #[test]
    fn test_discover_all_is_sorted_and_filtered() {
        let temp = tempdir().unwrap();
        touch(temp.path(), "zeta.mqsc");
        touch(temp.path(), "release2/b.mqsc");
        touch(temp.path(), "release1/nested/a.mqsc");
        touch(temp.path(), "release1/a.mqsc");
        touch(temp.path(), "mq_env_config.xml");
        touch(temp.path(), "notes.mqsc.bak");

        let locator = TemplateLocator::new(temp.path(), "mqsc").unwrap();
        let found: Vec<_> = locator
            .discover_all()
            .into_iter()
            .map(|p| p.strip_prefix(temp.path()).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            found,
            vec![
                PathBuf::from("release1/a.mqsc"),
                PathBuf::from("release1/nested/a.mqsc"),
                PathBuf::from("release2/b.mqsc"),
                PathBuf::from("zeta.mqsc"),
            ]
        );
    }

    #[test]
    fn test_discover_groups() {
        let temp = tempdir().unwrap();
        touch(temp.path(), "release2/b.mqsc");
        touch(temp.path(), "release1/a.mqsc");
        touch(temp.path(), "root.mqsc");
        fs::create_dir_all(temp.path().join("empty")).unwrap();

        let locator = TemplateLocator::new(temp.path(), ".mqsc").unwrap();
        assert_eq!(locator.discover_groups(), vec!["empty", "release1", "release2"]);
        assert!(locator.discover_scope("empty").is_empty());
        assert_eq!(locator.discover_scope("release1").len(), 1);
    }

    #[test]
    fn test_missing_root_yields_nothing() {
        let temp = tempdir().unwrap();
        let locator = TemplateLocator::new(temp.path().join("absent"), "mqsc").unwrap();

        assert!(locator.discover_all().is_empty());
        assert!(locator.discover_groups().is_empty());
    }

    #[test]
    fn test_excluded_subtree_is_skipped() {
        let temp = tempdir().unwrap();
        touch(temp.path(), "release1/a.mqsc");
        touch(temp.path(), "target/generated_mqsc/dev/all-dev.mqsc");
        touch(temp.path(), "target/notes.mqsc");

        let locator = TemplateLocator::new(temp.path(), "mqsc")
            .unwrap()
            .exclude(temp.path().join("target/generated_mqsc"));

        let found: Vec<_> = locator
            .discover_all()
            .into_iter()
            .map(|p| p.strip_prefix(temp.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            found,
            vec![PathBuf::from("release1/a.mqsc"), PathBuf::from("target/notes.mqsc")]
        );
        assert_eq!(locator.discover_scope("target").len(), 1);
    }

    #[test]
    fn test_excluding_the_whole_group_hides_it() {
        let temp = tempdir().unwrap();
        touch(temp.path(), "release1/a.mqsc");
        touch(temp.path(), "out/dev/all-dev.mqsc");

        let locator = TemplateLocator::new(temp.path(), "mqsc")
            .unwrap()
            .exclude(temp.path().join("out"))
            .exclude(temp.path().join("../elsewhere"));

        assert_eq!(locator.discover_groups(), vec!["release1"]);
        assert_eq!(locator.discover_all().len(), 1);
    }

    #[test]
    fn test_extension_is_matched_literally() {
        let temp = tempdir().unwrap();
        touch(temp.path(), "a.m[q]sc");
        touch(temp.path(), "b.mqsc");

        let locator = TemplateLocator::new(temp.path(), "m[q]sc").unwrap();
        let found = locator.discover_all();
        assert_eq!(found.len(), 1);
        assert!(found[0].ends_with("a.m[q]sc"));
    }
}
