//! Path comparison helpers.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

/// Resolve `path` to an absolute form suitable for containment checks.
///
/// `.` and `..` are folded lexically, then the deepest existing ancestor is
/// canonicalized so that symlinked prefixes compare equal. The path itself
/// does not need to exist.
pub fn normalize_path(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

    let mut lexical = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                lexical.pop();
            }
            other => lexical.push(other),
        }
    }

    let mut missing: Vec<OsString> = Vec::new();
    let mut existing = lexical.as_path();
    loop {
        if let Ok(canonical) = existing.canonicalize() {
            return missing
                .iter()
                .rev()
                .fold(canonical, |acc, name| acc.join(name));
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => return lexical,
        }
    }
}

/// True when `path` is `ancestor` or lies below it.
pub fn is_within(path: &Path, ancestor: &Path) -> bool {
    normalize_path(path).starts_with(normalize_path(ancestor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_parent_components_are_folded() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("target")).unwrap();
        fs::create_dir_all(temp.path().join("src")).unwrap();

        assert_eq!(
            normalize_path(&temp.path().join("target/../src")),
            normalize_path(&temp.path().join("src"))
        );
        assert_eq!(
            normalize_path(&temp.path().join("./target/./out/../gen")),
            normalize_path(&temp.path().join("target/gen"))
        );
    }

    #[test]
    fn test_is_within() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("target")).unwrap();
        let src = temp.path().join("src/main/resources");

        assert!(is_within(&src, &temp.path().join("target/../src")));
        assert!(is_within(&src, &src));
        assert!(!is_within(&src, &temp.path().join("target")));
        assert!(!is_within(&temp.path().join("srcx"), &temp.path().join("src")));
    }
}
