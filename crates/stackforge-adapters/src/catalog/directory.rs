//! On-disk fragment catalog: one subdirectory per fragment.

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

use stackforge_core::application::ports::FragmentCatalog;
use stackforge_core::domain::FragmentId;

/// Environment variable overriding the templates directory location.
pub const TEMPLATES_ENV: &str = "STACKFORGE_TEMPLATES";

const DEFAULT_TEMPLATES_DIR: &str = "templates";

/// No templates directory could be located.
#[derive(Debug, Error)]
#[error("no templates directory found (searched: {})", searched.join(", "))]
pub struct DiscoveryError {
    pub searched: Vec<String>,
}

/// A catalog rooted at a directory whose immediate subdirectories are the
/// fragments.
#[derive(Debug, Clone)]
pub struct DirectoryCatalog {
    root: PathBuf,
}

impl DirectoryCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Locate the templates directory.
    ///
    /// Probes, in order: the explicit path (from a flag), the
    /// `STACKFORGE_TEMPLATES` environment variable, then `./templates`.
    /// The first existing directory wins; an explicit path that does not
    /// exist is still an error rather than silently falling through.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, DiscoveryError> {
        let mut searched = Vec::new();

        if let Some(path) = explicit {
            searched.push(path.display().to_string());
            if path.is_dir() {
                debug!(root = %path.display(), "templates directory from flag");
                return Ok(Self::new(path));
            }
            return Err(DiscoveryError { searched });
        }

        if let Ok(from_env) = std::env::var(TEMPLATES_ENV) {
            let path = PathBuf::from(&from_env);
            searched.push(format!("{TEMPLATES_ENV}={from_env}"));
            if path.is_dir() {
                debug!(root = %path.display(), "templates directory from environment");
                return Ok(Self::new(path));
            }
        }

        let default = PathBuf::from(DEFAULT_TEMPLATES_DIR);
        searched.push(format!("./{DEFAULT_TEMPLATES_DIR}"));
        if default.is_dir() {
            return Ok(Self::new(default));
        }

        Err(DiscoveryError { searched })
    }

    fn fragment_root(&self, fragment: &FragmentId) -> PathBuf {
        self.root.join(fragment.as_str())
    }
}

impl FragmentCatalog for DirectoryCatalog {
    fn names(&self) -> io::Result<BTreeSet<String>> {
        let mut names = BTreeSet::new();
        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    names.insert(name.to_string());
                }
            }
        }
        Ok(names)
    }

    fn list_files(&self, fragment: &FragmentId) -> io::Result<Vec<PathBuf>> {
        let root = self.fragment_root(fragment);
        let mut files = Vec::new();
        for entry in WalkDir::new(&root) {
            let entry = entry.map_err(|e| {
                e.into_io_error()
                    .unwrap_or_else(|| io::Error::other("walkdir loop"))
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(&root)
                .map_err(io::Error::other)?
                .to_path_buf();
            files.push(relative);
        }
        files.sort();
        Ok(files)
    }

    fn read_file(&self, fragment: &FragmentId, relative: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(self.fragment_root(fragment).join(relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(dir: &Path) {
        std::fs::create_dir_all(dir.join("base/src")).unwrap();
        std::fs::write(dir.join("base/package.json"), "{}").unwrap();
        std::fs::write(dir.join("base/src/index.ts"), "export {}").unwrap();
        std::fs::create_dir_all(dir.join("drizzle")).unwrap();
        // A stray file at the catalog root is not a fragment.
        std::fs::write(dir.join("README.md"), "catalog docs").unwrap();
    }

    #[test]
    fn names_lists_only_directories() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path());
        let catalog = DirectoryCatalog::new(dir.path());

        let names = catalog.names().unwrap();
        assert!(names.contains("base"));
        assert!(names.contains("drizzle"));
        assert!(!names.contains("README.md"));
    }

    #[test]
    fn list_files_is_relative_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path());
        let catalog = DirectoryCatalog::new(dir.path());

        let files = catalog.list_files(&FragmentId::new("base")).unwrap();
        assert_eq!(
            files,
            vec![
                PathBuf::from("package.json"),
                PathBuf::from("src/index.ts")
            ]
        );
    }

    #[test]
    fn read_file_returns_contents() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path());
        let catalog = DirectoryCatalog::new(dir.path());

        let bytes = catalog
            .read_file(&FragmentId::new("base"), Path::new("package.json"))
            .unwrap();
        assert_eq!(bytes, b"{}");
    }

    #[test]
    fn discover_prefers_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = DirectoryCatalog::discover(Some(dir.path())).unwrap();
        assert_eq!(catalog.root(), dir.path());
    }

    #[test]
    fn explicit_path_that_does_not_exist_fails() {
        let err = DirectoryCatalog::discover(Some(Path::new("/definitely/not/here"))).unwrap_err();
        assert_eq!(err.searched.len(), 1);
    }
}
