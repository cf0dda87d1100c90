//! In-memory fragment catalog for testing.

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};

use stackforge_core::application::ports::FragmentCatalog;
use stackforge_core::domain::FragmentId;

/// A catalog built directly from in-memory file maps.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    fragments: BTreeMap<String, BTreeMap<PathBuf, Vec<u8>>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one fragment with its files, builder style.
    pub fn with_fragment(mut self, name: &str, files: &[(&str, &str)]) -> Self {
        let fragment = self.fragments.entry(name.to_string()).or_default();
        for (path, contents) in files {
            fragment.insert(PathBuf::from(path), contents.as_bytes().to_vec());
        }
        self
    }
}

impl FragmentCatalog for MemoryCatalog {
    fn names(&self) -> io::Result<BTreeSet<String>> {
        Ok(self.fragments.keys().cloned().collect())
    }

    fn list_files(&self, fragment: &FragmentId) -> io::Result<Vec<PathBuf>> {
        let files = self.fragments.get(fragment.as_str()).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, fragment.as_str().to_string())
        })?;
        Ok(files.keys().cloned().collect())
    }

    fn read_file(&self, fragment: &FragmentId, relative: &Path) -> io::Result<Vec<u8>> {
        self.fragments
            .get(fragment.as_str())
            .and_then(|files| files.get(relative))
            .cloned()
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, relative.display().to_string())
            })
    }
}
