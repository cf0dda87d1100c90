//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet},
    io,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use stackforge_core::application::ports::Filesystem;

/// In-memory filesystem for testing. Cloning shares the backing store.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, Vec<u8>>,
    directories: BTreeSet<PathBuf>,
}

impl MemoryFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a file's content as text (testing helper).
    pub fn file_text(&self, path: &Path) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner
            .files
            .get(path)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// All file paths currently stored, sorted.
    pub fn file_paths(&self) -> Vec<PathBuf> {
        let Ok(inner) = self.inner.read() else {
            return Vec::new();
        };
        inner.files.keys().cloned().collect()
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut inner = self.inner.write().map_err(poisoned)?;
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            inner.directories.insert(current.clone());
        }
        Ok(())
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut inner = self.inner.write().map_err(poisoned)?;
        inner.files.insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let inner = self.inner.read().map_err(poisoned)?;
        let bytes = inner
            .files
            .get(path)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))?;
        String::from_utf8(bytes.clone())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    fn exists(&self, path: &Path) -> bool {
        let Ok(inner) = self.inner.read() else {
            return false;
        };
        // Directories exist implicitly once something lives under them.
        inner.files.contains_key(path)
            || inner.directories.contains(path)
            || inner.files.keys().any(|p| p.starts_with(path) && p != path)
    }

    fn is_vacant(&self, path: &Path) -> io::Result<bool> {
        let inner = self.inner.read().map_err(poisoned)?;
        if inner.files.contains_key(path) {
            return Ok(false);
        }
        let occupied = inner.files.keys().any(|p| p.starts_with(path) && p != path)
            || inner
                .directories
                .iter()
                .any(|d| d.starts_with(path) && d != path);
        Ok(!occupied)
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> io::Error {
    io::Error::other("filesystem lock poisoned")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_read_exists() {
        let fs = MemoryFilesystem::new();
        fs.write_file(Path::new("/p/a.txt"), b"hi").unwrap();
        assert!(fs.exists(Path::new("/p/a.txt")));
        assert_eq!(fs.read_to_string(Path::new("/p/a.txt")).unwrap(), "hi");
    }

    #[test]
    fn missing_file_is_not_found() {
        let fs = MemoryFilesystem::new();
        let err = fs.read_to_string(Path::new("/nope")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn vacancy_tracks_nested_entries() {
        let fs = MemoryFilesystem::new();
        assert!(fs.is_vacant(Path::new("/app")).unwrap());

        fs.create_dir_all(Path::new("/app")).unwrap();
        assert!(fs.is_vacant(Path::new("/app")).unwrap());

        fs.write_file(Path::new("/app/src/main.ts"), b"x").unwrap();
        assert!(!fs.is_vacant(Path::new("/app")).unwrap());
    }

    #[test]
    fn clones_share_the_store() {
        let fs = MemoryFilesystem::new();
        let clone = fs.clone();
        fs.write_file(Path::new("/a"), b"1").unwrap();
        assert!(clone.exists(Path::new("/a")));
    }
}
