//! Local filesystem adapter using std::fs.

use std::io;
use std::path::Path;

use stackforge_core::application::ports::Filesystem;

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        std::fs::write(path, contents)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_vacant(&self, path: &Path) -> io::Result<bool> {
        if !path.exists() {
            return Ok(true);
        }
        if !path.is_dir() {
            // A plain file at the destination is an occupant too.
            return Ok(false);
        }
        Ok(std::fs::read_dir(path)?.next().is_none())
    }
}
