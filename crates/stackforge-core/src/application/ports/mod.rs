//! Driven ports: the traits infrastructure adapters implement.
//!
//! Ports speak `std::io::Result` so adapters can surface real I/O errors
//! without translation; the services convert to [`ApplicationError`] at the
//! call site, where the offending path is known.
//!
//! [`ApplicationError`]: crate::application::ApplicationError

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};

use crate::domain::{FragmentId, RenderContext};

/// Filesystem operations on the destination project tree.
pub trait Filesystem: Send + Sync {
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    fn exists(&self, path: &Path) -> bool;

    /// True when `path` does not exist or is a directory with no entries.
    fn is_vacant(&self, path: &Path) -> io::Result<bool>;
}

/// Read access to the template fragment catalog.
pub trait FragmentCatalog: Send + Sync {
    /// The names of every fragment the catalog holds.
    fn names(&self) -> io::Result<BTreeSet<String>>;

    /// Paths of every file inside a fragment, relative to the fragment
    /// root, in sorted order.
    fn list_files(&self, fragment: &FragmentId) -> io::Result<Vec<PathBuf>>;

    /// Raw contents of one file inside a fragment.
    fn read_file(&self, fragment: &FragmentId, relative: &Path) -> io::Result<Vec<u8>>;
}

/// Placeholder substitution over template text.
pub trait TemplateRenderer: Send + Sync {
    /// Replace known `{{placeholder}}` markers; unknown markers are left
    /// in the output verbatim.
    fn render(&self, input: &str, context: &RenderContext) -> String;
}
