//! Infrastructure adapters for Stackforge.
//!
//! This crate implements the ports defined in
//! `stackforge-core::application::ports`. It contains all external
//! dependencies and I/O operations; the core stays pure.

pub mod catalog;
pub mod filesystem;
pub mod installer;
pub mod renderer;

// Re-export commonly used adapters
pub use catalog::{DirectoryCatalog, MemoryCatalog};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use installer::Installer;
pub use renderer::PlaceholderRenderer;
