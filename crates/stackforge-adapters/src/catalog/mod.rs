//! Template fragment catalog adapters.

pub mod directory;
pub mod memory;

pub use directory::{DirectoryCatalog, DiscoveryError, TEMPLATES_ENV};
pub use memory::MemoryCatalog;
