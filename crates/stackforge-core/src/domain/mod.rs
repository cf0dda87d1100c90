//! Domain layer: pure composition logic with no I/O.
//!
//! Everything in this module operates on values. The filesystem, the
//! fragment catalog, and the clock enter only through the application layer.

pub mod config;
pub mod context;
pub mod env_file;
pub mod error;
pub mod manifest;
pub mod merge;
pub mod resolver;
pub mod stack_record;

pub use config::{
    AuthProvider, Baas, DatabaseType, MailingProvider, Orm, PackageManager, ProjectConfig,
    UiLibrary,
};
pub use context::RenderContext;
pub use env_file::{merge_env_fragments, parse_env_line};
pub use error::{DomainError, ErrorCategory};
pub use manifest::{ENV_FILE, MANIFEST_FILE, Manifest, RESERVED_FILES, TYPE_CONFIG_FILE};
pub use merge::deep_merge;
pub use resolver::{
    BASE_FRAGMENT, FeatureCategory, FeatureKind, FragmentId, ResolvedStack, Resolution,
    StackEntry, resolve, resolve_feature,
};
pub use stack_record::{STACK_FILE, SchemaViolation, StackRecord};
