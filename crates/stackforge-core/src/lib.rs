//! Stackforge Core - Template Composition & Configuration Merging Engine
//!
//! This crate provides the domain and application layers for the Stackforge
//! scaffolding tool, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         stackforge-cli (CLI)            │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │   (ComposeService, RetrofitService)     │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Driven: Catalog, Filesystem, Renderer) │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    stackforge-adapters (Infrastructure) │
//! │ (DirectoryCatalog, LocalFilesystem, etc)│
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │  (ProjectConfig, Manifest, Resolver)    │
//! │        No External Dependencies         │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stackforge_core::{
//!     application::ComposeService,
//!     domain::ProjectConfig,
//! };
//!
//! // 1. Build a validated configuration (from flags or a replayed .stackrc)
//! let config = ProjectConfig::new("my-app");
//!
//! // 2. Use the application service (with injected adapters)
//! let service = ComposeService::new(catalog, filesystem, renderer);
//! let report = service.compose(&config, "./my-app".as_ref()).unwrap();
//! ```

// Re-export domain layer (stable, well-defined API)
pub mod domain;

// Re-export application layer (orchestration logic)
pub mod application;

// Re-export error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ComposeService, CompositionReport, RetrofitReport, RetrofitService,
        ports::{Filesystem, FragmentCatalog, TemplateRenderer},
    };
    pub use crate::domain::{
        AuthProvider, Baas, DatabaseType, FeatureCategory, FeatureKind, FragmentId,
        MailingProvider, Orm, PackageManager, ProjectConfig, RenderContext, Resolution,
        ResolvedStack, StackRecord, UiLibrary,
    };
    pub use crate::error::{ForgeError, ForgeResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
