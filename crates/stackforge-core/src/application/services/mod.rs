//! Application services: use-case orchestration over the driven ports.

mod compose_service;
mod retrofit_service;

pub use compose_service::{ComposeService, CompositionReport};
pub use retrofit_service::{RetrofitReport, RetrofitService};

use std::io;
use std::path::Path;

use crate::application::error::ApplicationError;

pub(crate) fn fs_err(path: &Path, error: io::Error) -> ApplicationError {
    ApplicationError::Filesystem {
        path: path.display().to_string(),
        reason: error.to_string(),
    }
}

pub(crate) fn catalog_err(error: io::Error) -> ApplicationError {
    ApplicationError::Catalog {
        reason: error.to_string(),
    }
}
