use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors raised while orchestrating a composition or retrofit run.
///
/// I/O failures are captured as strings at the port boundary so the whole
/// error tree stays cloneable.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// The target directory exists and already has entries. Composing into
    /// it would interleave generated files with whatever is there.
    #[error("Destination '{path}' already exists and is not empty")]
    DestinationNotEmpty { path: String },

    #[error("Filesystem operation failed at '{path}': {reason}")]
    Filesystem { path: String, reason: String },

    #[error("Template catalog error: {reason}")]
    Catalog { reason: String },

    /// A reserved configuration file on disk or in a fragment is not valid
    /// JSON, so it cannot participate in the structured merge.
    #[error("Cannot parse '{path}' as JSON: {reason}")]
    MalformedManifest { path: String, reason: String },

    /// The retrofit target directory does not exist.
    #[error("No project found at '{path}'")]
    ProjectNotFound { path: String },
}

impl ApplicationError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::DestinationNotEmpty { path } => vec![
                format!("Remove '{}' or choose a different project name", path),
                "Projects are only created into empty or missing directories".into(),
            ],
            Self::Filesystem { .. } => vec![
                "Check directory permissions and available disk space".into(),
            ],
            Self::Catalog { .. } => vec![
                "Check the templates directory (--templates or STACKFORGE_TEMPLATES)".into(),
            ],
            Self::MalformedManifest { path, .. } => vec![
                format!("Fix the JSON syntax in '{}'", path),
            ],
            Self::ProjectNotFound { path } => vec![
                format!("No directory at '{}'", path),
                "Point --dir at a project created by stackforge".into(),
            ],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::DestinationNotEmpty { .. } => ErrorCategory::Validation,
            Self::ProjectNotFound { .. } => ErrorCategory::NotFound,
            Self::MalformedManifest { .. } => ErrorCategory::Configuration,
            Self::Filesystem { .. } | Self::Catalog { .. } => ErrorCategory::Internal,
        }
    }
}
