use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (for retry logic)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (400-level equivalent)
    // ========================================================================
    #[error("Invalid project configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    /// A retrofit was requested for a feature category that does not exist.
    #[error("Unsupported feature '{feature}'")]
    UnsupportedFeature { feature: String },

    /// The requested provider does not belong to the feature category's
    /// supported set. This is a reported error, never a silent no-op.
    #[error("Unsupported {category} provider '{provider}'")]
    UnsupportedProvider {
        category: &'static str,
        provider: String,
        supported: Vec<&'static str>,
    },

    // ========================================================================
    // Not Found Errors (404-level equivalent)
    // ========================================================================
    /// A fragment with no fallback (base, ORM, UI) is absent from the catalog.
    #[error("Required template fragment '{fragment}' not found in catalog")]
    FragmentNotFound { fragment: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidConfig(msg) => vec![
                "Check your project configuration".into(),
                format!("Details: {}", msg),
            ],
            Self::InvalidProjectName { name, reason } => vec![
                format!("Project name '{}' is invalid: {}", name, reason),
                "Use alphanumeric characters, hyphens, and underscores".into(),
            ],
            Self::UnsupportedFeature { feature } => vec![
                format!("'{}' is not a feature that can be added", feature),
                "Supported features: auth, mailing".into(),
            ],
            Self::UnsupportedProvider {
                category,
                provider,
                supported,
            } => {
                let mut out = vec![
                    format!("'{}' is not a supported {} provider", provider, category),
                    format!("Supported {} providers:", category),
                ];
                for p in supported {
                    out.push(format!("  • {}", p));
                }
                out
            }
            Self::FragmentNotFound { fragment } => vec![
                format!("The template catalog has no '{}' directory", fragment),
                "Check the templates directory (--templates or STACKFORGE_TEMPLATES)".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidConfig(_)
            | Self::InvalidProjectName { .. }
            | Self::UnsupportedFeature { .. }
            | Self::UnsupportedProvider { .. } => ErrorCategory::Validation,
            Self::FragmentNotFound { .. } => ErrorCategory::NotFound,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}
