//! Feature resolution: configuration choices → ordered fragment list.
//!
//! # Design
//!
//! The resolver is pure. It receives the set of fragment names the catalog
//! actually contains and a [`ProjectConfig`], and produces a
//! [`ResolvedStack`]: one [`Resolution`] per selected feature, in the fixed
//! composition order base → ORM → auth → BaaS → mailing → UI.
//!
//! Fallback policy: the provider catalog is expected to grow faster than
//! fragment authoring, so a missing auth or mailing fragment degrades to a
//! working default instead of aborting the run. The three possible outcomes
//! are modelled as explicit tagged results rather than control-flow branches
//! so callers can test each one deterministically.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::config::{
    AuthProvider, DatabaseType, MailingProvider, Orm, ProjectConfig, UiLibrary,
};
use crate::domain::error::DomainError;

/// The fragment every project starts from.
pub const BASE_FRAGMENT: &str = "base";
/// Fallback fragment when a requested auth provider has no fragment yet.
pub const DEFAULT_AUTH_FRAGMENT: &str = "nextauth";
/// Fallback fragment when a requested mailing provider has no fragment yet.
pub const DEFAULT_MAILING_FRAGMENT: &str = "mailing";

// ── FragmentId ────────────────────────────────────────────────────────────────

/// The name of a template fragment directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FragmentId(String);

impl FragmentId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FragmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FragmentId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// The fragment directory for a mailing provider.
///
/// Nodemailer is the original provider and owns the plain `mailing`
/// directory; every other provider lives under `mailing-<provider>`.
pub fn mailing_fragment(provider: MailingProvider) -> FragmentId {
    match provider {
        MailingProvider::Nodemailer => FragmentId::new(DEFAULT_MAILING_FRAGMENT),
        other => FragmentId::new(format!("mailing-{other}")),
    }
}

// ── FeatureKind ───────────────────────────────────────────────────────────────

/// The composition slot a fragment fills. At most one fragment per slot;
/// `Base` is always present, exactly once, first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    Base,
    Orm,
    Auth,
    Baas,
    Mailing,
    Ui,
}

impl FeatureKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Orm => "orm",
            Self::Auth => "auth",
            Self::Baas => "baas",
            Self::Mailing => "mailing",
            Self::Ui => "ui",
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Resolution ────────────────────────────────────────────────────────────────

/// The outcome of resolving one feature to a fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The requested fragment exists and was selected.
    Resolved { fragment: FragmentId },
    /// The requested fragment is absent; a default was substituted.
    /// Informational, not an error.
    Fallback {
        requested: FragmentId,
        used: FragmentId,
    },
    /// The requested fragment is absent and the feature is optional;
    /// nothing was selected. Surfaced as a warning.
    Skipped { requested: FragmentId },
}

impl Resolution {
    /// The fragment that will actually be applied, if any.
    pub fn fragment(&self) -> Option<&FragmentId> {
        match self {
            Self::Resolved { fragment } => Some(fragment),
            Self::Fallback { used, .. } => Some(used),
            Self::Skipped { .. } => None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}

// ── ResolvedStack ─────────────────────────────────────────────────────────────

/// One resolved feature slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackEntry {
    pub kind: FeatureKind,
    pub resolution: Resolution,
}

/// The ordered sequence of fragments derived from a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStack {
    pub entries: Vec<StackEntry>,
}

impl ResolvedStack {
    /// Fragments that will actually be applied, in composition order.
    pub fn fragments(&self) -> impl Iterator<Item = &FragmentId> {
        self.entries.iter().filter_map(|e| e.resolution.fragment())
    }

    /// Entries that resolved to something other than the direct request.
    pub fn degradations(&self) -> impl Iterator<Item = &StackEntry> {
        self.entries
            .iter()
            .filter(|e| e.resolution.is_fallback() || e.resolution.is_skipped())
    }
}

// ── resolve ───────────────────────────────────────────────────────────────────

/// Resolve a configuration against the available fragment set.
///
/// Fatal outcomes: the base fragment missing, or a selected ORM/UI fragment
/// missing (those have no fallback). Auth and mailing fall back to their
/// defaults; BaaS is skipped when absent.
pub fn resolve(
    config: &ProjectConfig,
    available: &BTreeSet<String>,
) -> Result<ResolvedStack, DomainError> {
    let has = |id: &FragmentId| available.contains(id.as_str());
    let mut entries = Vec::new();

    // 1. Base, always, first.
    let base = FragmentId::new(BASE_FRAGMENT);
    if !has(&base) {
        return Err(DomainError::FragmentNotFound {
            fragment: BASE_FRAGMENT.into(),
        });
    }
    entries.push(StackEntry {
        kind: FeatureKind::Base,
        resolution: Resolution::Resolved { fragment: base },
    });

    // 2. ORM. The database type/provider pair is templating metadata only;
    //    the ORM identifier selects the fragment.
    if config.database_type != DatabaseType::None && config.orm != Orm::None {
        let fragment = FragmentId::new(config.orm.as_str());
        if !has(&fragment) {
            return Err(DomainError::FragmentNotFound {
                fragment: fragment.to_string(),
            });
        }
        entries.push(StackEntry {
            kind: FeatureKind::Orm,
            resolution: Resolution::Resolved { fragment },
        });
    }

    // 3. Auth, with fallback to the default provider.
    if let Some(provider) = config.effective_auth_provider() {
        let requested = FragmentId::new(provider.as_str());
        entries.push(StackEntry {
            kind: FeatureKind::Auth,
            resolution: resolve_with_fallback(requested, DEFAULT_AUTH_FRAGMENT, available)?,
        });
    }

    // 4. BaaS: optional, skipped when the fragment is absent.
    if config.baas != crate::domain::config::Baas::None {
        let requested = FragmentId::new(config.baas.as_str());
        let resolution = if has(&requested) {
            Resolution::Resolved {
                fragment: requested,
            }
        } else {
            Resolution::Skipped { requested }
        };
        entries.push(StackEntry {
            kind: FeatureKind::Baas,
            resolution,
        });
    }

    // 5. Mailing, with fallback to the plain mailing fragment.
    if let Some(provider) = config.effective_mailing_provider() {
        let requested = mailing_fragment(provider);
        entries.push(StackEntry {
            kind: FeatureKind::Mailing,
            resolution: resolve_with_fallback(requested, DEFAULT_MAILING_FRAGMENT, available)?,
        });
    }

    // 6. UI library.
    if config.ui != UiLibrary::None {
        let fragment = FragmentId::new(config.ui.as_str());
        if !has(&fragment) {
            return Err(DomainError::FragmentNotFound {
                fragment: fragment.to_string(),
            });
        }
        entries.push(StackEntry {
            kind: FeatureKind::Ui,
            resolution: Resolution::Resolved { fragment },
        });
    }

    Ok(ResolvedStack { entries })
}

fn resolve_with_fallback(
    requested: FragmentId,
    default: &str,
    available: &BTreeSet<String>,
) -> Result<Resolution, DomainError> {
    if available.contains(requested.as_str()) {
        return Ok(Resolution::Resolved {
            fragment: requested,
        });
    }
    // Even the fallback can be missing from a broken catalog; that has no
    // further recovery.
    if !available.contains(default) {
        return Err(DomainError::FragmentNotFound {
            fragment: default.into(),
        });
    }
    Ok(Resolution::Fallback {
        requested,
        used: FragmentId::new(default),
    })
}

// ── Single-feature resolution (retrofit) ──────────────────────────────────────

/// A feature category that can be retrofitted onto an existing project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureCategory {
    Auth,
    Mailing,
}

impl FeatureCategory {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::Mailing => "mailing",
        }
    }
}

impl fmt::Display for FeatureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FeatureCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auth" => Ok(Self::Auth),
            "mailing" => Ok(Self::Mailing),
            other => Err(DomainError::UnsupportedFeature {
                feature: other.to_string(),
            }),
        }
    }
}

/// Resolve one feature for the retrofit path.
///
/// Validates the provider against the category's supported set (an
/// unsupported combination is a reported error, never a silent no-op), then
/// applies the same fallback policy as [`resolve`].
pub fn resolve_feature(
    category: FeatureCategory,
    provider: Option<&str>,
    available: &BTreeSet<String>,
) -> Result<Resolution, DomainError> {
    match category {
        FeatureCategory::Auth => {
            let provider = match provider {
                Some(p) => p.parse::<AuthProvider>()?,
                None => AuthProvider::Nextauth,
            };
            resolve_with_fallback(
                FragmentId::new(provider.as_str()),
                DEFAULT_AUTH_FRAGMENT,
                available,
            )
        }
        FeatureCategory::Mailing => {
            let provider = match provider {
                Some(p) => p.parse::<MailingProvider>()?,
                None => MailingProvider::Nodemailer,
            };
            resolve_with_fallback(
                mailing_fragment(provider),
                DEFAULT_MAILING_FRAGMENT,
                available,
            )
        }
    }
}
