//! Typed manifest model and the structured-file merge rules.
//!
//! The manifest (`package.json`) and the type-config (`tsconfig.json`) are
//! *reserved files*: the overlay copier never copies them verbatim from a
//! non-base fragment. Instead each fragment's copy is folded into the single
//! on-disk accumulator with [`Manifest::absorb`], whose rules are:
//!
//! - `dependencies` / `devDependencies`: deep-merged, the *later* fragment
//!   wins on conflict (dependencies are additive)
//! - `scripts`: fragment scripts supply defaults; an already-accumulated
//!   script of the same name wins; the *earlier* fragment wins, because
//!   build/run scripts are part of the base project's identity
//! - every other top-level key except `name`/`version`: copied only if not
//!   already present (first-wins)
//!
//! The same type handles the type-config: it simply has no dependency or
//! script sections, so everything lands in the first-wins pass-through bag.
//! Serialization is deterministic (sorted maps, two-space pretty JSON),
//! which is what makes re-running the engine byte-identical.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::merge::deep_merge;

/// Manifest filename handled by the config merger.
pub const MANIFEST_FILE: &str = "package.json";
/// Type-config filename handled by the config merger.
pub const TYPE_CONFIG_FILE: &str = "tsconfig.json";
/// Environment filename handled by the environment merger.
pub const ENV_FILE: &str = ".env";

/// Root-level filenames excluded from plain overlay copy.
pub const RESERVED_FILES: [&str; 3] = [MANIFEST_FILE, TYPE_CONFIG_FILE, ENV_FILE];

/// A structured configuration file with well-defined merge sections.
///
/// Unknown top-level keys are preserved in `extra` (sorted), so nothing a
/// fragment author writes is silently dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dependencies: BTreeMap<String, Value>,
    #[serde(
        rename = "devDependencies",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub dev_dependencies: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub scripts: BTreeMap<String, String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Manifest {
    /// Parse a manifest from JSON text.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Deterministic two-space pretty serialization, newline-terminated.
    pub fn to_json_pretty(&self) -> String {
        let mut out = serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".into());
        out.push('\n');
        out
    }

    /// Fold one fragment's manifest into this accumulator.
    ///
    /// The fragment's `name` and `version` are always ignored; the base
    /// project owns its identity.
    pub fn absorb(&mut self, fragment: &Manifest) {
        merge_dependency_section(&mut self.dependencies, &fragment.dependencies);
        merge_dependency_section(&mut self.dev_dependencies, &fragment.dev_dependencies);

        // Earlier-wins: a script already accumulated keeps its value.
        for (name, command) in &fragment.scripts {
            self.scripts
                .entry(name.clone())
                .or_insert_with(|| command.clone());
        }

        // First-wins for every other top-level key.
        for (key, value) in &fragment.extra {
            if !self.extra.contains_key(key) {
                self.extra.insert(key.clone(), value.clone());
            }
        }
    }

    /// Fold only the dependency sections of a fragment manifest.
    ///
    /// Used by the retrofit path, which must not touch scripts or other
    /// top-level keys the user may have edited after the initial scaffold.
    pub fn absorb_dependencies(&mut self, fragment: &Manifest) {
        merge_dependency_section(&mut self.dependencies, &fragment.dependencies);
        merge_dependency_section(&mut self.dev_dependencies, &fragment.dev_dependencies);
    }
}

/// Later-wins dependency merge, recursing through the deep-merge utility
/// when both sides carry structured values.
fn merge_dependency_section(target: &mut BTreeMap<String, Value>, source: &BTreeMap<String, Value>) {
    for (key, src_val) in source {
        let merged = match target.get(key) {
            Some(existing) if existing.is_object() && src_val.is_object() => {
                deep_merge(existing, src_val)
            }
            _ => src_val.clone(),
        };
        target.insert(key.clone(), merged);
    }
}
