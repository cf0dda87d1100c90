//! Feature retrofit: the add-feature-to-existing-project use case.

use std::path::Path;

use chrono::Utc;
use serde_json::{Value, json};
use tracing::{debug, info, instrument};

use crate::application::error::ApplicationError;
use crate::application::ports::{Filesystem, FragmentCatalog, TemplateRenderer};
use crate::application::services::{catalog_err, fs_err};
use crate::domain::{
    ENV_FILE, FeatureCategory, FragmentId, Manifest, MANIFEST_FILE, ProjectConfig, RenderContext,
    Resolution, STACK_FILE, SchemaViolation, StackRecord, merge_env_fragments, resolve_feature,
};
use crate::error::{ForgeError, ForgeResult};

/// What a retrofit run changed.
#[derive(Debug, Clone)]
pub struct RetrofitReport {
    pub feature: FeatureCategory,
    pub resolution: Resolution,
    pub files_copied: usize,
    pub files_skipped: usize,
    /// Problems found in the pre-existing stack record. A broken record is
    /// treated as absent (and replaced), not as a fatal error, so these are
    /// surfaced for the caller to display.
    pub stack_violations: Vec<SchemaViolation>,
}

/// Adds one feature to a project that already exists on disk.
///
/// The cardinal rule is no-overwrite: a fragment file whose target already
/// exists is skipped, because the user may have edited it since the initial
/// scaffold. Only two files are merged rather than skipped: the manifest
/// (dependency sections only) and `.env` (existing keys win, new keys are
/// appended).
///
/// The stack record is updated through its raw JSON value, not the typed
/// model, so keys this version does not know about survive the rewrite.
pub struct RetrofitService {
    catalog: Box<dyn FragmentCatalog>,
    filesystem: Box<dyn Filesystem>,
    renderer: Box<dyn TemplateRenderer>,
}

impl RetrofitService {
    pub fn new(
        catalog: Box<dyn FragmentCatalog>,
        filesystem: Box<dyn Filesystem>,
        renderer: Box<dyn TemplateRenderer>,
    ) -> Self {
        Self {
            catalog,
            filesystem,
            renderer,
        }
    }

    #[instrument(skip_all, fields(feature = %category))]
    pub fn add_feature(
        &self,
        project_dir: &Path,
        category: FeatureCategory,
        provider: Option<&str>,
    ) -> ForgeResult<RetrofitReport> {
        let stack_path = project_dir.join(STACK_FILE);
        if !self.filesystem.exists(project_dir) {
            return Err(ApplicationError::ProjectNotFound {
                path: project_dir.display().to_string(),
            }
            .into());
        }

        let (mut raw, record, stack_violations) = self.load_stack(&stack_path);

        let names = self.catalog.names().map_err(catalog_err)?;
        let resolution = resolve_feature(category, provider, &names)?;
        let fragment = resolution
            .fragment()
            .cloned()
            .ok_or_else(|| ForgeError::Internal {
                message: format!("feature resolution for {category} selected no fragment"),
            })?;
        debug!(fragment = %fragment, "retrofitting fragment");

        let config = match &record {
            Some(record) => record.to_config(),
            None => {
                let name = project_dir
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("app");
                ProjectConfig::new(name)
            }
        };
        let context = RenderContext::from_config(&config);
        let mut files_copied = 0usize;
        let mut files_skipped = 0usize;

        for relative in self.catalog.list_files(&fragment).map_err(catalog_err)? {
            let is_root = relative.components().count() == 1;
            let name = relative.file_name().and_then(|n| n.to_str()).unwrap_or("");

            if is_root && name == MANIFEST_FILE {
                let bytes = self
                    .catalog
                    .read_file(&fragment, &relative)
                    .map_err(catalog_err)?;
                self.merge_dependencies(&project_dir.join(MANIFEST_FILE), &bytes)?;
                continue;
            }
            if is_root && name == ENV_FILE {
                let bytes = self
                    .catalog
                    .read_file(&fragment, &relative)
                    .map_err(catalog_err)?;
                self.append_env_keys(&project_dir.join(ENV_FILE), &bytes, &context)?;
                continue;
            }

            let target = project_dir.join(&relative);
            if self.filesystem.exists(&target) {
                files_skipped += 1;
                continue;
            }
            let bytes = self
                .catalog
                .read_file(&fragment, &relative)
                .map_err(catalog_err)?;
            if let Some(parent) = target.parent() {
                self.filesystem
                    .create_dir_all(parent)
                    .map_err(|e| fs_err(parent, e))?;
            }
            self.filesystem
                .write_file(&target, &bytes)
                .map_err(|e| fs_err(&target, e))?;
            files_copied += 1;
        }

        self.update_stack_record(&stack_path, &mut raw, category, &fragment)?;

        info!(
            copied = files_copied,
            skipped = files_skipped,
            "feature retrofitted"
        );
        Ok(RetrofitReport {
            feature: category,
            resolution,
            files_copied,
            files_skipped,
            stack_violations,
        })
    }

    /// Read and validate the stack record, recovering from every failure.
    ///
    /// A record that is missing, unreadable, or fails schema validation is
    /// treated as absent: retrofit still proceeds and a minimal record is
    /// written afterwards. Violations are collected for the caller.
    fn load_stack(&self, stack_path: &Path) -> (Value, Option<StackRecord>, Vec<SchemaViolation>) {
        if !self.filesystem.exists(stack_path) {
            return (Value::Object(Default::default()), None, Vec::new());
        }

        let text = match self.filesystem.read_to_string(stack_path) {
            Ok(text) => text,
            Err(e) => {
                let violation = SchemaViolation {
                    path: "$".into(),
                    message: format!("cannot read stack record: {e}"),
                };
                return (Value::Object(Default::default()), None, vec![violation]);
            }
        };

        let raw: Value = match serde_json::from_str(&text) {
            Ok(raw) => raw,
            Err(e) => {
                let violation = SchemaViolation {
                    path: "$".into(),
                    message: format!("invalid JSON: {e}"),
                };
                return (Value::Object(Default::default()), None, vec![violation]);
            }
        };

        match StackRecord::from_value(&raw) {
            Ok(record) => (raw, Some(record), Vec::new()),
            Err(violations) => {
                debug!(count = violations.len(), "stack record failed validation");
                (Value::Object(Default::default()), None, violations)
            }
        }
    }

    /// Fold only the fragment's dependency sections into the project
    /// manifest. Scripts and other keys the user may have reworked since
    /// creation are left alone.
    fn merge_dependencies(&self, target: &Path, bytes: &[u8]) -> Result<(), ApplicationError> {
        let fragment_text = String::from_utf8_lossy(bytes);
        let fragment_manifest = Manifest::from_json(&fragment_text).map_err(|e| {
            ApplicationError::MalformedManifest {
                path: target.display().to_string(),
                reason: e.to_string(),
            }
        })?;

        let mut manifest = if self.filesystem.exists(target) {
            let text = self
                .filesystem
                .read_to_string(target)
                .map_err(|e| fs_err(target, e))?;
            Manifest::from_json(&text).map_err(|e| ApplicationError::MalformedManifest {
                path: target.display().to_string(),
                reason: e.to_string(),
            })?
        } else {
            Manifest::default()
        };

        manifest.absorb_dependencies(&fragment_manifest);
        self.filesystem
            .write_file(target, manifest.to_json_pretty().as_bytes())
            .map_err(|e| fs_err(target, e))
    }

    /// Append the fragment's environment keys the project does not define
    /// yet. The existing file is the first merge source, so its values win.
    fn append_env_keys(
        &self,
        target: &Path,
        bytes: &[u8],
        context: &RenderContext,
    ) -> Result<(), ApplicationError> {
        let fragment_env = String::from_utf8_lossy(bytes).into_owned();
        let existing = if self.filesystem.exists(target) {
            self.filesystem
                .read_to_string(target)
                .map_err(|e| fs_err(target, e))?
        } else {
            String::new()
        };

        let merged = merge_env_fragments([existing.as_str(), fragment_env.as_str()]);
        let rendered = self.renderer.render(&merged, context);
        self.filesystem
            .write_file(target, rendered.as_bytes())
            .map_err(|e| fs_err(target, e))
    }

    fn update_stack_record(
        &self,
        stack_path: &Path,
        raw: &mut Value,
        category: FeatureCategory,
        fragment: &FragmentId,
    ) -> Result<(), ApplicationError> {
        let provider = installed_provider(category, fragment);
        if let Some(obj) = raw.as_object_mut() {
            match category {
                FeatureCategory::Auth => {
                    obj.insert("auth".into(), json!(true));
                    obj.insert("authProvider".into(), json!(provider.clone()));
                }
                FeatureCategory::Mailing => {
                    obj.insert("mailing".into(), json!(true));
                    obj.insert("mailingProvider".into(), json!(provider.clone()));
                }
            }

            let features = obj.entry("features").or_insert_with(|| json!({}));
            if let Some(features) = features.as_object_mut() {
                features.insert(category.to_string(), json!(provider));
            }

            let now = Utc::now().to_rfc3339();
            if !obj.contains_key("createdAt") {
                obj.insert("createdAt".into(), json!(now));
            }
            obj.insert("lastUpdated".into(), json!(now));
        }

        let mut text = serde_json::to_string_pretty(raw).map_err(|e| {
            ApplicationError::MalformedManifest {
                path: stack_path.display().to_string(),
                reason: e.to_string(),
            }
        })?;
        text.push('\n');
        self.filesystem
            .write_file(stack_path, text.as_bytes())
            .map_err(|e| fs_err(stack_path, e))
    }
}

/// The provider name recorded for an applied fragment. The mailing
/// fragment naming convention is inverted here: the plain `mailing`
/// directory is nodemailer, `mailing-<x>` is provider `x`.
fn installed_provider(category: FeatureCategory, fragment: &FragmentId) -> String {
    match category {
        FeatureCategory::Auth => fragment.as_str().to_string(),
        FeatureCategory::Mailing => fragment
            .as_str()
            .strip_prefix("mailing-")
            .unwrap_or("nodemailer")
            .to_string(),
    }
}
