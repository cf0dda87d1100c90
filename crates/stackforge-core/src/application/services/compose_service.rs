//! Project composition: the create-project use case.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::application::error::ApplicationError;
use crate::application::ports::{Filesystem, FragmentCatalog, TemplateRenderer};
use crate::application::services::{catalog_err, fs_err};
use crate::domain::{
    ENV_FILE, FeatureKind, Manifest, MANIFEST_FILE, ProjectConfig, RenderContext, ResolvedStack,
    STACK_FILE, StackRecord, TYPE_CONFIG_FILE, merge_env_fragments, resolve,
};
use crate::error::ForgeResult;

/// Root files that receive the placeholder render pass after composition.
const RENDERED_FILES: [&str; 3] = [ENV_FILE, MANIFEST_FILE, "README.md"];

/// What a composition run produced.
#[derive(Debug, Clone)]
pub struct CompositionReport {
    pub project_name: String,
    pub destination: PathBuf,
    pub stack: ResolvedStack,
    pub files_written: usize,
}

/// Composes a project from resolved fragments.
///
/// The algorithm is a single ordered pass: the base fragment is copied in
/// full (its reserved files seed the on-disk accumulators), then each later
/// fragment overlays its plain files and folds its reserved files into the
/// accumulators instead of copying them. Environment fragments are collected
/// along the way and written as one freshly merged `.env` at the end, so the
/// result never depends on what a fragment author left on disk.
pub struct ComposeService {
    catalog: Box<dyn FragmentCatalog>,
    filesystem: Box<dyn Filesystem>,
    renderer: Box<dyn TemplateRenderer>,
}

impl ComposeService {
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

    /// Compose a new project at `destination`.
    ///
    /// `destination` must not exist or must be an empty directory; anything
    /// else aborts before a single file is written.
    #[instrument(skip_all, fields(project = %config.name))]
    pub fn compose(
        &self,
        config: &ProjectConfig,
        destination: &Path,
    ) -> ForgeResult<CompositionReport> {
        config.validate()?;
        let config = config.normalized();

        let names = self.catalog.names().map_err(catalog_err)?;
        let stack = resolve(&config, &names)?;
        debug!(
            fragments = ?stack.fragments().map(|f| f.as_str()).collect::<Vec<_>>(),
            "stack resolved"
        );

        if !self
            .filesystem
            .is_vacant(destination)
            .map_err(|e| fs_err(destination, e))?
        {
            return Err(ApplicationError::DestinationNotEmpty {
                path: destination.display().to_string(),
            }
            .into());
        }
        self.filesystem
            .create_dir_all(destination)
            .map_err(|e| fs_err(destination, e))?;

        let mut env_sources: Vec<String> = Vec::new();
        let mut files_written = 0usize;

        for entry in &stack.entries {
            let Some(fragment) = entry.resolution.fragment() else {
                continue;
            };
            let is_base = entry.kind == FeatureKind::Base;
            debug!(fragment = %fragment, kind = %entry.kind, "applying fragment");

            for relative in self.catalog.list_files(fragment).map_err(catalog_err)? {
                let bytes = self
                    .catalog
                    .read_file(fragment, &relative)
                    .map_err(catalog_err)?;

                match reserved_name(&relative) {
                    Some(ENV_FILE) => {
                        // Every fragment's .env feeds the final merge; the
                        // raw file itself is never copied.
                        env_sources.push(String::from_utf8_lossy(&bytes).into_owned());
                    }
                    Some(name) if !is_base => {
                        let target = destination.join(name);
                        self.merge_structured_file(&target, &bytes)?;
                    }
                    _ => {
                        self.copy_file(destination, &relative, &bytes)?;
                        files_written += 1;
                    }
                }
            }
        }

        // Later steps rely on a manifest being present even when no
        // fragment shipped one.
        let manifest_path = destination.join(MANIFEST_FILE);
        if !self.filesystem.exists(&manifest_path) {
            self.filesystem
                .write_file(&manifest_path, Manifest::default().to_json_pretty().as_bytes())
                .map_err(|e| fs_err(&manifest_path, e))?;
            files_written += 1;
        }

        if !env_sources.is_empty() {
            let merged = merge_env_fragments(env_sources.iter().map(String::as_str));
            let target = destination.join(ENV_FILE);
            self.filesystem
                .write_file(&target, merged.as_bytes())
                .map_err(|e| fs_err(&target, e))?;
            files_written += 1;
        }

        self.render_pass(destination, &config)?;
        self.write_stack_record(destination, &config)?;
        files_written += 1;

        info!(
            destination = %destination.display(),
            files = files_written,
            "project composed"
        );
        Ok(CompositionReport {
            project_name: config.name.clone(),
            destination: destination.to_path_buf(),
            stack,
            files_written,
        })
    }

    fn copy_file(
        &self,
        destination: &Path,
        relative: &Path,
        bytes: &[u8],
    ) -> Result<(), ApplicationError> {
        let target = destination.join(relative);
        if let Some(parent) = target.parent() {
            self.filesystem
                .create_dir_all(parent)
                .map_err(|e| fs_err(parent, e))?;
        }
        self.filesystem
            .write_file(&target, bytes)
            .map_err(|e| fs_err(&target, e))
    }

    /// Fold a fragment's `package.json` or `tsconfig.json` into the on-disk
    /// accumulator. A missing accumulator starts from an empty manifest, so
    /// a catalog whose base fragment lacks the file still produces one.
    fn merge_structured_file(&self, target: &Path, bytes: &[u8]) -> Result<(), ApplicationError> {
        let fragment_text = String::from_utf8_lossy(bytes);
        let fragment_manifest = Manifest::from_json(&fragment_text).map_err(|e| {
            ApplicationError::MalformedManifest {
                path: target.display().to_string(),
                reason: e.to_string(),
            }
        })?;

        let mut accumulator = if self.filesystem.exists(target) {
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

        accumulator.absorb(&fragment_manifest);
        self.filesystem
            .write_file(target, accumulator.to_json_pretty().as_bytes())
            .map_err(|e| fs_err(target, e))
    }

    /// Substitute placeholders in the root files that carry them.
    fn render_pass(&self, destination: &Path, config: &ProjectConfig) -> Result<(), ApplicationError> {
        let context = RenderContext::from_config(config);
        for name in RENDERED_FILES {
            let target = destination.join(name);
            if !self.filesystem.exists(&target) {
                continue;
            }
            let text = self
                .filesystem
                .read_to_string(&target)
                .map_err(|e| fs_err(&target, e))?;
            let rendered = self.renderer.render(&text, &context);
            if rendered != text {
                self.filesystem
                    .write_file(&target, rendered.as_bytes())
                    .map_err(|e| fs_err(&target, e))?;
            }
        }
        Ok(())
    }

    fn write_stack_record(
        &self,
        destination: &Path,
        config: &ProjectConfig,
    ) -> Result<(), ApplicationError> {
        let record = StackRecord::from_config(config);
        let target = destination.join(STACK_FILE);
        self.filesystem
            .write_file(&target, record.to_json_pretty().as_bytes())
            .map_err(|e| fs_err(&target, e))
    }
}

/// The reserved filename of a fragment-root path, if it is one. Reserved
/// handling applies only at the fragment root; a nested `package.json`
/// (say, inside an example workspace) copies verbatim.
fn reserved_name(relative: &Path) -> Option<&'static str> {
    if relative.components().count() != 1 {
        return None;
    }
    let name = relative.file_name()?.to_str()?;
    match name {
        _ if name == MANIFEST_FILE => Some(MANIFEST_FILE),
        _ if name == TYPE_CONFIG_FILE => Some(TYPE_CONFIG_FILE),
        _ if name == ENV_FILE => Some(ENV_FILE),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RESERVED_FILES;

    #[test]
    fn reserved_names_match_root_level_only() {
        assert_eq!(reserved_name(Path::new("package.json")), Some(MANIFEST_FILE));
        assert_eq!(reserved_name(Path::new(".env")), Some(ENV_FILE));
        assert_eq!(reserved_name(Path::new("src/package.json")), None);
        assert_eq!(reserved_name(Path::new("README.md")), None);
    }

    #[test]
    fn reserved_set_is_exactly_the_three_merged_files() {
        for name in RESERVED_FILES {
            assert!(reserved_name(Path::new(name)).is_some());
        }
    }
}
