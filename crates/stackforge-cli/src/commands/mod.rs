//! Command handlers. Each submodule implements one subcommand.

pub mod add;
pub mod completions;
pub mod new;

use std::path::PathBuf;

use stackforge_adapters::DirectoryCatalog;

use crate::cli::GlobalArgs;
use crate::config::AppConfig;
use crate::error::{CliError, CliResult};

/// Locate the template catalog from the flag, environment, or default.
pub(crate) fn open_catalog(global: &GlobalArgs, config: &AppConfig) -> CliResult<DirectoryCatalog> {
    let explicit: Option<PathBuf> = global
        .templates
        .clone()
        .or_else(|| config.templates.local_path.clone());

    DirectoryCatalog::discover(explicit.as_deref())
        .map_err(|e| CliError::TemplatesDirNotFound { searched: e.searched })
}
