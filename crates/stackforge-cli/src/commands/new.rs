//! Implementation of the `stackforge new` command.
//!
//! Responsibility: translate CLI arguments into a `ProjectConfig`, call the
//! composition service, and display results. No merge logic lives here.

use std::path::{Path, PathBuf};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, instrument};

use stackforge_adapters::{Installer, LocalFilesystem, PlaceholderRenderer};
use stackforge_core::application::{ComposeService, CompositionReport};
use stackforge_core::domain::{
    AuthProvider, MailingProvider, PackageManager, ProjectConfig, Resolution, StackRecord,
};
use stackforge_core::error::ForgeError;

use crate::{
    cli::{NewArgs, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `stackforge new` command.
///
/// Dispatch sequence:
/// 1. Build a `ProjectConfig` from flags or a replayed stack record
/// 2. Locate the template catalog
/// 3. Compose into `./<name>`
/// 4. Report fallbacks/skips and success
/// 5. Optionally run the dependency install step
#[instrument(skip_all, fields(project = %args.name))]
pub fn execute(
    args: NewArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let project_config = build_config(&args)?;
    project_config
        .validate()
        .map_err(|e| CliError::Core(ForgeError::from(e)))?;

    debug!(
        ui = %project_config.ui,
        database = %project_config.database_type,
        orm = %project_config.orm,
        auth = project_config.auth,
        mailing = project_config.mailing,
        "configuration resolved"
    );

    let catalog = super::open_catalog(&global, &config)?;
    let destination = PathBuf::from(&args.name);

    let service = ComposeService::new(
        Box::new(catalog),
        Box::new(LocalFilesystem::new()),
        Box::new(PlaceholderRenderer::new()),
    );

    output.header(&format!("Creating '{}'...", project_config.name))?;
    info!(destination = %destination.display(), "composition started");

    let report = service.compose(&project_config, &destination)?;
    report_degradations(&report, &output)?;

    output.success(&format!(
        "Project '{}' created ({} files)",
        report.project_name, report.files_written
    ))?;

    if project_config.install_deps {
        let manager = project_config
            .package_manager
            .unwrap_or(PackageManager::Npm);
        run_install(manager, &destination, &output)?;
    }

    if !global.quiet {
        output.print("")?;
        output.print("Next steps:")?;
        output.print(&format!("  cd {}", project_config.name))?;
        if !project_config.install_deps {
            output.print("  npm install")?;
        }
        output.print("  npm run dev")?;
    }

    Ok(())
}

// ── Config construction ───────────────────────────────────────────────────────

/// Build the project configuration from flags, or replay a stack record.
fn build_config(args: &NewArgs) -> CliResult<ProjectConfig> {
    let mut config = match &args.stack {
        Some(path) => replay_stack(path, &args.name)?,
        None => config_from_flags(args)?,
    };
    config.install_deps = args.install;
    config.package_manager = args.package_manager.map(Into::into);
    Ok(config)
}

fn config_from_flags(args: &NewArgs) -> CliResult<ProjectConfig> {
    let mut config = ProjectConfig::new(&args.name);
    config.ui = args.ui.into();
    config.database_type = args.database.into();
    config.database_provider = args.database_provider.clone();
    config.orm = args.orm.into();
    config.baas = args.baas.into();
    config.auth = args.auth;
    config.auth_provider = args
        .auth_provider
        .as_deref()
        .map(|p| p.parse::<AuthProvider>())
        .transpose()
        .map_err(|e| CliError::Core(ForgeError::from(e)))?;
    config.mailing = args.mailing;
    config.mailing_provider = args
        .mailing_provider
        .as_deref()
        .map(|p| p.parse::<MailingProvider>())
        .transpose()
        .map_err(|e| CliError::Core(ForgeError::from(e)))?;
    Ok(config)
}

/// Load a `.stackrc` and reuse its stack for a new project name.
fn replay_stack(path: &Path, name: &str) -> CliResult<ProjectConfig> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CliError::StackFileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            CliError::from(e)
        }
    })?;
    let record = StackRecord::from_json(&text).map_err(|violations| CliError::StackFileInvalid {
        path: path.to_path_buf(),
        violations,
    })?;

    let mut config = record.to_config();
    config.name = name.to_string();
    Ok(config)
}

// ── Reporting ─────────────────────────────────────────────────────────────────

fn report_degradations(report: &CompositionReport, output: &OutputManager) -> CliResult<()> {
    for entry in report.stack.degradations() {
        match &entry.resolution {
            Resolution::Fallback { requested, used } => {
                output.warning(&format!(
                    "no '{requested}' template for {}, using '{used}' instead",
                    entry.kind
                ))?;
            }
            Resolution::Skipped { requested } => {
                output.warning(&format!(
                    "no '{requested}' template for {}, skipping",
                    entry.kind
                ))?;
            }
            Resolution::Resolved { .. } => {}
        }
    }
    Ok(())
}

// ── Install step ──────────────────────────────────────────────────────────────

/// Run the package manager inside the new project, behind a spinner.
///
/// Install failures never fail the run: the project tree is already valid,
/// so a missing or failing package manager downgrades to a warning with
/// the manual command.
fn run_install(
    manager: PackageManager,
    project_dir: &Path,
    output: &OutputManager,
) -> CliResult<()> {
    let installer = Installer::new();
    if !installer.is_available(manager) {
        output.warning(&format!(
            "'{manager}' not found on PATH, skipping dependency installation"
        ))?;
        output.info(&format!(
            "install manually: cd {} && {manager} install",
            project_dir.display()
        ))?;
        return Ok(());
    }

    let spinner = if output.is_quiet() {
        None
    } else {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner} {msg}").unwrap_or(ProgressStyle::default_spinner()),
        );
        bar.set_message(format!("Installing dependencies with {manager}..."));
        bar.enable_steady_tick(Duration::from_millis(80));
        Some(bar)
    };

    let result = installer.install(manager, project_dir);
    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }

    match result {
        Ok(()) => output.success("Dependencies installed")?,
        Err(e) => {
            tracing::warn!(error = %e, "dependency installation failed");
            output.warning(&format!("dependency installation failed: {e}"))?;
            output.info(&format!(
                "install manually: cd {} && {manager} install",
                project_dir.display()
            ))?;
        }
    }
    Ok(())
}
