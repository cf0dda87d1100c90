//! Implementation of the `stackforge add` command.

use tracing::{info, instrument};

use stackforge_adapters::{LocalFilesystem, PlaceholderRenderer};
use stackforge_core::application::RetrofitService;
use stackforge_core::domain::Resolution;

use crate::{
    cli::{AddArgs, global::GlobalArgs},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

/// Execute the `stackforge add` command.
#[instrument(skip_all, fields(feature = ?args.feature))]
pub fn execute(
    args: AddArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let catalog = super::open_catalog(&global, &config)?;

    let service = RetrofitService::new(
        Box::new(catalog),
        Box::new(LocalFilesystem::new()),
        Box::new(PlaceholderRenderer::new()),
    );

    let feature = args.feature.into();
    output.header(&format!("Adding {feature} to '{}'...", args.dir.display()))?;

    let report = service.add_feature(&args.dir, feature, args.provider.as_deref())?;
    info!(
        copied = report.files_copied,
        skipped = report.files_skipped,
        "retrofit finished"
    );

    if !report.stack_violations.is_empty() {
        output.warning(".stackrc was invalid and has been rewritten:")?;
        for violation in &report.stack_violations {
            output.warning(&format!("  {violation}"))?;
        }
    }
    if let Resolution::Fallback { requested, used } = &report.resolution {
        output.warning(&format!(
            "no '{requested}' template yet, using '{used}' instead"
        ))?;
    }
    if report.files_skipped > 0 {
        output.info(&format!(
            "{} existing file(s) left untouched",
            report.files_skipped
        ))?;
    }

    output.success(&format!(
        "Added {feature} ({} new file(s))",
        report.files_copied
    ))?;

    if !global.quiet {
        output.print("")?;
        output.print("Run your package manager to pick up new dependencies:")?;
        output.print("  npm install")?;
    }

    Ok(())
}
