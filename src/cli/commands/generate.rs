//! generate command - Run one generation pass

use crate::cli::args::GenerateArgs;
use crate::core::config::GenerationConfig;
use crate::engine::runner::{run, RunError, Stage, StageFailure};
use crate::engine::Context;
use crate::ui::output;
use anyhow::Result;

/// Resolve configuration from file and flags, then run the pass.
///
/// Configuration problems are reported as a failure of the init stage so
/// every error carries its category.
pub fn generate(ctx: &Context, args: &GenerateArgs) -> Result<()> {
    let verbosity = ctx.verbosity();

    let config = GenerationConfig::load(args.config.as_deref(), args.overrides()).map_err(
        |error| StageFailure {
            stage: Stage::Init,
            error: RunError::Config(error),
        },
    )?;
    if let Some(path) = &config.loaded_from {
        output::debug(format!("config: {}", path.display()), verbosity);
    }

    let outcome = run(&config)?;

    output::debug(
        format!("stages: {}", output::format_chain(&outcome.stages)),
        verbosity,
    );
    if outcome.artifact.objects().is_empty() {
        output::warn(
            format!(
                "no resources found for source set '{}' in '{}'",
                config.source_set,
                config.own_resources.display()
            ),
            verbosity,
        );
    }
    output::success(
        format!(
            "Generated {} ({}): {} objects, {} files",
            config.source_set,
            config.platform,
            outcome.artifact.objects().len(),
            outcome.written.len()
        ),
        verbosity,
    );
    output::print(
        format!("  metadata: {}", config.output.metadata_file.display()),
        verbosity,
    );
    Ok(())
}
