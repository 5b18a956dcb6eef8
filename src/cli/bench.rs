//! Benchmark command

use std::path::PathBuf;

use colored::Colorize;

use crate::bench::{
    BenchmarkOrchestrator, BenchmarkResult, RunRegistry, TagDecision, register_tag,
};
use crate::cli::CommandContext;
use crate::cli::args::{GlobalOptions, RunOptions};
use crate::client::{SpiApi, SpiClient};
use crate::config::request::RequestConfigFile;
use crate::error::{RegistryError, Result};
use crate::output;
use crate::prompt::{ConfirmPrompt, TerminalPrompt};

/// A finished run and where it was stored
struct SavedRun {
    decision: TagDecision,
    path: PathBuf,
    result: BenchmarkResult,
}

/// Benchmark the configured endpoints and store the run under `tag=`.
///
/// Every check that can fail without the network (tag present, config
/// complete, request list valid, tag collision) runs before the first request.
pub async fn run(opts: &GlobalOptions, args: &[String]) -> Result<()> {
    let options = RunOptions::parse(args)?;
    let tag = options.tag.ok_or(RegistryError::MissingTag)?;

    let ctx = CommandContext::resolve(opts, options.env.as_deref())?;
    let request_config = RequestConfigFile::load_from(&opts.request_config_path())?;
    let registry = RunRegistry::new(opts.results_dir_path());
    let api = SpiClient::new()?;

    let saved = benchmark(
        &ctx,
        &api,
        &TerminalPrompt,
        &registry,
        &request_config,
        &tag,
        true,
    )
    .await?;

    output::success(&format!(
        "Saved run '{}' ({} requests x {} iterations) to {}",
        saved.decision.tag().bold(),
        saved.result.request_names.len(),
        saved.result.iteration_count,
        saved.path.display()
    ));
    let missing = saved.result.missing_samples();
    if missing > 0 {
        output::warning(&format!("{} request(s) failed and have no timing", missing));
    }
    Ok(())
}

/// Validate the request list, register the tag, then measure and save.
async fn benchmark(
    ctx: &CommandContext,
    api: &dyn SpiApi,
    prompt: &dyn ConfirmPrompt,
    registry: &RunRegistry,
    request_config: &RequestConfigFile,
    tag: &str,
    progress: bool,
) -> Result<SavedRun> {
    let spec = request_config.spec()?;
    let decision = register_tag(tag, &registry.existing_tags()?, prompt, ctx.deadline).await?;

    let config = ctx.lifecycle(api).ensure_usable(&ctx.config).await?;
    let result = BenchmarkOrchestrator::new(api, ctx.deadline)
        .with_progress(progress)
        .run(&config, &spec, request_config.iteration)
        .await?;
    let path = registry.save(&decision, &result)?;

    Ok(SavedRun {
        decision,
        path,
        result,
    })
}
