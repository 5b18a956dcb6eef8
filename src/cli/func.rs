//! Functional suite command

use colored::Colorize;

use crate::cli::CommandContext;
use crate::cli::args::{GlobalOptions, RunOptions};
use crate::client::SpiClient;
use crate::error::{Result, SuiteError};
use crate::output;
use crate::suite::{NewmanRunner, SuiteOrchestrator, SuiteReport, TEST_CASES};

/// Run every functional suite against the resolved environment.
pub async fn run(opts: &GlobalOptions, args: &[String]) -> Result<()> {
    let options = RunOptions::parse(args)?;
    let ctx = CommandContext::resolve(opts, options.env.as_deref())?;

    let api = SpiClient::new()?;
    let lifecycle = ctx.lifecycle(&api);
    let runner = NewmanRunner::new(opts.newman.clone(), opts.collections_dir.clone());
    let orchestrator =
        SuiteOrchestrator::new(&lifecycle, &runner, ctx.runner_env_dir(), ctx.deadline);

    let report = orchestrator.run_suites(&ctx.config, TEST_CASES).await?;
    print_report(&report);

    if report.all_passed() {
        Ok(())
    } else {
        let failed: Vec<&str> = report.failed.iter().map(String::as_str).collect();
        Err(SuiteError::SuitesFailed(failed.join(", ")).into())
    }
}

fn print_report(report: &SuiteReport) {
    println!();
    for script in &report.passed {
        output::success(script);
    }
    for script in &report.failed {
        println!("{} {}", "✗".red(), script);
    }
    println!(
        "\n{} passed, {} failed",
        report.passed.len().to_string().green(),
        report.failed.len().to_string().red()
    );
}
