//! Credential check command

use colored::Colorize;

use crate::auth::AuthState;
use crate::cli::CommandContext;
use crate::cli::args::{GlobalOptions, RunOptions};
use crate::client::SpiClient;
use crate::error::Result;
use crate::output;

/// Probe the stored credential and refresh it once if it is rejected.
pub async fn run(opts: &GlobalOptions, args: &[String]) -> Result<()> {
    let options = RunOptions::parse(args)?;
    let ctx = CommandContext::resolve(opts, options.env.as_deref())?;

    let api = SpiClient::new()?;
    let (config, state) = ctx
        .lifecycle(&api)
        .ensure_usable_with_state(&ctx.config)
        .await?;

    match state {
        AuthState::Valid => {
            output::success(&format!("Credential for '{}' is valid", config.name.bold()))
        }
        AuthState::Invalid => output::success(&format!(
            "Credential for '{}' refreshed and saved to {}",
            config.name.bold(),
            ctx.store.path().display()
        )),
    }
    Ok(())
}
