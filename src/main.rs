//! apivet CLI - credential-aware functional and performance checks for the SPI API

use clap::Parser;

mod auth;
mod bench;
mod cli;
mod client;
mod config;
mod deadline;
mod error;
mod output;
mod prompt;
mod suite;

use cli::args::GlobalOptions;
use cli::{Cli, Commands};
use error::Result;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(err) = run(cli).await {
        output::failure(&format!("Error: {}", err));
        std::process::exit(1);
    }
}

/// `debug` with `--debug`, `warn` otherwise; `RUST_LOG` wins when set.
fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let opts = GlobalOptions::from_cli(&cli);

    match cli.command {
        Commands::Func { options } => cli::func::run(&opts, &options).await,
        Commands::Bench { options } => cli::bench::run(&opts, &options).await,
        Commands::Compare { base, target } => cli::compare::run(&opts, &base, &target),
        Commands::Auth { options } => cli::auth::run(&opts, &options).await,
        Commands::Status => cli::status::run(&opts),
        Commands::Version => {
            println!("apivet version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
