//! Status command implementation

use colored::Colorize;

use crate::bench::RunRegistry;
use crate::cli::args::GlobalOptions;
use crate::config::{ConfigStore, EnvironmentConfig};
use crate::error::Result;

/// Run the status command to display configuration status. No network access.
pub fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}\n", "apivet Configuration Status".bold());

    let store = ConfigStore::at(opts.config_ref());
    println!(
        "Config file: {}",
        store.path().display().to_string().cyan()
    );

    match store.current_environment() {
        Ok(env) => {
            println!("Environment: {} {}", env.bold(), "(current)".green());
            println!();
            match store.record(&env) {
                Ok(record) => print_fields(&record),
                Err(e) => println!("{} {}", "✗".red(), e),
            }
        }
        Err(e) => {
            println!("{} {}", "✗".red(), e);
            println!("  → Run 'apivet auth env=dev' once the file exists");
        }
    }

    let registry = RunRegistry::new(opts.results_dir_path());
    println!();
    match registry.existing_tags() {
        Ok(tags) if tags.is_empty() => println!("{} No stored benchmark runs", "○".dimmed()),
        Ok(tags) => {
            let tags: Vec<String> = tags.into_iter().collect();
            println!("Stored runs: {}", tags.join(", ").dimmed());
        }
        Err(e) => println!("{} {}", "⚠".yellow(), e),
    }
    println!();

    Ok(())
}

fn print_fields(record: &EnvironmentConfig) {
    let missing = record.missing_fields();
    for field in ["PARTNER_ID", "AUTH", "SPI_URL"] {
        if missing.contains(&field) {
            println!("{} {} not configured", "✗".red(), field);
        } else {
            println!("{} {} configured", "✓".green(), field);
        }
    }

    if record.cookie().is_some() {
        println!("{} Session cookie cached", "✓".green());
    } else {
        println!(
            "{} No session cookie (a browser login will be requested)",
            "○".dimmed()
        );
    }

    if !record.base_url.trim().is_empty() {
        println!("{} Base URL: {}", "○".dimmed(), record.base_url_trimmed().cyan());
    }
}
