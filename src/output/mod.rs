//! Output formatting for CLI results

use colored::Colorize;

pub mod formatters;
pub mod table;

/// Print a success line
pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print a warning line to stderr
pub fn warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message.yellow());
}

/// Print a failure line to stderr
pub fn failure(message: &str) {
    eprintln!("{} {}", "✗".red(), message.red());
}
