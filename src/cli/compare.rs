//! Compare command

use tabled::Tabled;

use crate::bench::{BenchmarkResult, RequestComparison, RunRegistry, compare};
use crate::cli::args::GlobalOptions;
use crate::error::Result;
use crate::output::formatters::{format_ms, format_pct, format_samples};
use crate::output::table::format_table;

/// One line of the comparison table
#[derive(Debug, Tabled)]
pub struct ComparisonRow {
    #[tabled(rename = "REQUEST")]
    pub request: String,
    #[tabled(rename = "BASE")]
    pub base: String,
    #[tabled(rename = "TARGET")]
    pub target: String,
    #[tabled(rename = "DIFF")]
    pub diff: String,
    #[tabled(rename = "SAMPLES")]
    pub samples: String,
}

impl ComparisonRow {
    fn new(row: &RequestComparison, base: &BenchmarkResult, target: &BenchmarkResult) -> Self {
        let recorded = |run: &BenchmarkResult| {
            run.series(&row.name)
                .map_or(0, |s| s.iter().flatten().count())
        };
        Self {
            request: row.name.clone(),
            base: format_ms(row.base_mean_ns),
            target: format_ms(row.target_mean_ns),
            diff: format_pct(row.diff_pct),
            samples: format!(
                "{} / {}",
                format_samples(recorded(base), base.iteration_count as usize),
                format_samples(recorded(target), target.iteration_count as usize)
            ),
        }
    }
}

/// Print mean response times of `base_tag` and `target_tag` side by side.
pub fn run(opts: &GlobalOptions, base_tag: &str, target_tag: &str) -> Result<()> {
    let registry = RunRegistry::new(opts.results_dir_path());
    let base = registry.load(base_tag)?;
    let target = registry.load(target_tag)?;

    let rows: Vec<ComparisonRow> = compare(&base, &target)?
        .iter()
        .map(|row| ComparisonRow::new(row, &base, &target))
        .collect();

    println!(
        "{} ({} {}) vs {} ({} {})\n",
        base_tag.trim(),
        base.date,
        base.time,
        target_tag.trim(),
        target.date,
        target.time
    );
    println!("{}", format_table(&rows, "No requests to compare."));
    Ok(())
}
