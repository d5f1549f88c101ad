//! Bench command: time compression over run directories.

use std::path::PathBuf;

use anyhow::{Context, Result};
use marker_merge::{BenchConfig, MergeConfig, run_benchmark};

pub fn run(root: PathBuf, results: Option<PathBuf>, merge: MergeConfig, verbose: bool) -> Result<()> {
    let config = BenchConfig {
        results_dir: results,
        merge,
        ..BenchConfig::default()
    };

    let report = run_benchmark(&root, &config)
        .with_context(|| format!("Benchmark failed in {}", root.display()))?;

    if report.runs.is_empty() {
        println!("No run directories found in {}", root.display());
        return Ok(());
    }

    println!(
        "{:<28} {:>6} {:>12} {:>12} {:>9}",
        "Run", "Plots", "Total (s)", "Max (s)", "Failures"
    );
    println!("{:-<71}", "");
    for run in &report.runs {
        let name = run
            .directory
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let times = run.timings.times();
        let total: f64 = times.iter().sum();
        let max = times.iter().copied().fold(0.0, f64::max);
        println!(
            "{:<28} {:>6} {:>12.4} {:>12.4} {:>9}",
            name,
            times.len(),
            total,
            max,
            run.failures.len()
        );
        if verbose {
            for failure in &run.failures {
                println!("    {}: {}", failure.path.display(), failure.error);
            }
        }
    }

    println!();
    for run in &report.runs {
        println!("Saved: {}", run.table.display());
    }
    Ok(())
}
