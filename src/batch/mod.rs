//! Batch compression and timed benchmark runs.
//!
//! Two drivers sit on top of [`compress_plot`]:
//!
//! - [`compress_directory`]: compress every plot in one directory onto one
//!   clean plot.
//! - [`run_benchmark`]: walk run directories (`noisy_gaussian_<k>`), time each
//!   plot's compression and write one [`TimingTable`] per run.
//!
//! A failing plot is logged and recorded; the remaining plots are still
//! processed.

pub mod timing;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Instant;

use rayon::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::merge::{CompressionReport, MergeConfig, compress_plot, is_compressed_output};

pub use timing::{TimingRecord, TimingTable, discover_tables, table_file_name};

/// Options for [`compress_directory`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchOptions {
    /// Merge settings applied to every plot. `output` must be unset.
    pub merge: MergeConfig,
    /// Compress plots on the rayon thread pool.
    pub parallel: bool,
}

/// A plot that could not be compressed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchFailure {
    /// The plot.
    pub path: PathBuf,
    /// Rendered error.
    pub error: String,
}

/// Result of [`compress_directory`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    /// Successfully compressed plots.
    pub compressed: Vec<CompressionReport>,
    /// Plots that failed.
    pub failures: Vec<BatchFailure>,
}

/// Compress every SVG plot in `dir` onto `clean`.
///
/// Already compressed outputs and the clean plot itself are skipped. Plots are
/// processed in file name order (or in parallel when requested); the report
/// keeps that order either way.
pub fn compress_directory(dir: &Path, clean: &Path, options: &BatchOptions) -> Result<BatchReport> {
    if options.merge.output.is_some() {
        return Err(Error::InvalidConfig(
            "an explicit output path cannot be used for a whole directory".to_string(),
        ));
    }
    if !dir.is_dir() {
        return Err(Error::Batch(format!("Path is not a directory: {}", dir.display())));
    }

    let clean_canonical = fs::canonicalize(clean).ok();
    let plots: Vec<PathBuf> = list_files(dir)?
        .into_iter()
        .filter(|path| {
            let name = file_name(path);
            has_svg_extension(path) && !is_compressed_output(&name)
        })
        .filter(|path| match &clean_canonical {
            Some(clean) => fs::canonicalize(path).ok().as_ref() != Some(clean),
            None => path != clean,
        })
        .collect();

    info!(directory = %dir.display(), plots = plots.len(), "compressing directory");

    let compress = |plot: &PathBuf| (plot.clone(), compress_plot(plot, clean, &options.merge));
    let outcomes: Vec<(PathBuf, Result<CompressionReport>)> = if options.parallel {
        plots.par_iter().map(compress).collect()
    } else {
        plots.iter().map(compress).collect()
    };

    let mut report = BatchReport::default();
    for (path, outcome) in outcomes {
        match outcome {
            Ok(compressed) => report.compressed.push(compressed),
            Err(e) => {
                warn!(plot = %path.display(), error = %e, "failed to compress plot");
                report.failures.push(BatchFailure {
                    path,
                    error: e.to_string(),
                });
            }
        }
    }
    Ok(report)
}

/// File the benchmark report is saved to, next to the timing tables.
pub const BENCH_REPORT_FILE: &str = "benchmark_report.json";

/// Naming conventions and settings for [`run_benchmark`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchConfig {
    /// Prefix of run directory names.
    pub dir_prefix: String,
    /// Prefix of plot file names inside a run directory.
    pub plot_prefix: String,
    /// Prefix of the clean plot inside a run directory.
    pub clean_prefix: String,
    /// Where timing tables are written; the benchmark root when `None`.
    pub results_dir: Option<PathBuf>,
    /// Merge settings for every plot.
    pub merge: MergeConfig,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            dir_prefix: "noisy_gaussian".to_string(),
            plot_prefix: "noisy".to_string(),
            clean_prefix: "clear".to_string(),
            results_dir: None,
            merge: MergeConfig::default(),
        }
    }
}

/// A run directory with its clean plot and the plots to time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunDirectory {
    /// Directory path.
    pub path: PathBuf,
    /// Label used in the timing table name: the run index, or the directory
    /// name when it carries none.
    pub label: String,
    /// Clean plot of this run.
    pub clean: PathBuf,
    /// Plots in file name order.
    pub plots: Vec<PathBuf>,
}

/// Summary of one timed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Run directory.
    pub directory: PathBuf,
    /// Written timing table.
    pub table: PathBuf,
    /// Measured timings.
    pub timings: TimingTable,
    /// Plots that failed and were left out of the table.
    pub failures: Vec<BatchFailure>,
}

/// Result of [`run_benchmark`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchReport {
    /// One entry per run directory.
    pub runs: Vec<RunSummary>,
    /// When the benchmark finished.
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl BenchReport {
    /// Save the report to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), content)?;
        Ok(())
    }
}

/// Find run directories under `root`, sorted by name.
///
/// Directories without a clean plot are logged and skipped.
pub fn discover_runs(root: &Path, config: &BenchConfig) -> Result<Vec<RunDirectory>> {
    if !root.is_dir() {
        return Err(Error::Batch(format!("Path is not a directory: {}", root.display())));
    }

    let mut runs = Vec::new();
    for dir in list_entries(root)? {
        let name = file_name(&dir);
        if !dir.is_dir() || !name.starts_with(&config.dir_prefix) {
            continue;
        }

        let files = list_files(&dir)?;
        let Some(clean) = files.iter().find(|p| file_name(p).starts_with(&config.clean_prefix)) else {
            warn!(directory = %dir.display(), "no clean plot found, skipping run directory");
            continue;
        };
        let plots = files
            .iter()
            .filter(|p| {
                let name = file_name(p);
                name.starts_with(&config.plot_prefix) && !is_compressed_output(&name)
            })
            .cloned()
            .collect();

        runs.push(RunDirectory {
            label: run_index(&name).map_or_else(|| name.clone(), |k| k.to_string()),
            clean: clean.clone(),
            path: dir,
            plots,
        });
    }
    Ok(runs)
}

/// Time the compression of every plot in every run directory under `root`.
///
/// Plots are compressed sequentially so timings do not interfere. Each run's
/// timings are written to `time_complexity_data_<label>.txt` in ascending
/// point count, and the whole report to [`BENCH_REPORT_FILE`].
pub fn run_benchmark(root: &Path, config: &BenchConfig) -> Result<BenchReport> {
    if config.merge.output.is_some() {
        return Err(Error::InvalidConfig(
            "an explicit output path cannot be used for a benchmark".to_string(),
        ));
    }

    let results_dir = config.results_dir.clone().unwrap_or_else(|| root.to_path_buf());
    fs::create_dir_all(&results_dir)?;

    let mut summaries = Vec::new();
    for run in discover_runs(root, config)? {
        info!(directory = %run.path.display(), plots = run.plots.len(), "timing run");
        let mut records = Vec::with_capacity(run.plots.len());
        let mut failures = Vec::new();

        for plot in &run.plots {
            let Some(n) = point_count(&file_name(plot)) else {
                warn!(plot = %plot.display(), "no point count in file name, skipping");
                continue;
            };

            let start = Instant::now();
            let outcome = compress_plot(plot, &run.clean, &config.merge);
            let seconds = start.elapsed().as_secs_f64();

            match outcome {
                Ok(_) => {
                    info!(plot = %plot.display(), n, seconds, "compressed plot");
                    records.push(TimingRecord { n, seconds });
                }
                Err(e) => {
                    warn!(plot = %plot.display(), error = %e, "failed to compress plot");
                    failures.push(BatchFailure {
                        path: plot.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        records.sort_by_key(|r| r.n);
        let timings = TimingTable::new(records);
        let table = results_dir.join(table_file_name(&run.label));
        timings.write(&table)?;
        info!(table = %table.display(), rows = timings.records.len(), "saved timing table");

        summaries.push(RunSummary {
            directory: run.path,
            table,
            timings,
            failures,
        });
    }

    let report = BenchReport {
        runs: summaries,
        timestamp: chrono::Utc::now(),
    };
    report.save(results_dir.join(BENCH_REPORT_FILE))?;
    Ok(report)
}

/// Point count encoded in a plot name such as `noisy_gauss500.svg`.
#[must_use]
pub fn point_count(name: &str) -> Option<u64> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"noisy_gauss(\d+)\.svg").expect("valid regex"));
    re.captures(name)?.get(1)?.as_str().parse().ok()
}

/// Run index encoded in a directory name such as `noisy_gaussian_3`.
#[must_use]
pub fn run_index(name: &str) -> Option<u32> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"noisy_gaussian_(\d+)").expect("valid regex"));
    re.captures(name)?.get(1)?.as_str().parse().ok()
}

/// Locate the clean plot for a directory batch.
///
/// A path naming an existing file is used as given; otherwise a relative path
/// is looked up inside `dir`.
#[must_use]
pub fn resolve_clean_path(dir: &Path, clean: &Path) -> PathBuf {
    if clean.is_absolute() || clean.is_file() {
        clean.to_path_buf()
    } else {
        dir.join(clean)
    }
}

/// Parse a yes/no answer: `true/false`, `yes/no`, `y/n` or `1/0`, ignoring
/// case and surrounding whitespace.
///
/// # Example
///
/// ```
/// use marker_merge::batch::parse_bool;
///
/// assert!(parse_bool(" Yes ").unwrap());
/// assert!(!parse_bool("False").unwrap());
/// assert!(parse_bool("maybe").is_err());
/// ```
pub fn parse_bool(answer: &str) -> Result<bool> {
    match answer.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Ok(true),
        "false" | "no" | "n" | "0" => Ok(false),
        other => Err(Error::InvalidConfig(format!(
            "expected true/false, yes/no, y/n or 1/0, got {other:?}"
        ))),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn has_svg_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
}

/// Directory entries sorted by path.
fn list_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .map_err(|e| Error::Batch(format!("Failed to read directory {}: {}", dir.display(), e)))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry
            .map_err(|e| Error::Batch(format!("Failed to read entry in {}: {}", dir.display(), e)))?;
        paths.push(entry.path());
    }
    paths.sort();
    Ok(paths)
}

/// Regular files in `dir` sorted by path, hidden files excluded.
fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    Ok(list_entries(dir)?
        .into_iter()
        .filter(|p| p.is_file() && !file_name(p).starts_with('.'))
        .collect())
}
