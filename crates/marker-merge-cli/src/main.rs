//! marker-merge CLI - SVG scatter plot compression tool

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use marker_merge::{ComplexityModel, StyleKey};

mod commands;

/// Merge SVG scatter plot markers into per-style outlines.
#[derive(Parser)]
#[command(name = "marker-merge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress one plot onto a clean plot
    Compress {
        /// Plot with marker placements
        plot: PathBuf,

        /// Marker-free plot the merged outlines are appended to
        clean: PathBuf,

        /// Output file (default: <plot>_compressed.svg)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        merge: MergeArgs,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compress every plot in a directory, prompting for missing arguments
    Batch {
        /// Directory with plots
        dir: Option<PathBuf>,

        /// Clean plot, as given or else relative to the directory
        #[arg(long)]
        clean: Option<PathBuf>,

        /// Add 0.5 to the marker radius to cover the marker outline
        #[arg(long)]
        point_framing: Option<String>,

        /// How styles are grouped
        #[arg(long, value_enum, default_value_t = StyleArg::Exact)]
        style_key: StyleArg,

        /// Polygon vertices per marker disk
        #[arg(long, default_value_t = marker_merge::geometry::DEFAULT_DISK_SEGMENTS)]
        segments: usize,

        /// Compress plots in parallel
        #[arg(long)]
        parallel: bool,
    },

    /// Time compression over noisy_gaussian_<k> run directories
    Bench {
        /// Directory containing the run directories
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Where timing tables are written (default: the root directory)
        #[arg(short, long)]
        results: Option<PathBuf>,

        #[command(flatten)]
        merge: MergeArgs,
    },

    /// Generate synthetic noisy Gaussian plots
    Generate {
        /// Output directory
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Number of run directories
        #[arg(long, default_value_t = 8)]
        runs: u32,

        /// Plot sizes (default: 10 up to 2000000)
        #[arg(long, value_delimiter = ',')]
        sizes: Vec<u64>,

        /// Seed for reproducible plots
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Fit complexity models to timing tables
    Fit {
        /// Directory with time_complexity_data_* tables
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Only sizes above this are fitted
        #[arg(long, default_value_t = 10_000.0)]
        threshold: f64,

        /// Models to fit (default: all)
        #[arg(long, value_enum, value_delimiter = ',')]
        models: Vec<ModelArg>,

        /// Model drawn in the charts
        #[arg(long, value_enum, default_value_t = ModelArg::Linear)]
        chart_model: ModelArg,

        /// Directory for the charts (default: the table directory)
        #[arg(long)]
        charts: Option<PathBuf>,

        /// Skip writing charts
        #[arg(long)]
        no_charts: bool,

        /// Print the analysis as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Merge settings shared by `compress` and `bench`.
#[derive(clap::Args)]
pub struct MergeArgs {
    /// Do not add 0.5 to the marker radius
    #[arg(long)]
    no_point_framing: bool,

    /// How styles are grouped
    #[arg(long, value_enum, default_value_t = StyleArg::Exact)]
    style_key: StyleArg,

    /// Polygon vertices per marker disk
    #[arg(long, default_value_t = marker_merge::geometry::DEFAULT_DISK_SEGMENTS)]
    segments: usize,
}

impl MergeArgs {
    fn config(&self) -> marker_merge::MergeConfig {
        marker_merge::MergeConfig::builder()
            .point_framing(!self.no_point_framing)
            .style_key(self.style_key.into())
            .disk_segments(self.segments)
            .build()
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum StyleArg {
    /// Exact style attribute text
    Exact,
    /// Whitespace and empty declarations ignored
    Normalized,
}

impl From<StyleArg> for StyleKey {
    fn from(arg: StyleArg) -> Self {
        match arg {
            StyleArg::Exact => StyleKey::Exact,
            StyleArg::Normalized => StyleKey::Normalized,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ModelArg {
    /// a·n
    Linear,
    /// a·n² + b·n + c
    Quadratic,
    /// a·n·ln(n) + b
    Nlogn,
    /// a·n^b
    Power,
}

impl From<ModelArg> for ComplexityModel {
    fn from(arg: ModelArg) -> Self {
        match arg {
            ModelArg::Linear => ComplexityModel::Linear,
            ModelArg::Quadratic => ComplexityModel::Quadratic,
            ModelArg::Nlogn => ComplexityModel::NLogN,
            ModelArg::Power => ComplexityModel::Power,
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Compress { plot, clean, output, merge, json } => {
            commands::compress::run(plot, clean, output, &merge.config(), json)
        }
        Commands::Batch { dir, clean, point_framing, style_key, segments, parallel } => {
            commands::batch::run(
                commands::batch::BatchArgs {
                    dir,
                    clean,
                    point_framing,
                    style_key: style_key.into(),
                    segments,
                    parallel,
                },
                cli.verbose,
            )
        }
        Commands::Bench { root, results, merge } => {
            commands::bench::run(root, results, merge.config(), cli.verbose)
        }
        Commands::Generate { root, runs, sizes, seed } => {
            commands::generate::run(root, runs, sizes, seed)
        }
        Commands::Fit { dir, threshold, models, chart_model, charts, no_charts, json } => {
            commands::fit::run(
                commands::fit::FitArgs {
                    dir,
                    threshold,
                    models: models.into_iter().map(Into::into).collect(),
                    chart_model: chart_model.into(),
                    write_charts: !no_charts,
                    charts_dir: charts,
                },
                json,
            )
        }
    }
}
