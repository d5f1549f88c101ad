//! # marker-merge
//!
//! Scatter plot compression for SVG files.
//!
//! A scatter plot exported as SVG draws every point as its own marker
//! instance. This library merges all markers that share a style into one
//! `<path>` outlining the union of their disks, and appends those paths to a
//! marker-free copy of the plot. Large plots shrink by orders of magnitude
//! while looking the same.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use marker_merge::{MergeConfig, compress_plot};
//!
//! let config = MergeConfig::builder().point_framing(true).build();
//! let report = compress_plot("noisy_gauss1000.svg".as_ref(), "clear.svg".as_ref(), &config)?;
//! println!("wrote {} ({:.1}x smaller)", report.output.display(), report.compression_ratio());
//! ```
//!
//! ## Modules
//!
//! - [`error`]: Error types for the library
//! - [`svg`]: Reading plots (marker radius, placements) and writing merged output
//! - [`geometry`]: Disk union and path data serialization
//! - [`merge`]: The per-plot compression pipeline
//! - [`batch`]: Directory batches and timed benchmark runs
//! - [`synth`]: Synthetic noisy Gaussian plots for benchmarking
//! - [`stats`]: Timing aggregation, complexity fits and charts

pub mod batch;
pub mod error;
pub mod geometry;
pub mod merge;
pub mod stats;
pub mod svg;
pub mod synth;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use batch::{BatchOptions, BatchReport, BenchConfig, BenchReport, compress_directory, run_benchmark};
pub use error::{Error, Result};
pub use geometry::{Disk, Topology, union_disks};
pub use merge::{CompressionReport, MergeConfig, MergePlan, compress_plot, compressed_output_path};
pub use stats::{ComplexityAnalysis, ComplexityModel, FitConfig, FitResult};
pub use svg::{StyleKey, collect_markers, extract_marker_radius};
pub use synth::{SynthConfig, SynthReport, generate_datasets};
