//! Per-plot compression pipeline.
//!
//! For one plot: recover the marker radius, group marker placements by
//! style, merge each group's disks into one outline and append the outlines
//! to the clean plot.
//!
//! ```rust,ignore
//! use marker_merge::{MergeConfig, compress_plot};
//!
//! let config = MergeConfig::builder().point_framing(false).build();
//! let report = compress_plot("noisy_gauss100.svg".as_ref(), "clear.svg".as_ref(), &config)?;
//! println!("{} -> {}", report.input_bytes, report.output_bytes);
//! ```

use std::path::{Path, PathBuf};

use roxmltree::Document;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::geometry::{DEFAULT_DISK_SEGMENTS, Topology, to_path_data, union_disks};
use crate::svg::writer::OutputPath;
use crate::svg::{
    Placement, StyleKey, append_paths, collect_markers, extract_marker_radius, parse_document,
    read_document_text, write_merged,
};

/// Radius added to the marker radius to cover the marker's outline stroke.
pub const POINT_FRAMING_OFFSET: f64 = 0.5;

/// Suffix replacing the extension of a compressed plot.
pub const COMPRESSED_SUFFIX: &str = "_compressed.svg";

/// Configuration for merging one plot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Add [`POINT_FRAMING_OFFSET`] to the marker radius.
    pub point_framing: bool,
    /// How placement styles are grouped.
    pub style_key: StyleKey,
    /// Polygon vertices per disk.
    pub disk_segments: usize,
    /// Output path; derived from the plot name when `None`.
    pub output: Option<PathBuf>,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            point_framing: true,
            style_key: StyleKey::Exact,
            disk_segments: DEFAULT_DISK_SEGMENTS,
            output: None,
        }
    }
}

impl MergeConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> MergeConfigBuilder {
        MergeConfigBuilder::default()
    }

    /// Radius of the disks built for a plot whose marker radius is
    /// `marker_radius`.
    #[must_use]
    pub fn effective_radius(&self, marker_radius: f64) -> f64 {
        if self.point_framing {
            marker_radius + POINT_FRAMING_OFFSET
        } else {
            marker_radius
        }
    }
}

/// Builder for [`MergeConfig`].
#[derive(Debug, Default)]
pub struct MergeConfigBuilder {
    point_framing: Option<bool>,
    style_key: Option<StyleKey>,
    disk_segments: Option<usize>,
    output: Option<PathBuf>,
}

impl MergeConfigBuilder {
    /// Enable or disable the point framing correction.
    #[must_use]
    pub fn point_framing(mut self, enabled: bool) -> Self {
        self.point_framing = Some(enabled);
        self
    }

    /// Set how styles are grouped.
    #[must_use]
    pub fn style_key(mut self, style_key: StyleKey) -> Self {
        self.style_key = Some(style_key);
        self
    }

    /// Set the number of polygon vertices per disk.
    #[must_use]
    pub fn disk_segments(mut self, segments: usize) -> Self {
        self.disk_segments = Some(segments);
        self
    }

    /// Write the result to `path` instead of the derived name.
    #[must_use]
    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> MergeConfig {
        let defaults = MergeConfig::default();
        MergeConfig {
            point_framing: self.point_framing.unwrap_or(defaults.point_framing),
            style_key: self.style_key.unwrap_or(defaults.style_key),
            disk_segments: self.disk_segments.unwrap_or(defaults.disk_segments),
            output: self.output,
        }
    }
}

/// Outcome of merging one style group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummary {
    /// Style key of the group.
    pub style: String,
    /// Placements in the group.
    pub placements: usize,
    /// Placements skipped because their coordinates did not parse.
    pub skipped: usize,
    /// Polygons and holes of the merged outline.
    pub topology: Topology,
    /// Length of the emitted path data.
    pub path_bytes: usize,
}

/// Merged outlines for one plot, ready to be appended to a clean plot.
#[derive(Debug, Clone)]
pub struct MergePlan {
    /// Radius read from the marker template.
    pub marker_radius: f64,
    /// Radius of the disks after point framing.
    pub radius: f64,
    /// One path per non-empty style group.
    pub paths: Vec<OutputPath>,
    /// One summary per style group.
    pub groups: Vec<GroupSummary>,
}

impl MergePlan {
    /// Merge every style group of a parsed plot.
    pub fn from_document(doc: &Document<'_>, config: &MergeConfig) -> Result<Self> {
        let marker_radius = extract_marker_radius(doc)?;
        let radius = config.effective_radius(marker_radius);
        let markers = collect_markers(doc, config.style_key);

        let mut paths = Vec::with_capacity(markers.len());
        let mut groups = Vec::with_capacity(markers.len());

        for (style, placements) in markers.iter() {
            let (centers, skipped) = placement_centers(placements);
            if centers.is_empty() {
                warn!(style, skipped, "style group has no usable placements");
                groups.push(GroupSummary {
                    style: style.to_string(),
                    placements: placements.len(),
                    skipped,
                    topology: Topology::default(),
                    path_bytes: 0,
                });
                continue;
            }

            let union = union_disks(&centers, radius, config.disk_segments)?;
            let topology = Topology::of(&union);
            let d = to_path_data(&union);
            debug!(
                style,
                placements = placements.len(),
                polygons = topology.polygons,
                holes = topology.holes,
                "merged style group"
            );

            groups.push(GroupSummary {
                style: style.to_string(),
                placements: placements.len(),
                skipped,
                topology,
                path_bytes: d.len(),
            });
            paths.push(OutputPath {
                style: style.to_string(),
                d,
            });
        }

        Ok(Self {
            marker_radius,
            radius,
            paths,
            groups,
        })
    }

    /// Total placements across groups.
    #[must_use]
    pub fn placements(&self) -> usize {
        self.groups.iter().map(|g| g.placements).sum()
    }

    /// Total skipped placements across groups.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.groups.iter().map(|g| g.skipped).sum()
    }
}

/// Parse placement centers, skipping (and logging) unparsable ones.
fn placement_centers(placements: &[Placement]) -> (Vec<(f64, f64)>, usize) {
    let mut centers = Vec::with_capacity(placements.len());
    let mut skipped = 0;
    for placement in placements {
        match placement.center() {
            Ok(center) => centers.push(center),
            Err(e) => {
                warn!(error = %e, "skipping placement");
                skipped += 1;
            }
        }
    }
    (centers, skipped)
}

/// Report for one compressed plot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionReport {
    /// Plot that was compressed.
    pub input: PathBuf,
    /// Clean plot the outlines were appended to.
    pub clean: PathBuf,
    /// Written file.
    pub output: PathBuf,
    /// Radius read from the marker template.
    pub marker_radius: f64,
    /// Radius of the merged disks.
    pub radius: f64,
    /// Per-group results.
    pub groups: Vec<GroupSummary>,
    /// Total placements.
    pub placements: usize,
    /// Placements skipped because their coordinates did not parse.
    pub skipped: usize,
    /// Size of the input plot.
    pub input_bytes: u64,
    /// Size of the written file.
    pub output_bytes: u64,
    /// When the file was written.
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl CompressionReport {
    /// Input size divided by output size.
    #[must_use]
    pub fn compression_ratio(&self) -> f64 {
        if self.output_bytes == 0 {
            0.0
        } else {
            self.input_bytes as f64 / self.output_bytes as f64
        }
    }
}

/// Merge a plot held in memory into a clean plot held in memory.
pub fn merge_document(plot: &str, clean: &str, config: &MergeConfig) -> Result<(MergePlan, Vec<u8>)> {
    let doc = parse_document(plot)?;
    let plan = MergePlan::from_document(&doc, config)?;
    let bytes = append_paths(clean, &plan.paths)?;
    Ok((plan, bytes))
}

/// Compress `plot` onto `clean` and write the result.
///
/// The output goes to `config.output`, or next to the plot as
/// [`compressed_output_path`]. An existing output file is overwritten.
pub fn compress_plot(plot: &Path, clean: &Path, config: &MergeConfig) -> Result<CompressionReport> {
    let text = read_document_text(plot)?;
    let doc = parse_document(&text)?;
    let plan = MergePlan::from_document(&doc, config)?;

    let output = config.output.clone().unwrap_or_else(|| compressed_output_path(plot));
    let output_bytes = write_merged(clean, &output, &plan.paths)?;

    Ok(CompressionReport {
        input: plot.to_path_buf(),
        clean: clean.to_path_buf(),
        output,
        marker_radius: plan.marker_radius,
        radius: plan.radius,
        placements: plan.placements(),
        skipped: plan.skipped(),
        groups: plan.groups,
        input_bytes: text.len() as u64,
        output_bytes,
        timestamp: chrono::Utc::now(),
    })
}

/// Output path for a compressed plot: the file name without its last four
/// characters (the extension), plus `_compressed.svg`.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use marker_merge::merge::compressed_output_path;
///
/// assert_eq!(compressed_output_path(Path::new("plot.svg")), Path::new("plot_compressed.svg"));
/// ```
#[must_use]
pub fn compressed_output_path(plot: &Path) -> PathBuf {
    let name = plot
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = match name.char_indices().rev().nth(3) {
        Some((idx, _)) => &name[..idx],
        None => "",
    };
    plot.with_file_name(format!("{stem}{COMPRESSED_SUFFIX}"))
}

/// Whether a file name looks like the output of [`compressed_output_path`].
#[must_use]
pub fn is_compressed_output(name: &str) -> bool {
    name.ends_with("compressed.svg")
}
