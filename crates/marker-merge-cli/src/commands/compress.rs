//! Compress command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use marker_merge::{CompressionReport, MergeConfig, compress_plot};

pub fn run(
    plot: PathBuf,
    clean: PathBuf,
    output: Option<PathBuf>,
    config: &MergeConfig,
    json: bool,
) -> Result<()> {
    let mut config = config.clone();
    config.output = output;

    let report = compress_plot(&plot, &clean, &config)
        .with_context(|| format!("Failed to compress {}", plot.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

pub fn print_report(report: &CompressionReport) {
    println!("Compressed: {}", report.input.display());
    println!("{:-<60}", "");
    println!("  Output:     {}", report.output.display());
    println!(
        "  Radius:     {} (marker {})",
        report.radius, report.marker_radius
    );
    println!(
        "  Placements: {} ({} skipped)",
        report.placements, report.skipped
    );
    println!(
        "  Size:       {} -> {} bytes ({:.1}x)",
        report.input_bytes,
        report.output_bytes,
        report.compression_ratio()
    );

    println!();
    println!(
        "{:<40} {:>10} {:>9} {:>6}",
        "Style", "Markers", "Polygons", "Holes"
    );
    for group in &report.groups {
        let style = if group.style.is_empty() {
            "(none)"
        } else {
            group.style.as_str()
        };
        println!(
            "{:<40} {:>10} {:>9} {:>6}",
            truncate(style, 40),
            group.placements,
            group.topology.polygons,
            group.topology.holes
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
