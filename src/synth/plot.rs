//! Scatter plot rendering in the layout matplotlib uses for its SVG backend.
//!
//! One circle marker template lives in `<defs>` and every point is a `<use>`
//! of it. Figure and axes geometry match an 8×5 inch figure with default
//! subplot margins.

use std::f64::consts::{FRAC_PI_4, FRAC_PI_8};
use std::fmt::Write as _;
use std::io::Write;

use crate::svg::{SVG_NS, XLINK_NS};

/// Figure width in points.
pub const FIGURE_WIDTH: f64 = 576.0;
/// Figure height in points.
pub const FIGURE_HEIGHT: f64 = 360.0;

const AXES_LEFT: f64 = 72.0;
const AXES_WIDTH: f64 = 446.4;
const AXES_BOTTOM: f64 = 39.6;
const AXES_HEIGHT: f64 = 277.2;

const CLIP_ID: &str = "p5a1c2e3f4b";

/// Data limits of the axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxesLimits {
    /// Lower and upper x limit.
    pub x: (f64, f64),
    /// Lower and upper y limit.
    pub y: (f64, f64),
}

impl Default for AxesLimits {
    fn default() -> Self {
        Self {
            x: (0.0, 10.0),
            y: (-0.7, 1.7),
        }
    }
}

impl AxesLimits {
    /// Map a data point to figure coordinates (y grows downwards).
    #[must_use]
    pub fn to_figure(&self, x: f64, y: f64) -> (f64, f64) {
        let fx = AXES_LEFT + (x - self.x.0) / (self.x.1 - self.x.0) * AXES_WIDTH;
        let fy = FIGURE_HEIGHT - (AXES_BOTTOM + (y - self.y.0) / (self.y.1 - self.y.0) * AXES_HEIGHT);
        (fx, fy)
    }
}

/// Marker radius in points for a scatter marker of `area` square points.
#[must_use]
pub fn marker_radius(area: f64) -> f64 {
    area.sqrt() / 2.0
}

/// Circle of radius `radius` around the origin as eight cubic Bézier arcs,
/// starting at `(0, radius)` and closed with `z`.
///
/// # Example
///
/// ```
/// use marker_merge::synth::plot::circle_marker_path;
///
/// let d = circle_marker_path(1.5);
/// assert!(d.starts_with("M 0 1.5 \nC "));
/// assert!(d.ends_with("z"));
/// ```
#[must_use]
pub fn circle_marker_path(radius: f64) -> String {
    let k = 4.0 / 3.0 * (FRAC_PI_8 / 2.0).tan() * radius;
    let point = |angle: f64| (radius * angle.cos(), radius * angle.sin());

    let mut d = format!("M 0 {} \n", format_coord(radius));
    for i in 0..8_i32 {
        let a0 = std::f64::consts::FRAC_PI_2 - f64::from(i) * FRAC_PI_4;
        let a1 = a0 - FRAC_PI_4;
        let (x0, y0) = point(a0);
        let (x3, y3) = point(a1);
        let (x1, y1) = (x0 + k * a0.sin(), y0 - k * a0.cos());
        let (x2, y2) = (x3 - k * a1.sin(), y3 + k * a1.cos());
        let _ = writeln!(
            d,
            "C {} {} {} {} {} {} ",
            format_coord(x1),
            format_coord(y1),
            format_coord(x2),
            format_coord(y2),
            format_coord(x3),
            format_coord(y3)
        );
    }
    d.push('z');
    d
}

/// Six decimals with trailing zeros removed, `-0` folded to `0`.
#[must_use]
pub fn format_coord(value: f64) -> String {
    let fixed = format!("{value:.6}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}

/// Marker id derived from the marker outline, stable across runs.
fn marker_id(path_data: &str) -> String {
    // FNV-1a, 40 bits of it
    let hash = path_data
        .bytes()
        .fold(0xcbf2_9ce4_8422_2325_u64, |h, b| (h ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3));
    format!("m{:010x}", hash & 0xff_ffff_ffff)
}

/// Style of one scatter series.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerStyle {
    /// Fill and edge color.
    pub color: String,
    /// Marker area in square points.
    pub area: f64,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            color: "#ff0000".to_string(),
            area: 10.0,
        }
    }
}

fn write_header(out: &mut impl Write, limits: &AxesLimits) -> std::io::Result<()> {
    let (left, top) = limits.to_figure(limits.x.0, limits.y.1);
    let (right, bottom) = limits.to_figure(limits.x.1, limits.y.0);
    let left = format_coord(left);
    let right = format_coord(right);
    let top = format_coord(top);
    let bottom = format_coord(bottom);

    writeln!(out, r#"<?xml version="1.0" encoding="utf-8" standalone="no"?>"#)?;
    writeln!(
        out,
        r#"<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd">"#
    )?;
    writeln!(
        out,
        r#"<svg xmlns:xlink="{XLINK_NS}" width="{FIGURE_WIDTH}pt" height="{FIGURE_HEIGHT}pt" viewBox="0 0 {FIGURE_WIDTH} {FIGURE_HEIGHT}" xmlns="{SVG_NS}" version="1.1">"#
    )?;
    writeln!(out, r#" <defs>"#)?;
    writeln!(out, r#"  <style type="text/css">*{{stroke-linejoin: round; stroke-linecap: butt}}</style>"#)?;
    writeln!(out, r#" </defs>"#)?;
    writeln!(out, r#" <g id="figure_1">"#)?;
    writeln!(out, r#"  <g id="patch_1">"#)?;
    writeln!(
        out,
        r#"   <path d="M 0 {FIGURE_HEIGHT} L {FIGURE_WIDTH} {FIGURE_HEIGHT} L {FIGURE_WIDTH} 0 L 0 0 z" style="fill: #ffffff"/>"#
    )?;
    writeln!(out, r#"  </g>"#)?;
    writeln!(out, r#"  <g id="axes_1">"#)?;
    writeln!(out, r#"   <g id="patch_2">"#)?;
    writeln!(
        out,
        r#"    <path d="M {left} {bottom} L {right} {bottom} L {right} {top} L {left} {top} z" style="fill: #ffffff"/>"#
    )?;
    writeln!(out, r#"   </g>"#)
}

fn write_footer(out: &mut impl Write, limits: &AxesLimits) -> std::io::Result<()> {
    let (left, top) = limits.to_figure(limits.x.0, limits.y.1);
    let (right, bottom) = limits.to_figure(limits.x.1, limits.y.0);
    let spine_style = "fill: none; stroke: #000000; stroke-width: 0.8; stroke-linejoin: miter; stroke-linecap: square";
    let spines = [
        ("patch_3", (left, bottom), (left, top)),
        ("patch_4", (right, bottom), (right, top)),
        ("patch_5", (left, bottom), (right, bottom)),
        ("patch_6", (left, top), (right, top)),
    ];

    for (id, (x0, y0), (x1, y1)) in spines {
        writeln!(out, r#"   <g id="{id}">"#)?;
        writeln!(
            out,
            r#"    <path d="M {} {} L {} {}" style="{spine_style}"/>"#,
            format_coord(x0),
            format_coord(y0),
            format_coord(x1),
            format_coord(y1)
        )?;
        writeln!(out, r#"   </g>"#)?;
    }
    writeln!(out, r#"  </g>"#)?;
    writeln!(out, r#" </g>"#)?;
    writeln!(out, r#" <defs>"#)?;
    writeln!(out, r#"  <clipPath id="{CLIP_ID}">"#)?;
    writeln!(
        out,
        r#"   <rect x="{}" y="{}" width="{}" height="{}"/>"#,
        format_coord(left),
        format_coord(top),
        format_coord(right - left),
        format_coord(bottom - top)
    )?;
    writeln!(out, r#"  </clipPath>"#)?;
    writeln!(out, r#" </defs>"#)?;
    writeln!(out, "</svg>")
}

/// Write a scatter plot of `xs`/`ys` as an SVG document.
///
/// Points are drawn in data order; `xs` and `ys` are zipped, so a longer
/// slice is truncated.
pub fn write_scatter(
    out: &mut impl Write,
    xs: &[f64],
    ys: &[f64],
    limits: &AxesLimits,
    style: &MarkerStyle,
) -> std::io::Result<()> {
    write_header(out, limits)?;

    let d = circle_marker_path(marker_radius(style.area));
    let id = marker_id(&d);
    let use_style = format!("fill: {0}; stroke: {0}", style.color);

    writeln!(out, r#"   <g id="PathCollection_1">"#)?;
    writeln!(out, r#"    <defs>"#)?;
    writeln!(out, r#"     <path id="{id}" d="{d}" style="stroke: {}"/>"#, style.color)?;
    writeln!(out, r#"    </defs>"#)?;
    writeln!(out, r#"    <g clip-path="url(#{CLIP_ID})">"#)?;
    for (&x, &y) in xs.iter().zip(ys) {
        let (fx, fy) = limits.to_figure(x, y);
        writeln!(
            out,
            r##"     <use xlink:href="#{id}" x="{}" y="{}" style="{use_style}"/>"##,
            format_coord(fx),
            format_coord(fy)
        )?;
    }
    writeln!(out, r#"    </g>"#)?;
    writeln!(out, r#"   </g>"#)?;

    write_footer(out, limits)
}

/// Write the same figure without any markers.
pub fn write_clean(out: &mut impl Write, limits: &AxesLimits) -> std::io::Result<()> {
    write_header(out, limits)?;
    write_footer(out, limits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svg::path_data::{is_circle_marker, leading_move, parse_path_data};
    use crate::svg::{StyleKey, collect_markers, extract_marker_radius, parse_document};

    #[test]
    fn test_format_coord() {
        assert_eq!(format_coord(72.0), "72");
        assert_eq!(format_coord(1.581_138_83), "1.581139");
        assert_eq!(format_coord(-0.000_000_1), "0");
        assert_eq!(format_coord(-2.5), "-2.5");
    }

    #[test]
    fn test_circle_marker_path_shape() {
        let d = circle_marker_path(2.0);
        let commands = parse_path_data(&d).unwrap();

        assert!(is_circle_marker(&commands));
        assert_eq!(leading_move(&commands), Some((0.0, 2.0)));
        assert_eq!(commands.iter().filter(|c| c.is_cubic()).count(), 8);

        // every arc ends on the circle
        for c in commands.iter().filter(|c| c.is_cubic()) {
            let (x, y) = (c.args[4], c.args[5]);
            assert!(((x * x + y * y).sqrt() - 2.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_axes_mapping() {
        let limits = AxesLimits::default();
        let (x, y) = limits.to_figure(0.0, -0.7);
        assert!((x - 72.0).abs() < 1e-9);
        assert!((y - 320.4).abs() < 1e-9);
        let (x, y) = limits.to_figure(10.0, 1.7);
        assert!((x - 518.4).abs() < 1e-9);
        assert!((y - 43.2).abs() < 1e-9);
    }

    #[test]
    fn test_scatter_is_a_mergeable_plot() {
        let mut out = Vec::new();
        write_scatter(
            &mut out,
            &[1.0, 2.0, 3.0],
            &[0.0, 0.5, 1.0],
            &AxesLimits::default(),
            &MarkerStyle::default(),
        )
        .unwrap();
        let text = String::from_utf8(out).unwrap();
        let doc = parse_document(&text).unwrap();

        let radius = extract_marker_radius(&doc).unwrap();
        assert_eq!(radius, 1.581_139);

        let groups = collect_markers(&doc, StyleKey::Exact);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups.placement_count(), 3);
    }

    #[test]
    fn test_clean_plot_has_no_markers() {
        let mut out = Vec::new();
        write_clean(&mut out, &AxesLimits::default()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let doc = parse_document(&text).unwrap();

        assert!(extract_marker_radius(&doc).is_err());
        assert!(collect_markers(&doc, StyleKey::Exact).is_empty());
    }
}
