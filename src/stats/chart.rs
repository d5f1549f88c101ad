//! SVG chart generation for timing analysis.
//!
//! Draws measured timings (markers with optional error bars) together with
//! fitted curves (lines) on linear or logarithmic axes.
//! All charts support light and dark mode via CSS media queries.

use std::fmt::Write as _;

/// Data point for a chart series.
#[derive(Debug, Clone)]
pub struct ChartPoint {
    /// X-axis value (typically the number of points).
    pub x: f64,
    /// Y-axis value (typically a time in seconds).
    pub y: f64,
    /// Half-height of the error bar, if any.
    pub error: Option<f64>,
}

impl ChartPoint {
    /// A point without an error bar.
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, error: None }
    }
}

/// How a series is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    /// Markers with error bars, no connecting line.
    Markers,
    /// A polyline without markers.
    Line,
}

/// A series of data points with styling.
#[derive(Debug, Clone)]
pub struct ChartSeries {
    /// Series identifier (used in legend).
    pub name: String,
    /// CSS color for the series.
    pub color: String,
    /// Drawing style.
    pub kind: SeriesKind,
    /// Data points sorted by X.
    pub points: Vec<ChartPoint>,
}

/// Chart configuration.
#[derive(Debug, Clone)]
pub struct ChartConfig {
    /// Chart title.
    pub title: String,
    /// X-axis label.
    pub x_label: String,
    /// Y-axis label.
    pub y_label: String,
    /// Logarithmic X axis.
    pub log_x: bool,
    /// Logarithmic Y axis.
    pub log_y: bool,
    /// Chart width in pixels.
    pub width: u32,
    /// Chart height in pixels.
    pub height: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            title: "Compression time".to_string(),
            x_label: "Number of points".to_string(),
            y_label: "Execution time (s)".to_string(),
            log_x: false,
            log_y: false,
            width: 800,
            height: 600,
        }
    }
}

impl ChartConfig {
    /// Creates a new chart configuration with the given title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Uses logarithmic scales on both axes.
    #[must_use]
    pub fn with_log_axes(mut self, log: bool) -> Self {
        self.log_x = log;
        self.log_y = log;
        self
    }
}

/// One axis: data range in (possibly log-transformed) space.
#[derive(Debug, Clone, Copy)]
struct Axis {
    log: bool,
    min: f64,
    max: f64,
}

impl Axis {
    fn from_values(values: impl Iterator<Item = f64>, log: bool) -> Option<Self> {
        let transformed: Vec<f64> = values.filter_map(|v| transform(v, log)).collect();
        if transformed.is_empty() {
            return None;
        }
        let (min, max) = if log {
            // whole decades
            let (lo, hi) = min_max(&transformed);
            (lo.floor(), hi.ceil().max(lo.floor() + 1.0))
        } else {
            bounds_with_padding(&transformed, 0.05)
        };
        Some(Self { log, min, max })
    }

    /// Position in `[0, 1]` along the axis; `None` for values a log axis
    /// cannot show.
    fn fraction(&self, value: f64) -> Option<f64> {
        let v = transform(value, self.log)?;
        Some((v - self.min) / (self.max - self.min))
    }

    /// Tick values in data space.
    fn ticks(&self) -> Vec<f64> {
        if self.log {
            let first = self.min as i32;
            let last = self.max as i32;
            (first..=last).map(|e| 10_f64.powi(e)).collect()
        } else {
            (0..=5)
                .map(|i| self.min + f64::from(i) / 5.0 * (self.max - self.min))
                .collect()
        }
    }
}

fn transform(value: f64, log: bool) -> Option<f64> {
    if !value.is_finite() {
        None
    } else if log {
        (value > 0.0).then(|| value.log10())
    } else {
        Some(value)
    }
}

fn format_tick(value: f64, log: bool) -> String {
    if log {
        format!("1e{}", value.log10().round() as i32)
    } else if value != 0.0 && (value.abs() < 0.01 || value.abs() >= 100_000.0) {
        format!("{value:.2e}")
    } else {
        format!("{value:.2}")
    }
}

/// Generates an SVG chart from the given series.
///
/// Returns an empty string when no series has a point the axes can show.
///
/// # Example
///
/// ```rust
/// use marker_merge::stats::chart::{generate_svg, ChartConfig, ChartPoint, ChartSeries, SeriesKind};
///
/// let series = vec![ChartSeries {
///     name: "Data".to_string(),
///     color: "#e74c3c".to_string(),
///     kind: SeriesKind::Markers,
///     points: vec![ChartPoint::new(1000.0, 0.01), ChartPoint::new(10000.0, 0.1)],
/// }];
///
/// let config = ChartConfig::new("Linear Function Fit").with_log_axes(true);
///
/// let svg = generate_svg(&series, &config);
/// assert!(svg.starts_with("<svg"));
/// ```
#[must_use]
pub fn generate_svg(series: &[ChartSeries], config: &ChartConfig) -> String {
    let mut svg = String::with_capacity(8192);

    let non_empty: Vec<_> = series.iter().filter(|s| !s.points.is_empty()).collect();

    // Error bars widen the Y range.
    let all_x = non_empty.iter().flat_map(|s| s.points.iter().map(|p| p.x));
    let all_y = non_empty.iter().flat_map(|s| {
        s.points.iter().flat_map(|p| {
            let e = p.error.unwrap_or(0.0).abs();
            [p.y - e, p.y, p.y + e]
        })
    });
    let (Some(x_axis), Some(y_axis)) = (
        Axis::from_values(all_x, config.log_x),
        Axis::from_values(all_y, config.log_y),
    ) else {
        return String::new();
    };

    let width = config.width;
    let height = config.height;
    let margin_top = 50;
    let margin_right = 190;
    let margin_bottom = 70;
    let margin_left = 90;
    let plot_width = width - margin_left - margin_right;
    let plot_height = height - margin_top - margin_bottom;

    let scale_x = |v: f64| -> Option<f64> {
        x_axis
            .fraction(v)
            .map(|f| f64::from(margin_left) + f * f64::from(plot_width))
    };
    let scale_y = |v: f64| -> Option<f64> {
        y_axis
            .fraction(v)
            .map(|f| f64::from(margin_top) + (1.0 - f) * f64::from(plot_height))
    };

    // SVG header
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}">"#,
        width, height
    );

    // CSS with dark mode support
    svg.push_str(
        r#"<style>
  :root {
    --bg-color: #ffffff;
    --text-color: #1a1a1a;
    --grid-color: #e0e0e0;
    --axis-color: #333333;
    --legend-bg: #ffffff;
    --legend-border: #cccccc;
  }
  @media (prefers-color-scheme: dark) {
    :root {
      --bg-color: #1a1a1a;
      --text-color: #e0e0e0;
      --grid-color: #404040;
      --axis-color: #b0b0b0;
      --legend-bg: #2a2a2a;
      --legend-border: #505050;
    }
  }
  .background { fill: var(--bg-color); }
  .title { font: bold 18px system-ui, sans-serif; fill: var(--text-color); }
  .axis-label { font: 13px system-ui, sans-serif; fill: var(--text-color); }
  .tick-label { font: 11px system-ui, sans-serif; fill: var(--text-color); }
  .legend { font: 13px system-ui, sans-serif; fill: var(--text-color); }
  .grid { stroke: var(--grid-color); stroke-width: 1; }
  .axis { stroke: var(--axis-color); stroke-width: 1.5; }
  .legend-bg { fill: var(--legend-bg); stroke: var(--legend-border); }
</style>
"#,
    );

    let _ = writeln!(
        svg,
        r#"<rect class="background" width="{}" height="{}"/>"#,
        width, height
    );

    let _ = writeln!(
        svg,
        r#"<text x="{}" y="30" text-anchor="middle" class="title">{}</text>"#,
        f64::from(width) / 2.0,
        config.title
    );

    // Grid lines and tick labels
    for value in x_axis.ticks() {
        let Some(x) = scale_x(value) else { continue };
        let _ = writeln!(
            svg,
            r#"<line x1="{:.2}" y1="{}" x2="{:.2}" y2="{}" class="grid"/>"#,
            x,
            margin_top,
            x,
            height - margin_bottom
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.2}" y="{}" text-anchor="middle" class="tick-label">{}</text>"#,
            x,
            height - margin_bottom + 20,
            format_tick(value, x_axis.log)
        );
    }
    for value in y_axis.ticks() {
        let Some(y) = scale_y(value) else { continue };
        let _ = writeln!(
            svg,
            r#"<line x1="{}" y1="{:.2}" x2="{}" y2="{:.2}" class="grid"/>"#,
            margin_left,
            y,
            width - margin_right,
            y
        );
        let _ = writeln!(
            svg,
            r#"<text x="{}" y="{:.2}" text-anchor="end" class="tick-label">{}</text>"#,
            margin_left - 10,
            y + 4.0,
            format_tick(value, y_axis.log)
        );
    }

    // Axes
    let _ = writeln!(
        svg,
        r#"<line x1="{}" y1="{}" x2="{}" y2="{}" class="axis"/>"#,
        margin_left,
        height - margin_bottom,
        width - margin_right,
        height - margin_bottom
    );
    let _ = writeln!(
        svg,
        r#"<line x1="{}" y1="{}" x2="{}" y2="{}" class="axis"/>"#,
        margin_left,
        margin_top,
        margin_left,
        height - margin_bottom
    );

    let _ = writeln!(
        svg,
        r#"<text x="{}" y="{}" text-anchor="middle" class="axis-label">{}</text>"#,
        f64::from(margin_left + plot_width / 2),
        height - 20,
        config.x_label
    );
    let _ = writeln!(
        svg,
        r#"<text x="25" y="{}" text-anchor="middle" class="axis-label" transform="rotate(-90 25 {})">{}</text>"#,
        f64::from(height) / 2.0,
        f64::from(height) / 2.0,
        config.y_label
    );

    // Plot series
    let bottom = f64::from(height - margin_bottom);
    for s in &non_empty {
        match s.kind {
            SeriesKind::Line => {
                let mut path = String::new();
                for p in &s.points {
                    let (Some(x), Some(y)) = (scale_x(p.x), scale_y(p.y)) else {
                        continue;
                    };
                    let prefix = if path.is_empty() { "M" } else { " L" };
                    let _ = write!(path, "{} {:.2},{:.2}", prefix, x, y);
                }
                if !path.is_empty() {
                    let _ = writeln!(
                        svg,
                        r#"<path d="{}" stroke="{}" stroke-width="2.5" fill="none"/>"#,
                        path, s.color
                    );
                }
            }
            SeriesKind::Markers => {
                for p in &s.points {
                    let (Some(x), Some(y)) = (scale_x(p.x), scale_y(p.y)) else {
                        continue;
                    };
                    if let Some(e) = p.error.map(f64::abs).filter(|e| *e > 0.0) {
                        // lower end may fall off a log axis
                        let y_low = scale_y(p.y - e).unwrap_or(bottom).min(bottom);
                        let y_high = scale_y(p.y + e).unwrap_or(y);
                        let _ = writeln!(
                            svg,
                            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="1.5"/>"#,
                            x, y_low, x, y_high, s.color
                        );
                    }
                    let _ = writeln!(
                        svg,
                        r#"<circle cx="{:.2}" cy="{:.2}" r="4" fill="{}"/>"#,
                        x, y, s.color
                    );
                }
            }
        }
    }

    // Legend
    let legend_x = width - margin_right + 15;
    let legend_y = margin_top + 20;
    let legend_height = 20 + non_empty.len() as u32 * 25;

    let _ = writeln!(
        svg,
        r#"<rect x="{}" y="{}" width="165" height="{}" rx="4" class="legend-bg"/>"#,
        legend_x,
        legend_y - 15,
        legend_height
    );

    for (i, s) in non_empty.iter().enumerate() {
        let y_offset = legend_y + i as u32 * 25;
        match s.kind {
            SeriesKind::Markers => {
                let _ = writeln!(
                    svg,
                    r#"<circle cx="{}" cy="{}" r="4" fill="{}"/>"#,
                    legend_x + 15,
                    y_offset + 5,
                    s.color
                );
            }
            SeriesKind::Line => {
                let _ = writeln!(
                    svg,
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="2.5"/>"#,
                    legend_x + 6,
                    y_offset + 5,
                    legend_x + 24,
                    y_offset + 5,
                    s.color
                );
            }
        }
        let _ = writeln!(
            svg,
            r#"<text x="{}" y="{}" class="legend">{}</text>"#,
            legend_x + 32,
            y_offset + 9,
            s.name
        );
    }

    svg.push_str("</svg>\n");
    svg
}

fn min_max(values: &[f64]) -> (f64, f64) {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    (min, max)
}

/// Calculates min/max bounds with padding.
fn bounds_with_padding(values: &[f64], padding: f64) -> (f64, f64) {
    let (min, max) = min_max(values);
    let range = max - min;
    if range == 0.0 {
        let pad = if min == 0.0 { 1.0 } else { min.abs() * padding };
        return (min - pad, max + pad);
    }
    (min - range * padding, max + range * padding)
}

/// Standard color palette for timing charts.
pub mod colors {
    /// Red, for measured data.
    pub const RED: &str = "#e74c3c";
    /// Blue, for the first fitted curve.
    pub const BLUE: &str = "#3498db";
    /// Green.
    pub const GREEN: &str = "#27ae60";
    /// Orange.
    pub const ORANGE: &str = "#e67e22";
    /// Purple.
    pub const PURPLE: &str = "#9b59b6";
}
