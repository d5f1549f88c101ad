//! Plot fixtures shared by unit tests.

use std::fmt::Write as _;

pub(crate) use crate::synth::plot::circle_marker_path;

/// Marker-free plot used as the clean document in pipeline tests.
pub(crate) const CLEAN_SVG: &str = r#"<?xml version="1.0" encoding="utf-8" standalone="no"?>
<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd">
<svg xmlns:xlink="http://www.w3.org/1999/xlink" width="576pt" height="360pt" viewBox="0 0 576 360" xmlns="http://www.w3.org/2000/svg" version="1.1">
 <g id="figure_1">
  <g id="patch_1">
   <path d="M 0 360 L 576 360 L 576 0 L 0 0 z" style="fill: #ffffff"/>
  </g>
 </g>
</svg>
"#;

/// Builder for a matplotlib-shaped scatter plot.
pub(crate) struct PlotFixture {
    radius: f64,
    placements: Vec<(Option<String>, Option<String>, Option<String>)>,
}

impl PlotFixture {
    pub(crate) fn new(radius: f64) -> Self {
        Self {
            radius,
            placements: Vec::new(),
        }
    }

    pub(crate) fn placement(self, x: f64, y: f64, style: &str) -> Self {
        self.raw_placement(Some(&x.to_string()), Some(&y.to_string()), Some(style))
    }

    pub(crate) fn raw_placement(mut self, x: Option<&str>, y: Option<&str>, style: Option<&str>) -> Self {
        self.placements
            .push((x.map(str::to_string), y.map(str::to_string), style.map(str::to_string)));
        self
    }

    pub(crate) fn render(&self) -> String {
        let mut svg = String::new();
        svg.push_str(
            r#"<?xml version="1.0" encoding="utf-8" standalone="no"?>
<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd">
<svg xmlns:xlink="http://www.w3.org/1999/xlink" width="576pt" height="360pt" viewBox="0 0 576 360" xmlns="http://www.w3.org/2000/svg" version="1.1">
 <g id="figure_1">
  <g id="patch_1">
   <path d="M 0 360 L 576 360 L 576 0 L 0 0 z" style="fill: #ffffff"/>
  </g>
  <g id="PathCollection_1">
"#,
        );
        let _ = writeln!(
            svg,
            r#"   <defs>
    <path id="mfixture" d="{}" style="stroke: #ff0000"/>
   </defs>"#,
            circle_marker_path(self.radius)
        );
        for (x, y, style) in &self.placements {
            svg.push_str(r##"   <use xlink:href="#mfixture""##);
            if let Some(x) = x {
                let _ = write!(svg, r#" x="{x}""#);
            }
            if let Some(y) = y {
                let _ = write!(svg, r#" y="{y}""#);
            }
            if let Some(style) = style {
                let _ = write!(svg, r#" style="{style}""#);
            }
            svg.push_str("/>\n");
        }
        svg.push_str("  </g>\n </g>\n</svg>\n");
        svg
    }
}
