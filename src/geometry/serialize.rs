//! Union geometry to SVG path data.
//!
//! Every ring becomes one closed subpath listing its coordinates in the order
//! `geo` returns them, closing coordinate included. The starting vertex and
//! direction are not canonicalised, so byte-identical output across `geo`
//! versions is not guaranteed.

use std::fmt::Write as _;

use geo::{LineString, MultiPolygon, Polygon};

/// Path data for a union: each polygon's exterior followed by its holes.
///
/// # Example
///
/// ```
/// use geo::{polygon, MultiPolygon};
/// use marker_merge::geometry::to_path_data;
///
/// let square = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0)];
/// let d = to_path_data(&MultiPolygon::new(vec![square]));
/// assert_eq!(d, "M 0,0 1,0 1,1 0,0 Z");
/// ```
#[must_use]
pub fn to_path_data(geometry: &MultiPolygon<f64>) -> String {
    geometry
        .0
        .iter()
        .map(polygon_to_path_data)
        .filter(|d| !d.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Path data for one polygon: exterior subpath, then one per interior.
#[must_use]
pub fn polygon_to_path_data(polygon: &Polygon<f64>) -> String {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .filter(|ring| !ring.0.is_empty())
        .map(ring_subpath)
        .collect::<Vec<_>>()
        .join(" ")
}

fn ring_subpath(ring: &LineString<f64>) -> String {
    let mut d = String::with_capacity(ring.0.len() * 24 + 4);
    d.push('M');
    for c in &ring.0 {
        let _ = write!(d, " {},{}", c.x, c.y);
    }
    d.push_str(" Z");
    d
}

/// Number of closed subpaths in path data produced by [`to_path_data`].
#[must_use]
pub fn subpath_count(d: &str) -> usize {
    d.matches('M').count()
}
