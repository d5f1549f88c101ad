//! Disk construction and union.
//!
//! Each marker placement becomes a disk of the shared marker radius. Disks
//! are approximated by regular polygons and merged with `geo`'s boolean
//! operations, which report holes where disks enclose uncovered regions.

pub mod serialize;

use geo::{Coord, LineString, MultiPolygon, Polygon, unary_union};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub use serialize::{polygon_to_path_data, to_path_data};

/// Default number of polygon vertices per disk.
pub const DEFAULT_DISK_SEGMENTS: usize = 64;

/// Fewest vertices a disk polygon is built with.
pub const MIN_DISK_SEGMENTS: usize = 8;

/// A marker footprint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Disk {
    /// Center x.
    pub x: f64,
    /// Center y.
    pub y: f64,
    /// Radius, shared by all disks of one plot.
    pub radius: f64,
}

impl Disk {
    /// Create a disk.
    #[must_use]
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Self { x, y, radius }
    }

    /// Regular polygon inscribed in the disk, counter-clockwise from angle 0.
    ///
    /// `segments` is raised to [`MIN_DISK_SEGMENTS`] if lower.
    #[must_use]
    pub fn to_polygon(&self, segments: usize) -> Polygon<f64> {
        let segments = segments.max(MIN_DISK_SEGMENTS);
        let step = std::f64::consts::TAU / segments as f64;
        let coords: Vec<Coord<f64>> = (0..segments)
            .map(|i| {
                let angle = i as f64 * step;
                Coord {
                    x: self.x + self.radius * angle.cos(),
                    y: self.y + self.radius * angle.sin(),
                }
            })
            .collect();
        // Polygon::new closes the ring.
        Polygon::new(LineString::new(coords), Vec::new())
    }
}

/// Check that a radius is usable for building disks.
///
/// # Example
///
/// ```
/// use marker_merge::geometry::validate_radius;
///
/// assert!(validate_radius(1.5).is_ok());
/// assert!(validate_radius(0.0).is_err());
/// assert!(validate_radius(f64::NAN).is_err());
/// ```
pub fn validate_radius(radius: f64) -> Result<f64> {
    if radius.is_finite() && radius > 0.0 {
        Ok(radius)
    } else {
        Err(Error::InvalidRadius(format!("{radius} is not a positive finite number")))
    }
}

/// Union of equal disks centred on `centers`.
pub fn union_disks(centers: &[(f64, f64)], radius: f64, segments: usize) -> Result<MultiPolygon<f64>> {
    let radius = validate_radius(radius)?;
    if centers.is_empty() {
        return Ok(MultiPolygon::new(Vec::new()));
    }
    let polygons: Vec<Polygon<f64>> = centers
        .iter()
        .map(|&(x, y)| Disk::new(x, y, radius).to_polygon(segments))
        .collect();
    Ok(unary_union(&polygons))
}

/// Polygon and hole counts of a union.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    /// Number of disjoint polygons.
    pub polygons: usize,
    /// Number of interior rings across all polygons.
    pub holes: usize,
}

impl Topology {
    /// Count polygons and holes.
    #[must_use]
    pub fn of(geometry: &MultiPolygon<f64>) -> Self {
        Self {
            polygons: geometry.0.len(),
            holes: geometry.0.iter().map(|p| p.interiors().len()).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Area;

    fn ring_centers(count: usize, ring_radius: f64) -> Vec<(f64, f64)> {
        (0..count)
            .map(|i| {
                let angle = i as f64 * std::f64::consts::TAU / count as f64;
                (ring_radius * angle.cos(), ring_radius * angle.sin())
            })
            .collect()
    }

    #[test]
    fn test_disk_polygon() {
        let polygon = Disk::new(1.0, 2.0, 3.0).to_polygon(16);
        // closed ring repeats the first coordinate
        assert_eq!(polygon.exterior().0.len(), 17);
        for c in &polygon.exterior().0 {
            let r = ((c.x - 1.0).powi(2) + (c.y - 2.0).powi(2)).sqrt();
            assert!((r - 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_segments_floor() {
        let polygon = Disk::new(0.0, 0.0, 1.0).to_polygon(3);
        assert_eq!(polygon.exterior().0.len(), MIN_DISK_SEGMENTS + 1);
    }

    #[test]
    fn test_separated_disks_stay_separate() {
        let centers: Vec<(f64, f64)> = (0..5_i32).map(|i| (f64::from(i) * 10.0, 0.0)).collect();
        let union = union_disks(&centers, 1.0, DEFAULT_DISK_SEGMENTS).unwrap();
        assert_eq!(Topology::of(&union), Topology { polygons: 5, holes: 0 });
    }

    #[test]
    fn test_overlapping_chain_collapses() {
        let centers: Vec<(f64, f64)> = (0..6_i32).map(|i| (f64::from(i) * 0.5, 0.0)).collect();
        let union = union_disks(&centers, 1.0, DEFAULT_DISK_SEGMENTS).unwrap();
        assert_eq!(Topology::of(&union), Topology { polygons: 1, holes: 0 });

        // area lies between one disk and the sum of all disks
        let area = union.unsigned_area();
        let disk = std::f64::consts::PI;
        assert!(area > disk && area < 6.0 * disk);
    }

    #[test]
    fn test_ring_encloses_hole() {
        let union = union_disks(&ring_centers(12, 3.0), 1.0, DEFAULT_DISK_SEGMENTS).unwrap();
        assert_eq!(Topology::of(&union), Topology { polygons: 1, holes: 1 });
    }

    #[test]
    fn test_ring_hole_survives_point_framing() {
        let centers = ring_centers(16, 4.0);
        for radius in [1.0, 1.5] {
            let union = union_disks(&centers, radius, DEFAULT_DISK_SEGMENTS).unwrap();
            assert_eq!(Topology::of(&union), Topology { polygons: 1, holes: 1 }, "radius {radius}");
        }
    }

    #[test]
    fn test_empty_centers() {
        let union = union_disks(&[], 1.0, DEFAULT_DISK_SEGMENTS).unwrap();
        assert_eq!(Topology::of(&union), Topology::default());
    }

    #[test]
    fn test_invalid_radius() {
        for radius in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = union_disks(&[(0.0, 0.0)], radius, DEFAULT_DISK_SEGMENTS).unwrap_err();
            assert!(matches!(err, Error::InvalidRadius(_)));
        }
    }
}
