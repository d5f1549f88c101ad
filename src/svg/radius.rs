//! Marker radius recovery.

use roxmltree::Document;
use tracing::debug;

use crate::error::{Error, Result};
use crate::geometry::validate_radius;
use crate::svg::path_data::{is_circle_marker, leading_move, parse_path_data};

/// Find the first circle marker path in the document and return its radius.
///
/// Every `path` element in the root element's namespace is considered in
/// document order. A path qualifies when it contains a cubic curve and ends
/// with a close command; circle markers are drawn starting at `(0, r)`, so the
/// second number of the leading move is the radius.
///
/// Paths whose data cannot be tokenized are skipped.
pub fn extract_marker_radius(doc: &Document<'_>) -> Result<f64> {
    let namespace = doc.root_element().tag_name().namespace();

    let (id, commands) = doc
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "path" && n.tag_name().namespace() == namespace)
        .find_map(|n| {
            let commands = parse_path_data(n.attribute("d")?).ok()?;
            is_circle_marker(&commands).then(|| (n.attribute("id"), commands))
        })
        .ok_or_else(|| Error::marker_not_found("no path with a cubic curve that ends with a close command"))?;

    let (_, radius) = leading_move(&commands).ok_or_else(|| {
        Error::marker_not_found("circle marker path does not start with a move to a point")
    })?;

    debug!(marker = id.unwrap_or("<anonymous>"), radius, "extracted marker radius");
    validate_radius(radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svg::parse_document;
    use crate::test_support::{PlotFixture, circle_marker_path};

    #[test]
    fn test_radius_from_marker_template() {
        let svg = PlotFixture::new(2.5).placement(10.0, 10.0, "fill:red").render();
        let doc = parse_document(&svg).unwrap();
        let radius = extract_marker_radius(&doc).unwrap();
        assert!((radius - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_skips_non_marker_paths() {
        let svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg">
  <path d="M 0 360 L 576 360 L 576 0 L 0 0 z"/>
  <path d="M 0 0 C 1 1 2 2 3 3"/>
  <path d="{}"/>
</svg>"#,
            circle_marker_path(4.0)
        );
        let doc = parse_document(&svg).unwrap();
        assert!((extract_marker_radius(&doc).unwrap() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_marker() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"><path d="M 0 0 L 1 1 z"/></svg>"#;
        let doc = parse_document(svg).unwrap();
        let err = extract_marker_radius(&doc).unwrap_err();
        assert!(matches!(err, Error::MarkerNotFound { .. }));
    }

    #[test]
    fn test_marker_without_leading_move() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"><path d="L 0 1 C 1 1 1 0 1 0 z"/></svg>"#;
        let doc = parse_document(svg).unwrap();
        let err = extract_marker_radius(&doc).unwrap_err();
        assert!(matches!(err, Error::MarkerNotFound { .. }));
    }

    #[test]
    fn test_non_positive_radius() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"><path d="M 0 -1 C 1 1 1 0 1 0 z"/></svg>"#;
        let doc = parse_document(svg).unwrap();
        let err = extract_marker_radius(&doc).unwrap_err();
        assert!(matches!(err, Error::InvalidRadius(_)));
    }
}
