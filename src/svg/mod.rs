//! SVG plot reading and writing.
//!
//! Plots are parsed once with `roxmltree` and handed to the extractors:
//!
//! - [`radius`]: recover the marker radius from the circle marker path
//! - [`markers`]: find the marker template and group its placements by style
//! - [`writer`]: append merged outlines to a clean plot
//!
//! [`path_data`] holds the drawing-command tokenizer shared by the above.

pub mod markers;
pub mod path_data;
pub mod radius;
pub mod writer;

use std::path::Path;

use roxmltree::{Document, ParsingOptions};

use crate::error::Result;

pub use markers::{MarkerTemplate, Placement, StyleGroups, StyleKey, collect_markers};
pub use radius::extract_marker_radius;
pub use writer::{append_paths, write_merged};

/// SVG namespace URI.
pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// XLink namespace URI, used by `xlink:href` on `<use>` elements.
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// Parse SVG text into a document tree.
///
/// DTDs are allowed since plotting libraries emit an SVG 1.1 doctype.
pub fn parse_document(text: &str) -> Result<Document<'_>> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    Ok(Document::parse_with_options(text, options)?)
}

/// Read an SVG file into memory.
pub fn read_document_text(path: &Path) -> Result<String> {
    Ok(std::fs::read_to_string(path)?)
}

/// Whether `node` is an SVG element with the given local name.
pub(crate) fn is_svg_element(node: roxmltree::Node<'_, '_>, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name && node.tag_name().namespace() == Some(SVG_NS)
}
