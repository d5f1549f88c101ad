//! Marker template lookup and placement grouping.

use indexmap::IndexMap;
use roxmltree::Document;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::svg::{XLINK_NS, is_svg_element};

/// How placement styles are turned into group keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleKey {
    /// Group by the exact style attribute text. `"fill:red"` and
    /// `"fill:red;"` are different groups.
    #[default]
    Exact,
    /// Group by declarations with surrounding whitespace and empty
    /// declarations removed, so formatting differences collapse.
    Normalized,
}

impl StyleKey {
    /// Compute the group key for a style attribute value.
    ///
    /// # Example
    ///
    /// ```
    /// use marker_merge::svg::StyleKey;
    ///
    /// assert_eq!(StyleKey::Exact.key("fill:red;"), "fill:red;");
    /// assert_eq!(StyleKey::Normalized.key(" fill : red ;"), "fill: red");
    /// ```
    #[must_use]
    pub fn key(self, style: &str) -> String {
        match self {
            Self::Exact => style.to_string(),
            Self::Normalized => style
                .split(';')
                .map(str::trim)
                .filter(|decl| !decl.is_empty())
                .map(|decl| match decl.split_once(':') {
                    Some((name, value)) => format!("{}: {}", name.trim(), value.trim()),
                    None => decl.to_string(),
                })
                .collect::<Vec<_>>()
                .join("; "),
        }
    }
}

/// The reusable marker shape referenced by every placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerTemplate {
    /// Element id, referenced as `#id`.
    pub id: String,
    /// Drawing commands of the marker shape.
    pub path_data: String,
}

/// One `<use>` of the marker template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// Id of the referenced template.
    pub template_id: String,
    /// Raw `x` attribute, `"0"` when absent.
    pub x: String,
    /// Raw `y` attribute, `"0"` when absent.
    pub y: String,
    /// Raw `style` attribute, empty when absent.
    pub style: String,
}

impl Placement {
    /// Parse the placement offset as a center point.
    pub fn center(&self) -> Result<(f64, f64)> {
        let x = self.x.trim().parse::<f64>().ok().filter(|v| v.is_finite());
        let y = self.y.trim().parse::<f64>().ok().filter(|v| v.is_finite());
        match (x, y) {
            (Some(x), Some(y)) => Ok((x, y)),
            _ => Err(Error::PlacementParse {
                x: self.x.clone(),
                y: self.y.clone(),
            }),
        }
    }
}

/// Placements of one marker template grouped by style key.
///
/// Groups keep the order in which their first placement appears.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StyleGroups {
    /// The template the placements refer to, if one was found.
    pub template: Option<MarkerTemplate>,
    /// Style key to placements.
    pub groups: IndexMap<String, Vec<Placement>>,
}

impl StyleGroups {
    /// Number of style groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether no placements were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total placements across all groups.
    #[must_use]
    pub fn placement_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Iterate over `(style key, placements)`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Placement])> {
        self.groups.iter().map(|(style, placements)| (style.as_str(), placements.as_slice()))
    }
}

/// Collect placements of the first `<defs>` path, grouped by style.
///
/// A document without a template in `<defs>` yields empty groups; this is
/// logged rather than treated as an error.
pub fn collect_markers(doc: &Document<'_>, style_key: StyleKey) -> StyleGroups {
    let Some(template_node) = doc.descendants().find(|n| {
        is_svg_element(*n, "path") && n.parent_element().is_some_and(|p| is_svg_element(p, "defs"))
    }) else {
        warn!("no circle path found in <defs>");
        return StyleGroups::default();
    };

    let Some(id) = template_node.attribute("id") else {
        warn!("marker template in <defs> has no id");
        return StyleGroups::default();
    };

    let template = MarkerTemplate {
        id: id.to_string(),
        path_data: template_node.attribute("d").unwrap_or_default().to_string(),
    };
    let reference = format!("#{id}");

    let mut groups: IndexMap<String, Vec<Placement>> = IndexMap::new();
    for node in doc.descendants().filter(|n| is_svg_element(*n, "use")) {
        let href = node.attribute((XLINK_NS, "href")).or_else(|| node.attribute("href"));
        if href != Some(reference.as_str()) {
            continue;
        }

        let style = node.attribute("style").unwrap_or_default();
        groups.entry(style_key.key(style)).or_default().push(Placement {
            template_id: template.id.clone(),
            x: node.attribute("x").unwrap_or("0").to_string(),
            y: node.attribute("y").unwrap_or("0").to_string(),
            style: style.to_string(),
        });
    }

    debug!(
        template = %template.id,
        groups = groups.len(),
        placements = groups.values().map(Vec::len).sum::<usize>(),
        "collected marker placements"
    );

    StyleGroups {
        template: Some(template),
        groups,
    }
}
