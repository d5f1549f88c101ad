//! Error types for marker-merge operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for marker-merge operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while compressing plots or analysing timings.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// No circle marker could be located in the plot.
    #[error("Marker not found: {detail}")]
    MarkerNotFound {
        /// What was searched for and why it did not match.
        detail: String,
    },

    /// The marker radius is missing, non-numeric or not positive.
    #[error("Invalid radius: {0}")]
    InvalidRadius(String),

    /// A placement's coordinates could not be parsed as numbers.
    #[error("Placement coordinates are not numeric: x={x:?}, y={y:?}")]
    PlacementParse {
        /// Raw `x` attribute value.
        x: String,
        /// Raw `y` attribute value.
        y: String,
    },

    /// The clean document has no `svg` element to append paths to.
    #[error("No svg element found in document")]
    NoSvgElement,

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Error while discovering or processing a batch of plots.
    #[error("Batch error: {0}")]
    Batch(String),

    /// A timing table could not be parsed.
    #[error("Timing table error in {path} at line {line}: {reason}")]
    Timing {
        /// Path of the timing table.
        path: PathBuf,
        /// Line number where the error occurred.
        line: usize,
        /// Reason for the failure.
        reason: String,
    },

    /// Curve fitting failed.
    #[error("Fit error: {0}")]
    Fit(String),

    /// I/O error wrapper.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Plot document is not well-formed XML.
    #[error("XML parse error: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// Error while streaming the output document.
    #[error("XML write error: {0}")]
    XmlWrite(#[from] quick_xml::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    pub(crate) fn marker_not_found(detail: impl Into<String>) -> Self {
        Self::MarkerNotFound {
            detail: detail.into(),
        }
    }
}
