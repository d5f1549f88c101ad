//! Appending merged outlines to a clean plot.
//!
//! The clean document is streamed event by event, so everything except the
//! new `<path>` elements is passed through unchanged.

use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};

/// Path data for one merged style group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputPath {
    /// Style attribute copied from the placements. Omitted from the output
    /// element when empty.
    pub style: String,
    /// Drawing commands of the merged outline.
    pub d: String,
}

/// Insert one `<path>` per output path at the end of the first `svg` element.
///
/// The first `svg` element in document order is the root when the root is
/// `svg`, and otherwise the first nested one. A self-closing target is
/// expanded. An XML declaration is prepended when the document has none.
pub fn append_paths(clean: &str, paths: &[OutputPath]) -> Result<Vec<u8>> {
    let extra: usize = paths.iter().map(|p| p.d.len() + p.style.len() + 32).sum();
    let mut writer = Writer::new(Vec::with_capacity(clean.len() + extra));

    if !clean.trim_start_matches('\u{feff}').trim_start().starts_with("<?xml") {
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        writer.write_event(Event::Text(BytesText::new("\n")))?;
    }

    let mut reader = Reader::from_str(clean);
    let mut depth = 0usize;
    let mut target: Option<(usize, String)> = None;
    let mut appended = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                depth += 1;
                if !appended && target.is_none() && e.local_name().as_ref() == b"svg" {
                    target = Some((depth, path_element_name(&e)));
                }
                writer.write_event(Event::Start(e))?;
            }
            Event::Empty(e) if !appended && target.is_none() && e.local_name().as_ref() == b"svg" => {
                let element = path_element_name(&e);
                let end = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                writer.write_event(Event::Start(e))?;
                write_paths(&mut writer, &element, paths)?;
                writer.write_event(Event::End(BytesEnd::new(end)))?;
                appended = true;
            }
            Event::End(e) => {
                if let Some((target_depth, element)) = &target {
                    if *target_depth == depth {
                        write_paths(&mut writer, element, paths)?;
                        appended = true;
                        target = None;
                    }
                }
                depth = depth.saturating_sub(1);
                writer.write_event(Event::End(e))?;
            }
            Event::Eof => break,
            other => writer.write_event(other)?,
        }
    }

    if !appended {
        return Err(Error::NoSvgElement);
    }
    Ok(writer.into_inner())
}

/// Read the clean plot, append the paths and write the result to `output`.
///
/// An existing file at `output` is overwritten. Returns the number of bytes
/// written.
pub fn write_merged(clean: &Path, output: &Path, paths: &[OutputPath]) -> Result<u64> {
    let text = std::fs::read_to_string(clean)?;
    let bytes = append_paths(&text, paths)?;
    std::fs::write(output, &bytes)?;
    info!(output = %output.display(), paths = paths.len(), "saved merged SVG file");
    Ok(bytes.len() as u64)
}

/// `path`, carrying over the namespace prefix of the target `svg` element.
fn path_element_name(svg: &BytesStart<'_>) -> String {
    match svg.name().prefix() {
        Some(prefix) => format!("{}:path", String::from_utf8_lossy(prefix.as_ref())),
        None => "path".to_string(),
    }
}

fn write_paths(writer: &mut Writer<Vec<u8>>, element: &str, paths: &[OutputPath]) -> Result<()> {
    for path in paths {
        let mut start = BytesStart::new(element);
        start.push_attribute(("d", path.d.as_str()));
        if !path.style.is_empty() {
            start.push_attribute(("style", path.style.as_str()));
        }
        writer.write_event(Event::Empty(start))?;
        writer.write_event(Event::Text(BytesText::new("\n")))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svg::{SVG_NS, parse_document};

    fn output(style: &str, d: &str) -> OutputPath {
        OutputPath {
            style: style.to_string(),
            d: d.to_string(),
        }
    }

    fn svg_paths(bytes: &[u8]) -> Vec<(String, Option<String>)> {
        let text = std::str::from_utf8(bytes).unwrap();
        let doc = parse_document(text).unwrap();
        doc.descendants()
            .filter(|n| n.has_tag_name((SVG_NS, "path")))
            .map(|n| (n.attribute("d").unwrap().to_string(), n.attribute("style").map(str::to_string)))
            .collect()
    }

    #[test]
    fn test_appends_to_root_svg() {
        let clean = r#"<?xml version="1.0" encoding="utf-8"?>
<svg xmlns="http://www.w3.org/2000/svg"><g id="axes"><path d="M 0 0 L 1 1"/></g></svg>"#;
        let bytes = append_paths(clean, &[output("fill:red", "M 0,0 1,0 1,1 0,0 Z")]).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();

        assert!(text.ends_with("</g><path d=\"M 0,0 1,0 1,1 0,0 Z\" style=\"fill:red\"/>\n</svg>"));
        assert_eq!(svg_paths(&bytes).len(), 2);
    }

    #[test]
    fn test_appends_to_nested_svg() {
        let clean = r#"<html><body><svg xmlns="http://www.w3.org/2000/svg"><g/></svg><p/></body></html>"#;
        let bytes = append_paths(clean, &[output("", "M 0,0 Z")]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<html>"));
        assert!(text.contains("<g/><path d=\"M 0,0 Z\"/>\n</svg><p/>"));
    }

    #[test]
    fn test_expands_self_closing_svg() {
        let clean = r#"<svg xmlns="http://www.w3.org/2000/svg"/>"#;
        let bytes = append_paths(clean, &[output("fill:blue", "M 1,1 Z")]).unwrap();
        let paths = svg_paths(&bytes);
        assert_eq!(paths, vec![("M 1,1 Z".to_string(), Some("fill:blue".to_string()))]);
    }

    #[test]
    fn test_keeps_prefix() {
        let clean = r#"<svg:svg xmlns:svg="http://www.w3.org/2000/svg"></svg:svg>"#;
        let bytes = append_paths(clean, &[output("", "M 1,1 Z")]).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.contains("<svg:path d=\"M 1,1 Z\"/>"));
        assert_eq!(svg_paths(&bytes).len(), 1);
    }

    #[test]
    fn test_escapes_attribute_values() {
        let clean = r#"<svg xmlns="http://www.w3.org/2000/svg"></svg>"#;
        let bytes = append_paths(clean, &[output("font-family:\"A&B\"", "M 0,0 Z")]).unwrap();
        let paths = svg_paths(&bytes);
        assert_eq!(paths[0].1.as_deref(), Some("font-family:\"A&B\""));
    }

    #[test]
    fn test_missing_svg_element() {
        let err = append_paths("<html><body/></html>", &[output("", "M 0,0 Z")]).unwrap_err();
        assert!(matches!(err, Error::NoSvgElement));
    }

    #[test]
    fn test_write_merged_overwrites() {
        let dir = tempfile::TempDir::new().unwrap();
        let clean = dir.path().join("clear.svg");
        let out = dir.path().join("out.svg");
        std::fs::write(&clean, r#"<svg xmlns="http://www.w3.org/2000/svg"></svg>"#).unwrap();
        std::fs::write(&out, "stale contents").unwrap();

        let written = write_merged(&clean, &out, &[output("fill:red", "M 0,0 Z")]).unwrap();
        let text = std::fs::read_to_string(&out).unwrap();
        assert_eq!(written, text.len() as u64);
        assert!(!text.contains("stale"));
        assert!(text.contains("fill:red"));
    }
}
