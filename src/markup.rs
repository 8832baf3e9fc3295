//! Markup wrapper – builds the SVG document that embeds a serialized widget
//! in a single `foreignObject`, and encodes/decodes it as a data URI.
//!
//! The XHTML namespace is declared on the serialized copy inside the
//! wrapper, never set on the caller's element, so constructing a job leaves
//! the input tree untouched.

use base64::{engine::general_purpose::STANDARD as BASE64_STD, Engine as _};

use crate::dom::{first_element, parse_html, DomNode, ElementNode, Tag};
use crate::error::MarkupError;

/// Namespace declared on the embedded widget so nested markup renders as
/// XHTML inside the SVG context.
pub const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";

/// Namespace of the wrapper document itself.
pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

const DATA_URI_PREFIX: &str = "data:image/svg+xml;base64,";

/// Build the wrapper document for an element at the given pixel dimensions.
///
/// The result always contains exactly one `foreignObject` holding the
/// element's serialized markup with the XHTML namespace injected on its
/// root tag.
pub fn build_wrapper(element: &ElementNode, width: u32, height: u32) -> String {
    let inner = element.outer_html_with_attrs(&[("xmlns", XHTML_NS)]);
    format!(
        "<svg xmlns=\"{SVG_NS}\" width=\"{width}\" height=\"{height}\">\
         <foreignObject width=\"100%\" height=\"100%\">{inner}</foreignObject></svg>"
    )
}

/// Encode wrapper markup as a base64 `image/svg+xml` data URI.
pub fn to_data_uri(markup: &str) -> String {
    format!("{DATA_URI_PREFIX}{}", BASE64_STD.encode(markup))
}

/// Decode a `data:<mime>;base64,<data>` URI and return the raw bytes.
pub fn data_uri_bytes(uri: &str) -> Result<Vec<u8>, MarkupError> {
    let Some(rest) = uri.strip_prefix("data:") else {
        let preview: String = uri.chars().take(80).collect();
        return Err(MarkupError::NotADataUri(preview));
    };
    let comma = rest
        .find(',')
        .ok_or_else(|| MarkupError::NotADataUri(uri.chars().take(80).collect()))?;
    let header = &rest[..comma];
    if !header.contains(";base64") {
        return Err(MarkupError::NotBase64);
    }
    Ok(BASE64_STD.decode(rest[comma + 1..].trim())?)
}

/// Decode a data URI carrying UTF-8 markup back into a string.
pub fn from_data_uri(uri: &str) -> Result<String, MarkupError> {
    Ok(String::from_utf8(data_uri_bytes(uri)?)?)
}

/// Parsed form of a wrapper document.
#[derive(Debug, Clone)]
pub struct Wrapper {
    pub width: u32,
    pub height: u32,
    /// The embedded widget element.
    pub content: ElementNode,
}

/// Parse wrapper markup back into its dimensions and embedded element.
///
/// Enforces the wrapper invariant: an `<svg>` root with numeric width and
/// height, containing exactly one `foreignObject` with element content.
pub fn parse_wrapper(markup: &str) -> Result<Wrapper, MarkupError> {
    let nodes = parse_html(markup);
    let svg = first_element(&nodes)
        .filter(|e| e.tag == Tag::Svg)
        .ok_or(MarkupError::MissingSvgRoot)?;

    let width = parse_dim_attr(svg, "width")?;
    let height = parse_dim_attr(svg, "height")?;

    let mut foreign_objects = Vec::new();
    collect_foreign_objects(svg, &mut foreign_objects);
    if foreign_objects.len() != 1 {
        return Err(MarkupError::ForeignObjectCount(foreign_objects.len()));
    }

    let content = first_element(&foreign_objects[0].children)
        .cloned()
        .ok_or(MarkupError::EmptyForeignObject)?;

    Ok(Wrapper {
        width,
        height,
        content,
    })
}

fn parse_dim_attr(svg: &ElementNode, attr: &'static str) -> Result<u32, MarkupError> {
    let value = svg.attr(attr).unwrap_or("");
    value.parse::<u32>().map_err(|_| MarkupError::BadDimension {
        attr,
        value: value.to_string(),
    })
}

fn collect_foreign_objects<'a>(element: &'a ElementNode, out: &mut Vec<&'a ElementNode>) {
    for child in &element.children {
        if let DomNode::Element(e) = child {
            if e.tag == Tag::ForeignObject {
                out.push(e);
            }
            collect_foreign_objects(e, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> ElementNode {
        let nodes = parse_html(r#"<div style="width: 40px; height: 20px; background: red"></div>"#);
        first_element(&nodes).expect("element").clone()
    }

    #[test]
    fn wrapper_has_one_foreign_object_and_namespace() {
        let markup = build_wrapper(&widget(), 40, 20);
        assert_eq!(markup.matches("<foreignObject").count(), 1);
        assert!(markup.contains(XHTML_NS));
        assert!(markup.contains(SVG_NS));
    }

    #[test]
    fn wrapper_round_trip_preserves_dimensions() {
        let markup = build_wrapper(&widget(), 40, 20);
        let wrapper = parse_wrapper(&markup).expect("parse");
        assert_eq!(wrapper.width, 40);
        assert_eq!(wrapper.height, 20);
        assert_eq!(wrapper.content.tag, Tag::Div);
    }

    #[test]
    fn data_uri_round_trip() {
        let markup = build_wrapper(&widget(), 40, 20);
        let uri = to_data_uri(&markup);
        assert!(uri.starts_with("data:image/svg+xml;base64,"));
        assert_eq!(from_data_uri(&uri).expect("decode"), markup);
    }

    #[test]
    fn rejects_non_data_uri() {
        assert!(matches!(
            from_data_uri("https://example.com/x.svg"),
            Err(MarkupError::NotADataUri(_))
        ));
    }

    #[test]
    fn rejects_wrapper_without_foreign_object() {
        let err = parse_wrapper(r#"<svg width="10" height="10"></svg>"#).unwrap_err();
        assert!(matches!(err, MarkupError::ForeignObjectCount(0)));
    }

    #[test]
    fn rejects_bad_dimension() {
        let err =
            parse_wrapper(r#"<svg width="ten" height="10"><foreignObject><div></div></foreignObject></svg>"#)
                .unwrap_err();
        assert!(matches!(err, MarkupError::BadDimension { attr: "width", .. }));
    }
}
