//! Decode stage – renders an encoded wrapper data URI into a surface.
//!
//! Takes the `data:image/svg+xml;base64,...` URI produced from the job's
//! markup, parses the wrapper back, lays out the embedded widget at the
//! wrapper's width, and paints backgrounds, borders, and embedded images.
//! Malformed markup is reported as an error.

use crate::dom::DomNode;
use crate::error::MarkupError;
use crate::layout::{layout_node, PositionedBox};
use crate::markup;
use crate::style::build_styled_tree;
use crate::surface::Surface;

/// Decode a wrapper data URI and draw it onto the surface.
///
/// No clear is performed first: the draw composites over whatever the
/// surface already holds (the construction-time background fill, or a
/// previous draw).
pub fn decode_into(uri: &str, surface: &mut Surface) -> Result<(), MarkupError> {
    let wrapper_markup = markup::from_data_uri(uri)?;
    let wrapper = markup::parse_wrapper(&wrapper_markup)?;

    let styled = build_styled_tree(&[DomNode::Element(wrapper.content.clone())]);
    let Some(root) = styled
        .first()
        .and_then(|s| layout_node(s, Some(wrapper.width as f32)))
    else {
        return Ok(());
    };

    paint_box(surface, &root);
    Ok(())
}

fn paint_box(surface: &mut Surface, pbox: &PositionedBox) {
    let bg = pbox.style.background_color;
    if !bg.is_transparent() {
        surface.fill_rect(pbox.x, pbox.y, pbox.width, pbox.height, bg);
    }

    let bw = pbox.style.border_width;
    if bw > 0.0 && pbox.width > bw && pbox.height > bw {
        // Inset by half the line width so the stroke stays inside the box.
        surface.stroke_rect(
            pbox.x + bw / 2.0,
            pbox.y + bw / 2.0,
            pbox.width - bw,
            pbox.height - bw,
            bw,
            pbox.style.border_color,
        );
    }

    if let Some(src) = &pbox.image_src {
        match decode_image(src) {
            Ok((pixels, w, h)) => {
                surface.blit_rgba(&pixels, w, h, pbox.x, pbox.y, pbox.width, pbox.height);
            }
            Err(e) => log::warn!("skipping image: {e}"),
        }
    }

    for child in &pbox.children {
        paint_box(surface, child);
    }
}

/// Decode an embedded `<img>` source. Only base64 data URIs are supported;
/// anything else is skipped by the caller.
fn decode_image(src: &str) -> Result<(Vec<u8>, u32, u32), String> {
    let bytes = markup::data_uri_bytes(src).map_err(|e| e.to_string())?;
    let img = image::load_from_memory(&bytes).map_err(|e| format!("decode error: {e}"))?;
    let rgba = img.to_rgba8();
    let (w, h) = (rgba.width(), rgba.height());
    Ok((rgba.into_raw(), w, h))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{first_element, parse_html};
    use crate::style::Color;

    fn decode_widget(html: &str, width: u32, height: u32) -> Surface {
        let nodes = parse_html(html);
        let elem = first_element(&nodes).expect("element");
        let wrapper = markup::build_wrapper(elem, width, height);
        let uri = markup::to_data_uri(&wrapper);
        let mut surface = Surface::new(width, height);
        surface.fill(Color::WHITE);
        decode_into(&uri, &mut surface).expect("decode");
        surface
    }

    #[test]
    fn paints_root_background() {
        let s = decode_widget(
            r#"<div style="width: 8px; height: 8px; background: #0000ff"></div>"#,
            8,
            8,
        );
        assert_eq!(s.pixel(0, 0), Some([0, 0, 255, 255]));
        assert_eq!(s.pixel(7, 7), Some([0, 0, 255, 255]));
    }

    #[test]
    fn paints_nested_child_over_parent() {
        let s = decode_widget(
            r#"<div style="width: 8px; height: 8px; background: white">
                 <div style="width: 4px; height: 4px; background: #ff0000"></div>
               </div>"#,
            8,
            8,
        );
        assert_eq!(s.pixel(1, 1), Some([255, 0, 0, 255]));
        assert_eq!(s.pixel(6, 6), Some([255, 255, 255, 255]));
    }

    #[test]
    fn malformed_uri_is_an_error() {
        let mut surface = Surface::new(4, 4);
        let err = decode_into("data:image/svg+xml;base64,!!!", &mut surface);
        assert!(err.is_err());
    }

    #[test]
    fn transparent_widget_leaves_background() {
        let s = decode_widget(r#"<div style="width: 8px; height: 8px"></div>"#, 8, 8);
        assert_eq!(s.pixel(0, 0), Some([255, 255, 255, 255]));
    }
}
