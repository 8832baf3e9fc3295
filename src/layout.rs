//! Layout – uses Taffy to position the boxes of a styled widget tree.
//!
//! This is also where element measurement lives: the rasterizer captures the
//! widget's content-box size once at construction by running a layout pass,
//! the same way a browser would report `clientWidth`/`clientHeight`. Text
//! nodes contribute no intrinsic size (there is no font engine here);
//! widgets are expected to size themselves via CSS.

use std::collections::HashMap;

use serde::Serialize;
use taffy::prelude::*;

use crate::dom::{ElementNode, Tag};
use crate::style::{self, build_styled_tree, ComputedStyle, StyledNode};

// ---------------------------------------------------------------------------
// Positioned boxes
// ---------------------------------------------------------------------------

/// A positioned box in surface coordinates (origin at the widget's top-left).
#[derive(Debug, Clone)]
pub struct PositionedBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub style: ComputedStyle,
    /// `src` attribute when the box is an `<img>` element.
    pub image_src: Option<String>,
    pub children: Vec<PositionedBox>,
}

impl PositionedBox {
    /// Serializable summary of the box tree, for debugging and the CLI's
    /// `--dump-layout` flag.
    pub fn dump(&self) -> BoxDump {
        BoxDump {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            background_color: if self.style.background_color.is_transparent() {
                None
            } else {
                let c = self.style.background_color;
                Some([c.r, c.g, c.b, c.a])
            },
            children: self.children.iter().map(|c| c.dump()).collect(),
        }
    }
}

/// JSON-friendly view of a [`PositionedBox`] tree.
#[derive(Debug, Clone, Serialize)]
pub struct BoxDump {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub background_color: Option<[f32; 4]>,
    pub children: Vec<BoxDump>,
}

// ---------------------------------------------------------------------------
// Build Taffy tree from styled nodes
// ---------------------------------------------------------------------------

struct LayoutBuilder {
    taffy: TaffyTree<()>,
    node_styles: HashMap<NodeId, ComputedStyle>,
    node_images: HashMap<NodeId, String>,
}

impl LayoutBuilder {
    fn new() -> Self {
        Self {
            taffy: TaffyTree::new(),
            node_styles: HashMap::new(),
            node_images: HashMap::new(),
        }
    }

    fn build_node(&mut self, styled: &StyledNode) -> Option<NodeId> {
        let StyledNode::Element {
            tag,
            style,
            attrs,
            children,
        } = styled
        else {
            // Text carries no intrinsic size without a font engine.
            return None;
        };

        let child_nodes: Vec<NodeId> =
            children.iter().filter_map(|c| self.build_node(c)).collect();

        let taffy_style = computed_to_taffy(style);
        let node = self
            .taffy
            .new_with_children(taffy_style, &child_nodes)
            .unwrap();
        self.node_styles.insert(node, style.clone());

        if *tag == Tag::Img {
            if let Some(src) = attrs.get("src") {
                self.node_images.insert(node, src.clone());
            }
        }

        Some(node)
    }

    /// Extract positioned boxes after layout computation.
    fn extract(&self, node: NodeId, offset_x: f32, offset_y: f32) -> PositionedBox {
        let layout = self.taffy.layout(node).unwrap();
        let style = self.node_styles.get(&node).cloned().unwrap_or_default();

        let x = offset_x + layout.location.x;
        let y = offset_y + layout.location.y;

        let children: Vec<PositionedBox> = self
            .taffy
            .children(node)
            .unwrap_or_default()
            .iter()
            .map(|&child| self.extract(child, x, y))
            .collect();

        PositionedBox {
            x,
            y,
            width: layout.size.width,
            height: layout.size.height,
            image_src: self.node_images.get(&node).cloned(),
            style,
            children,
        }
    }
}

fn computed_to_taffy(s: &ComputedStyle) -> Style {
    let mut ts = Style::default();

    match s.display {
        style::Display::Flex => {
            ts.display = taffy::Display::Flex;
            ts.flex_direction = match s.flex_direction {
                style::FlexDirection::Row => taffy::FlexDirection::Row,
                style::FlexDirection::Column => taffy::FlexDirection::Column,
            };
        }
        style::Display::Block => {
            // Block-level elements stack vertically: flex column.
            ts.display = taffy::Display::Flex;
            ts.flex_direction = taffy::FlexDirection::Column;
        }
        style::Display::Inline => {
            ts.display = taffy::Display::Flex;
            ts.flex_direction = taffy::FlexDirection::Row;
        }
        style::Display::None => {
            ts.display = taffy::Display::None;
        }
    }

    ts.size = Size {
        width: dim_to_taffy(s.width),
        height: dim_to_taffy(s.height),
    };

    ts.flex_grow = s.flex_grow;
    ts.flex_shrink = s.flex_shrink;

    ts.margin = Rect {
        top: LengthPercentageAuto::Length(s.margin_top),
        right: LengthPercentageAuto::Length(s.margin_right),
        bottom: LengthPercentageAuto::Length(s.margin_bottom),
        left: LengthPercentageAuto::Length(s.margin_left),
    };

    ts.padding = Rect {
        top: LengthPercentage::Length(s.padding_top),
        right: LengthPercentage::Length(s.padding_right),
        bottom: LengthPercentage::Length(s.padding_bottom),
        left: LengthPercentage::Length(s.padding_left),
    };

    ts.border = Rect {
        top: LengthPercentage::Length(s.border_width),
        right: LengthPercentage::Length(s.border_width),
        bottom: LengthPercentage::Length(s.border_width),
        left: LengthPercentage::Length(s.border_width),
    };

    ts.gap = Size {
        width: LengthPercentage::Length(s.gap),
        height: LengthPercentage::Length(s.gap),
    };

    ts
}

fn dim_to_taffy(d: style::Dimension) -> taffy::Dimension {
    match d {
        style::Dimension::Auto => taffy::Dimension::Auto,
        style::Dimension::Px(v) => taffy::Dimension::Length(v),
        style::Dimension::Percent(v) => taffy::Dimension::Percent(v / 100.0),
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the box tree for a styled node, constrained to the given width
/// when one is provided (otherwise max-content sizing).
pub fn layout_node(styled: &StyledNode, available_width: Option<f32>) -> Option<PositionedBox> {
    let mut builder = LayoutBuilder::new();
    let root = builder.build_node(styled)?;

    let width_space = match available_width {
        Some(w) => AvailableSpace::Definite(w),
        None => AvailableSpace::MaxContent,
    };
    builder
        .taffy
        .compute_layout(
            root,
            Size {
                width: width_space,
                height: AvailableSpace::MaxContent,
            },
        )
        .unwrap();

    Some(builder.extract(root, 0.0, 0.0))
}

/// Measure an element's rendered content box, rounding to whole pixels.
///
/// This is the `clientWidth`/`clientHeight` analog: the size is whatever a
/// layout pass assigns to the element's root box. Elements with no CSS
/// sizing anywhere in their subtree measure 0×0 (a degenerate job, which
/// the rasterizer deliberately accepts).
pub fn measure_element(element: &ElementNode) -> (u32, u32) {
    let styled = build_styled_tree(&[crate::dom::DomNode::Element(element.clone())]);
    let Some(root) = styled.first().and_then(|s| layout_node(s, None)) else {
        return (0, 0);
    };
    (root.width.round() as u32, root.height.round() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{first_element, parse_html};

    fn measure(html: &str) -> (u32, u32) {
        let nodes = parse_html(html);
        let elem = first_element(&nodes).expect("element");
        measure_element(elem)
    }

    #[test]
    fn explicit_px_size() {
        assert_eq!(measure(r#"<div style="width: 120px; height: 48px"></div>"#), (120, 48));
    }

    #[test]
    fn size_from_children_and_padding() {
        let (w, h) = measure(
            r#"<div style="padding: 10px">
                 <div style="width: 100px; height: 30px"></div>
               </div>"#,
        );
        assert_eq!((w, h), (120, 50));
    }

    #[test]
    fn unsized_element_is_degenerate() {
        assert_eq!(measure("<p>Hello world</p>"), (0, 0));
    }

    #[test]
    fn flex_row_positions_children_side_by_side() {
        let html = r#"<div style="display: flex; width: 100px; height: 20px">
            <div style="width: 40px; height: 20px"></div>
            <div style="width: 60px; height: 20px"></div>
        </div>"#;
        let nodes = parse_html(html);
        let styled = build_styled_tree(&nodes);
        let root = layout_node(&styled[0], None).expect("layout");
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].x, 0.0);
        assert_eq!(root.children[1].x, 40.0);
    }

    #[test]
    fn dump_serializes_to_json() {
        let html = r#"<div style="width: 10px; height: 10px; background: red"></div>"#;
        let nodes = parse_html(html);
        let styled = build_styled_tree(&nodes);
        let root = layout_node(&styled[0], None).expect("layout");
        let json = serde_json::to_string(&root.dump()).expect("json");
        assert!(json.contains("\"width\":10.0"));
        assert!(json.contains("background_color"));
    }
}
