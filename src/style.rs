//! Style resolver – maps CSS inline styles and a small set of utility
//! classes to a flat [`ComputedStyle`] struct consumed by layout and the
//! decode stage's painter.
//!
//! Only box-model and background properties are resolved. Typography is out
//! of scope: the rasterizer paints boxes, not glyphs.

use crate::dom::{DomNode, ElementNode, Tag};
use std::collections::HashMap;

/// Fully resolved style for a single element.
#[derive(Debug, Clone)]
pub struct ComputedStyle {
    // Display / layout
    pub display: Display,
    pub flex_direction: FlexDirection,
    pub flex_grow: f32,
    pub flex_shrink: f32,
    pub gap: f32,

    // Sizing
    pub width: Dimension,
    pub height: Dimension,

    // Spacing (px)
    pub margin_top: f32,
    pub margin_right: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub padding_top: f32,
    pub padding_right: f32,
    pub padding_bottom: f32,
    pub padding_left: f32,

    // Border
    pub border_width: f32,
    pub border_color: Color,

    // Background
    pub background_color: Color,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            display: Display::Block,
            flex_direction: FlexDirection::Row,
            flex_grow: 0.0,
            flex_shrink: 1.0,
            gap: 0.0,
            width: Dimension::Auto,
            height: Dimension::Auto,
            margin_top: 0.0,
            margin_right: 0.0,
            margin_bottom: 0.0,
            margin_left: 0.0,
            padding_top: 0.0,
            padding_right: 0.0,
            padding_bottom: 0.0,
            padding_left: 0.0,
            border_width: 0.0,
            border_color: Color::BLACK,
            background_color: Color::TRANSPARENT,
        }
    }
}

// ---------------------------------------------------------------------------
// Supporting enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Display {
    Block,
    Flex,
    Inline,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlexDirection {
    Row,
    Column,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dimension {
    Auto,
    Px(f32),
    Percent(f32),
}

/// RGBA colour (0.0 – 1.0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };
    pub const TRANSPARENT: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    pub fn is_transparent(&self) -> bool {
        self.a < 0.001
    }

    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() == 6 {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()? as f32 / 255.0;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()? as f32 / 255.0;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()? as f32 / 255.0;
            Some(Self { r, g, b, a: 1.0 })
        } else if hex.len() == 3 {
            let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()? as f32 / 255.0;
            let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()? as f32 / 255.0;
            let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()? as f32 / 255.0;
            Some(Self { r, g, b, a: 1.0 })
        } else {
            None
        }
    }

    /// Parse `rgb(r, g, b)` / `rgba(r, g, b, a)` with 0–255 channels.
    pub fn from_rgb_func(s: &str) -> Option<Self> {
        let inner = s
            .trim()
            .strip_prefix("rgba")
            .or_else(|| s.trim().strip_prefix("rgb"))?
            .trim()
            .strip_prefix('(')?
            .strip_suffix(')')?;
        let parts: Vec<&str> = inner.split(',').map(|p| p.trim()).collect();
        if parts.len() != 3 && parts.len() != 4 {
            return None;
        }
        let r = parts[0].parse::<f32>().ok()? / 255.0;
        let g = parts[1].parse::<f32>().ok()? / 255.0;
        let b = parts[2].parse::<f32>().ok()? / 255.0;
        let a = if parts.len() == 4 {
            parts[3].parse::<f32>().ok()?
        } else {
            1.0
        };
        Some(Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
            a: a.clamp(0.0, 1.0),
        })
    }

    /// 8-bit RGBA channels.
    pub fn to_rgba8(&self) -> [u8; 4] {
        [
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
            (self.a * 255.0).round() as u8,
        ]
    }
}

/// Parse a CSS color value: `#rgb`, `#rrggbb`, `rgb()`/`rgba()`, or a named
/// color. Returns `None` for anything else.
pub fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if s.starts_with('#') {
        return Color::from_hex(s);
    }
    if s.starts_with("rgb") {
        return Color::from_rgb_func(s);
    }
    named_color(s)
}

fn named_color(name: &str) -> Option<Color> {
    let c = |r: u8, g: u8, b: u8| Color {
        r: r as f32 / 255.0,
        g: g as f32 / 255.0,
        b: b as f32 / 255.0,
        a: 1.0,
    };
    match name.to_ascii_lowercase().as_str() {
        "white" => Some(Color::WHITE),
        "black" => Some(Color::BLACK),
        "transparent" => Some(Color::TRANSPARENT),
        "red" => Some(c(255, 0, 0)),
        "green" => Some(c(0, 128, 0)),
        "blue" => Some(c(0, 0, 255)),
        "gray" | "grey" => Some(c(128, 128, 128)),
        "lightgray" | "lightgrey" => Some(c(211, 211, 211)),
        "silver" => Some(c(192, 192, 192)),
        "orange" => Some(c(255, 165, 0)),
        "yellow" => Some(c(255, 255, 0)),
        "purple" => Some(c(128, 0, 128)),
        "teal" => Some(c(0, 128, 128)),
        "navy" => Some(c(0, 0, 128)),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Styled tree
// ---------------------------------------------------------------------------

/// A DOM node annotated with its resolved style.
#[derive(Debug, Clone)]
pub enum StyledNode {
    Element {
        tag: Tag,
        style: ComputedStyle,
        attrs: HashMap<String, String>,
        children: Vec<StyledNode>,
    },
    Text {
        text: String,
    },
}

/// Resolve styles for a list of DOM nodes.
pub fn build_styled_tree(nodes: &[DomNode]) -> Vec<StyledNode> {
    nodes
        .iter()
        .filter_map(|node| match node {
            DomNode::Element(e) => Some(StyledNode::Element {
                tag: e.tag.clone(),
                style: resolve_style(e),
                attrs: e.attributes.clone(),
                children: build_styled_tree(&e.children),
            }),
            DomNode::Text(t) => {
                if t.trim().is_empty() {
                    None
                } else {
                    Some(StyledNode::Text { text: t.clone() })
                }
            }
        })
        .collect()
}

/// Resolve the style for a single element from its tag defaults, utility
/// classes, and inline `style` attribute (inline wins).
pub fn resolve_style(element: &ElementNode) -> ComputedStyle {
    let mut style = base_style_for_tag(&element.tag);

    for class in element.classes() {
        apply_class(&mut style, class);
    }

    if let Some(inline) = element.inline_style() {
        apply_inline_style(&mut style, inline);
    }

    style
}

fn base_style_for_tag(tag: &Tag) -> ComputedStyle {
    let mut s = ComputedStyle::default();
    if tag.is_inline() {
        s.display = Display::Inline;
    } else if *tag == Tag::Head {
        s.display = Display::None;
    }
    s
}

// ---------------------------------------------------------------------------
// Utility classes
// ---------------------------------------------------------------------------

fn apply_class(s: &mut ComputedStyle, class: &str) {
    match class {
        "flex" => {
            s.display = Display::Flex;
            s.flex_direction = FlexDirection::Row;
        }
        "flex-col" => {
            s.display = Display::Flex;
            s.flex_direction = FlexDirection::Column;
        }
        "flex-1" => {
            s.flex_grow = 1.0;
        }
        "w-full" => s.width = Dimension::Percent(100.0),
        "h-full" => s.height = Dimension::Percent(100.0),
        _ => {
            // Spacing scale: 1 unit = 4 px (p-4 → 16 px).
            if let Some(n) = class.strip_prefix("p-").and_then(|v| v.parse::<f32>().ok()) {
                let px = n * 4.0;
                s.padding_top = px;
                s.padding_right = px;
                s.padding_bottom = px;
                s.padding_left = px;
            } else if let Some(n) = class.strip_prefix("m-").and_then(|v| v.parse::<f32>().ok()) {
                let px = n * 4.0;
                s.margin_top = px;
                s.margin_right = px;
                s.margin_bottom = px;
                s.margin_left = px;
            } else if let Some(name) = class.strip_prefix("bg-") {
                if let Some(c) = parse_color(name) {
                    s.background_color = c;
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Inline styles
// ---------------------------------------------------------------------------

fn apply_inline_style(s: &mut ComputedStyle, inline: &str) {
    for decl in inline.split(';') {
        let Some((key, val)) = decl.split_once(':') else {
            continue;
        };
        let key = key.trim().to_ascii_lowercase();
        let val = val.trim();

        match key.as_str() {
            "display" => match val {
                "flex" => s.display = Display::Flex,
                "block" => s.display = Display::Block,
                "inline" => s.display = Display::Inline,
                "none" => s.display = Display::None,
                _ => {}
            },
            "flex-direction" => match val {
                "row" => s.flex_direction = FlexDirection::Row,
                "column" => s.flex_direction = FlexDirection::Column,
                _ => {}
            },
            "flex-grow" => {
                if let Ok(v) = val.parse::<f32>() {
                    s.flex_grow = v;
                }
            }
            "gap" => {
                if let Some(v) = parse_px(val) {
                    s.gap = v;
                }
            }
            "width" => {
                if let Some(d) = parse_dimension(val) {
                    s.width = d;
                }
            }
            "height" => {
                if let Some(d) = parse_dimension(val) {
                    s.height = d;
                }
            }
            "margin" => apply_shorthand(val, |t, r, b, l| {
                s.margin_top = t;
                s.margin_right = r;
                s.margin_bottom = b;
                s.margin_left = l;
            }),
            "margin-top" => {
                if let Some(v) = parse_px(val) {
                    s.margin_top = v;
                }
            }
            "margin-right" => {
                if let Some(v) = parse_px(val) {
                    s.margin_right = v;
                }
            }
            "margin-bottom" => {
                if let Some(v) = parse_px(val) {
                    s.margin_bottom = v;
                }
            }
            "margin-left" => {
                if let Some(v) = parse_px(val) {
                    s.margin_left = v;
                }
            }
            "padding" => apply_shorthand(val, |t, r, b, l| {
                s.padding_top = t;
                s.padding_right = r;
                s.padding_bottom = b;
                s.padding_left = l;
            }),
            "padding-top" => {
                if let Some(v) = parse_px(val) {
                    s.padding_top = v;
                }
            }
            "padding-right" => {
                if let Some(v) = parse_px(val) {
                    s.padding_right = v;
                }
            }
            "padding-bottom" => {
                if let Some(v) = parse_px(val) {
                    s.padding_bottom = v;
                }
            }
            "padding-left" => {
                if let Some(v) = parse_px(val) {
                    s.padding_left = v;
                }
            }
            "border" => {
                // "2px solid #333" – width first, color last.
                let parts: Vec<&str> = val.split_whitespace().collect();
                if let Some(w) = parts.first().and_then(|p| parse_px(p)) {
                    s.border_width = w;
                }
                if let Some(c) = parts.last().and_then(|p| parse_color(p)) {
                    s.border_color = c;
                }
            }
            "border-width" => {
                if let Some(v) = parse_px(val) {
                    s.border_width = v;
                }
            }
            "border-color" => {
                if let Some(c) = parse_color(val) {
                    s.border_color = c;
                }
            }
            "background-color" | "background" => {
                if let Some(c) = parse_color(val) {
                    s.background_color = c;
                }
            }
            _ => {}
        }
    }
}

fn apply_shorthand(val: &str, mut set: impl FnMut(f32, f32, f32, f32)) {
    let parts: Vec<f32> = val.split_whitespace().filter_map(parse_px).collect();
    match parts.as_slice() {
        [all] => set(*all, *all, *all, *all),
        [v, h] => set(*v, *h, *v, *h),
        [t, h, b] => set(*t, *h, *b, *h),
        [t, r, b, l] => set(*t, *r, *b, *l),
        _ => {}
    }
}

fn parse_px(s: &str) -> Option<f32> {
    let s = s.trim();
    let num = s.strip_suffix("px").unwrap_or(s);
    num.trim().parse::<f32>().ok()
}

fn parse_dimension(s: &str) -> Option<Dimension> {
    let s = s.trim();
    if s == "auto" {
        return Some(Dimension::Auto);
    }
    if let Some(p) = s.strip_suffix('%') {
        return p.trim().parse::<f32>().ok().map(Dimension::Percent);
    }
    parse_px(s).map(Dimension::Px)
}
