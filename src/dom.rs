//! HTML parser and serializer – converts a widget's markup into a DOM tree
//! and back.
//!
//! We support a controlled subset of elements:
//! - Structural: div, p, h1-h3, img
//! - Inline: span
//! - Wrapper: svg, foreignObject (produced by the markup module)
//! - Styling via `class` and `style` attributes

use std::collections::HashMap;

// ---------------------------------------------------------------------------
// DOM types
// ---------------------------------------------------------------------------

/// The tag name of a supported element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
    Div,
    P,
    H1,
    H2,
    H3,
    Span,
    Img,
    Svg,
    ForeignObject,
    Body,
    Html,
    Head,
    /// Catch-all for unknown tags – they are kept but treated as divs.
    Unknown(String),
}

impl Tag {
    pub fn from_str(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "div" => Tag::Div,
            "p" => Tag::P,
            "h1" => Tag::H1,
            "h2" => Tag::H2,
            "h3" => Tag::H3,
            "span" => Tag::Span,
            "img" => Tag::Img,
            "svg" => Tag::Svg,
            "foreignobject" => Tag::ForeignObject,
            "body" => Tag::Body,
            "html" => Tag::Html,
            "head" => Tag::Head,
            _ => Tag::Unknown(s.to_string()),
        }
    }

    /// Canonical name used when serializing.
    pub fn name(&self) -> &str {
        match self {
            Tag::Div => "div",
            Tag::P => "p",
            Tag::H1 => "h1",
            Tag::H2 => "h2",
            Tag::H3 => "h3",
            Tag::Span => "span",
            Tag::Img => "img",
            Tag::Svg => "svg",
            Tag::ForeignObject => "foreignObject",
            Tag::Body => "body",
            Tag::Html => "html",
            Tag::Head => "head",
            Tag::Unknown(s) => s.as_str(),
        }
    }

    pub fn is_inline(&self) -> bool {
        matches!(self, Tag::Span)
    }

    /// Void elements have no children and serialize self-closed.
    pub fn is_void(&self) -> bool {
        matches!(self, Tag::Img)
    }
}

/// A node in our DOM tree.
#[derive(Debug, Clone)]
pub enum DomNode {
    Element(ElementNode),
    Text(String),
}

/// An element node carrying tag, attributes, and children.
#[derive(Debug, Clone)]
pub struct ElementNode {
    pub tag: Tag,
    pub attributes: HashMap<String, String>,
    pub children: Vec<DomNode>,
}

impl ElementNode {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            attributes: HashMap::new(),
            children: Vec::new(),
        }
    }

    pub fn classes(&self) -> Vec<&str> {
        self.attributes
            .get("class")
            .map(|c| c.split_whitespace().collect())
            .unwrap_or_default()
    }

    pub fn inline_style(&self) -> Option<&str> {
        self.attributes.get("style").map(|s| s.as_str())
    }

    pub fn src(&self) -> Option<&str> {
        self.attributes.get("src").map(|s| s.as_str())
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    /// Serialize this element and its subtree back to markup (the
    /// `outerHTML` analog). Attributes are emitted in sorted order so the
    /// output is deterministic.
    pub fn outer_html(&self) -> String {
        let mut out = String::new();
        self.write_element(&mut out, &[]);
        out
    }

    /// Like [`outer_html`](Self::outer_html) but with extra attributes
    /// injected on the root open tag only. Used by the markup wrapper to
    /// declare the XHTML namespace without touching the caller's tree.
    pub fn outer_html_with_attrs(&self, extra: &[(&str, &str)]) -> String {
        let mut out = String::new();
        self.write_element(&mut out, extra);
        out
    }

    fn write_element(&self, out: &mut String, extra: &[(&str, &str)]) {
        out.push('<');
        out.push_str(self.tag.name());

        let mut keys: Vec<&String> = self.attributes.keys().collect();
        keys.sort();
        for key in keys {
            // Extra attributes win over existing ones of the same name.
            if extra.iter().any(|(k, _)| k == key) {
                continue;
            }
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape_attr(&self.attributes[key]));
            out.push('"');
        }
        for (key, value) in extra {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape_attr(value));
            out.push('"');
        }

        if self.tag.is_void() {
            out.push_str("/>");
            return;
        }
        out.push('>');

        for child in &self.children {
            match child {
                DomNode::Element(e) => e.write_element(out, &[]),
                DomNode::Text(t) => out.push_str(&escape_text(t)),
            }
        }

        out.push_str("</");
        out.push_str(self.tag.name());
        out.push('>');
    }
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// ---------------------------------------------------------------------------
// Parser – simple recursive descent over HTML
// ---------------------------------------------------------------------------

/// Parse an HTML string into a list of DOM nodes.
///
/// We use a hand-written parser that handles the controlled subset. This keeps
/// dependencies minimal and avoids the complexity of a full HTML5 parser for
/// our constrained widget inputs.
pub fn parse_html(html: &str) -> Vec<DomNode> {
    let mut parser = Parser::new(html);
    parser.parse_nodes()
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn parse_nodes(&mut self) -> Vec<DomNode> {
        let mut nodes = Vec::new();
        loop {
            self.skip_whitespace_preserve();
            if self.eof() || self.starts_with("</") {
                break;
            }
            if let Some(node) = self.parse_node() {
                nodes.push(node);
            }
        }
        nodes
    }

    fn parse_node(&mut self) -> Option<DomNode> {
        if self.starts_with("<!--") {
            self.skip_comment();
            return None;
        }
        if self.starts_with("<!") || self.starts_with("<?") {
            // Skip doctype / processing instructions
            while !self.eof() && !self.starts_with(">") {
                self.advance(1);
            }
            if !self.eof() {
                self.advance(1); // skip '>'
            }
            return None;
        }
        if self.starts_with("<") {
            Some(self.parse_element())
        } else {
            Some(self.parse_text())
        }
    }

    fn parse_text(&mut self) -> DomNode {
        let start = self.pos;
        while !self.eof() && !self.starts_with("<") {
            self.advance(1);
        }
        let text = &self.input[start..self.pos];
        DomNode::Text(decode_entities(text))
    }

    fn parse_element(&mut self) -> DomNode {
        // Consume '<'
        self.advance(1);
        let tag_name = self.parse_tag_name();
        let tag = Tag::from_str(&tag_name);
        let mut elem = ElementNode::new(tag.clone());

        // Parse attributes
        loop {
            self.skip_whitespace();
            if self.eof() || self.starts_with(">") || self.starts_with("/>") {
                break;
            }
            let (key, value) = self.parse_attribute();
            elem.attributes.insert(key, value);
        }

        if self.starts_with("/>") {
            self.advance(2);
            return DomNode::Element(elem);
        }
        if self.starts_with(">") {
            self.advance(1);
        }
        if tag.is_void() {
            return DomNode::Element(elem);
        }

        // Parse children
        elem.children = self.parse_nodes();

        // Consume closing tag
        if self.starts_with("</") {
            self.advance(2);
            self.parse_tag_name(); // skip tag name
            self.skip_whitespace();
            if self.starts_with(">") {
                self.advance(1);
            }
        }

        DomNode::Element(elem)
    }

    fn parse_tag_name(&mut self) -> String {
        let start = self.pos;
        while !self.eof() {
            let c = self.current_char();
            if c.is_alphanumeric() || c == '-' || c == '_' {
                self.advance(1);
            } else {
                break;
            }
        }
        self.input[start..self.pos].to_string()
    }

    fn parse_attribute(&mut self) -> (String, String) {
        let key = self.parse_tag_name();
        self.skip_whitespace();
        if !self.starts_with("=") {
            return (key, String::new());
        }
        self.advance(1); // skip '='
        self.skip_whitespace();
        let value = self.parse_attr_value();
        (key, value)
    }

    fn parse_attr_value(&mut self) -> String {
        if self.starts_with("\"") {
            self.advance(1);
            let start = self.pos;
            while !self.eof() && !self.starts_with("\"") {
                self.advance(1);
            }
            let val = self.input[start..self.pos].to_string();
            if !self.eof() {
                self.advance(1);
            }
            decode_entities(&val)
        } else if self.starts_with("'") {
            self.advance(1);
            let start = self.pos;
            while !self.eof() && !self.starts_with("'") {
                self.advance(1);
            }
            let val = self.input[start..self.pos].to_string();
            if !self.eof() {
                self.advance(1);
            }
            decode_entities(&val)
        } else {
            let start = self.pos;
            while !self.eof() {
                let c = self.current_char();
                if c.is_whitespace() || c == '>' || c == '/' {
                    break;
                }
                self.advance(1);
            }
            self.input[start..self.pos].to_string()
        }
    }

    fn skip_whitespace(&mut self) {
        while !self.eof() && self.current_char().is_whitespace() {
            self.advance(1);
        }
    }

    fn skip_whitespace_preserve(&mut self) {
        // Skip runs of pure whitespace between elements.
        let saved = self.pos;
        while !self.eof() && self.current_char().is_whitespace() {
            self.advance(1);
        }
        // If we reached a tag or EOF, keep the skip. Otherwise revert.
        if !self.eof() && !self.starts_with("<") {
            self.pos = saved;
        }
    }

    fn skip_comment(&mut self) {
        self.advance(4); // skip <!--
        while !self.eof() && !self.starts_with("-->") {
            self.advance(1);
        }
        if !self.eof() {
            self.advance(3);
        }
    }

    fn starts_with(&self, s: &str) -> bool {
        self.input[self.pos..].starts_with(s)
    }

    fn eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn current_char(&self) -> char {
        self.input[self.pos..].chars().next().unwrap()
    }

    fn advance(&mut self, n: usize) {
        // Advance by `n` characters (not bytes).
        for _ in 0..n {
            if let Some(c) = self.input[self.pos..].chars().next() {
                self.pos += c.len_utf8();
            }
        }
    }
}

fn decode_entities(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&nbsp;", "\u{00A0}")
}

// ---------------------------------------------------------------------------
// Convenience helpers
// ---------------------------------------------------------------------------

/// Return the first element node in a parsed node list, descending through
/// `<html>`/`<body>` wrappers if the input was a full document.
pub fn first_element(nodes: &[DomNode]) -> Option<&ElementNode> {
    for node in nodes {
        if let DomNode::Element(e) = node {
            match e.tag {
                Tag::Html | Tag::Body => {
                    if let Some(inner) = first_element(&e.children) {
                        return Some(inner);
                    }
                }
                Tag::Head => continue,
                _ => return Some(e),
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_div() {
        let html = r#"<div class="card" style="width: 80px"><p>Hello</p></div>"#;
        let nodes = parse_html(html);
        assert_eq!(nodes.len(), 1);
        if let DomNode::Element(e) = &nodes[0] {
            assert_eq!(e.tag, Tag::Div);
            assert_eq!(e.classes(), vec!["card"]);
            assert_eq!(e.children.len(), 1);
        } else {
            panic!("Expected element");
        }
    }

    #[test]
    fn parse_self_closing_img() {
        let html = r#"<img src="logo.png" />"#;
        let nodes = parse_html(html);
        assert_eq!(nodes.len(), 1);
        if let DomNode::Element(e) = &nodes[0] {
            assert_eq!(e.tag, Tag::Img);
            assert_eq!(e.src(), Some("logo.png"));
        } else {
            panic!("Expected img element");
        }
    }

    #[test]
    fn parse_foreign_object_wrapper() {
        let html = r#"<svg width="10" height="20"><foreignObject width="100%" height="100%"><div></div></foreignObject></svg>"#;
        let nodes = parse_html(html);
        assert_eq!(nodes.len(), 1);
        if let DomNode::Element(svg) = &nodes[0] {
            assert_eq!(svg.tag, Tag::Svg);
            assert_eq!(svg.attr("width"), Some("10"));
            assert_eq!(svg.children.len(), 1);
            if let DomNode::Element(fo) = &svg.children[0] {
                assert_eq!(fo.tag, Tag::ForeignObject);
            } else {
                panic!("Expected foreignObject");
            }
        } else {
            panic!("Expected svg element");
        }
    }

    #[test]
    fn outer_html_round_trips() {
        let html = r#"<div style="width: 40px; height: 20px"><span>a &amp; b</span></div>"#;
        let nodes = parse_html(html);
        let elem = first_element(&nodes).expect("element");
        let serialized = elem.outer_html();
        let reparsed = parse_html(&serialized);
        let elem2 = first_element(&reparsed).expect("element");
        assert_eq!(elem2.tag, Tag::Div);
        assert_eq!(elem2.inline_style(), Some("width: 40px; height: 20px"));
        if let DomNode::Element(span) = &elem2.children[0] {
            if let DomNode::Text(t) = &span.children[0] {
                assert_eq!(t, "a & b");
            } else {
                panic!("Expected text");
            }
        } else {
            panic!("Expected span");
        }
    }

    #[test]
    fn outer_html_injects_extra_attrs_on_root_only() {
        let html = r#"<div><div>inner</div></div>"#;
        let nodes = parse_html(html);
        let elem = first_element(&nodes).expect("element");
        let out = elem.outer_html_with_attrs(&[("xmlns", "http://www.w3.org/1999/xhtml")]);
        assert_eq!(out.matches("xmlns=").count(), 1);
        assert!(out.starts_with("<div xmlns=\"http://www.w3.org/1999/xhtml\">"));
    }

    #[test]
    fn first_element_descends_through_body() {
        let html = "<html><head></head><body><div id=\"w\"></div></body></html>";
        let nodes = parse_html(html);
        let elem = first_element(&nodes).expect("element");
        assert_eq!(elem.tag, Tag::Div);
        assert_eq!(elem.attr("id"), Some("w"));
    }
}
