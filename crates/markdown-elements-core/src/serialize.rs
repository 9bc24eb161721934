//! Display tree serialization
//!
//! Combines rendered [`DisplayNode`]s into an HTML string.

use crate::display::{DisplayElement, DisplayNode};

/// Tags written without a closing tag
const VOID_TAGS: &[&str] = &["br", "hr", "img", "input"];

/// Serialize a sequence of display nodes to HTML
pub fn to_html(nodes: &[DisplayNode]) -> String {
    let mut output = String::with_capacity(1024);
    serialize_nodes(nodes, &mut output);
    output
}

fn serialize_nodes(nodes: &[DisplayNode], out: &mut String) {
    for node in nodes {
        serialize_node(node, out);
    }
}

fn serialize_node(node: &DisplayNode, out: &mut String) {
    match node {
        DisplayNode::Element(element) => serialize_element(element, out),
        DisplayNode::Text(text) => escape_into(text, false, out),
        DisplayNode::Fragment { children, .. } => serialize_nodes(children, out),
    }
}

fn serialize_element(element: &DisplayElement, out: &mut String) {
    out.push('<');
    out.push_str(&element.tag);
    for (name, value) in &element.attrs {
        out.push(' ');
        out.push_str(name);
        if !value.is_empty() {
            out.push_str("=\"");
            escape_into(value, true, out);
            out.push('"');
        }
    }
    out.push('>');

    if is_void(&element.tag) {
        return;
    }

    serialize_nodes(&element.children, out);
    out.push_str("</");
    out.push_str(&element.tag);
    out.push('>');
}

fn is_void(tag: &str) -> bool {
    VOID_TAGS.contains(&tag)
}

/// Escape HTML special characters
pub fn escape_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    escape_into(text, true, &mut result);
    result
}

fn escape_into(text: &str, quotes: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if quotes => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}
