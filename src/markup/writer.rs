//! Serialization of element trees.
//!
//! Two layouts are produced: a compact one that adds no whitespace at all,
//! and an indented one (2 spaces per level) for normalized trees. Indented
//! output only ever inserts whitespace where [`normalize`] removes it, so
//! normalizing and re-indenting indented output gives the same text back.

use crate::markup::element::{XmlElement, XmlNode};
use crate::markup::escape::{escape_attribute, escape_text};

const INDENT: &str = "  ";

/// Strip structural whitespace from `element` and its descendants.
///
/// Whitespace-only text is structural when it sits in an element whose other
/// content is only elements, comments or processing instructions, and no
/// `xml:space="preserve"` is in effect. Text inside elements that carry real
/// character data is left untouched.
pub fn normalize(element: &mut XmlElement) {
    normalize_in(element, false);
}

fn normalize_in(element: &mut XmlElement, inherited_preserve: bool) {
    let preserve = preserves_space(element, inherited_preserve);

    if !preserve && !has_significant_text(element) && has_markup_children(element) {
        element
            .children_mut()
            .retain(|node| !matches!(node, XmlNode::Text(_)));
    }

    for child in element.children_mut() {
        if let XmlNode::Element(e) = child {
            normalize_in(e, preserve);
        }
    }
}

fn preserves_space(element: &XmlElement, inherited: bool) -> bool {
    match element.attribute("xml:space") {
        Some("preserve") => true,
        Some("default") => false,
        _ => inherited,
    }
}

fn has_significant_text(element: &XmlElement) -> bool {
    element
        .children()
        .iter()
        .any(|node| matches!(node, XmlNode::Text(t) if !t.trim().is_empty()))
}

fn has_markup_children(element: &XmlElement) -> bool {
    element
        .children()
        .iter()
        .any(|node| !matches!(node, XmlNode::Text(_)))
}

pub(crate) fn write_compact(element: &XmlElement, out: &mut String) {
    write_start(element, out);
    if element.is_empty() {
        out.push_str("/>");
        return;
    }
    out.push('>');
    for child in element.children() {
        write_node_compact(child, out);
    }
    write_end(element, out);
}

fn write_node_compact(node: &XmlNode, out: &mut String) {
    match node {
        XmlNode::Element(e) => write_compact(e, out),
        XmlNode::Text(t) => out.push_str(&escape_text(t)),
        XmlNode::Comment(c) => {
            out.push_str("<!--");
            out.push_str(c);
            out.push_str("-->");
        },
        XmlNode::ProcessingInstruction(pi) => {
            out.push_str("<?");
            out.push_str(pi);
            out.push_str("?>");
        },
    }
}

pub(crate) fn pretty(element: &XmlElement) -> String {
    let mut out = String::new();
    write_pretty(element, 0, false, &mut out);
    out
}

fn write_pretty(element: &XmlElement, depth: usize, inherited_preserve: bool, out: &mut String) {
    let preserve = preserves_space(element, inherited_preserve);

    // Character data or preserved whitespace forbids touching the layout
    let inline = preserve
        || element
            .children()
            .iter()
            .any(|node| matches!(node, XmlNode::Text(_)));

    if inline || element.is_empty() {
        write_compact(element, out);
        return;
    }

    write_start(element, out);
    out.push('>');
    for child in element.children() {
        out.push('\n');
        push_indent(depth + 1, out);
        match child {
            XmlNode::Element(e) => write_pretty(e, depth + 1, preserve, out),
            other => write_node_compact(other, out),
        }
    }
    out.push('\n');
    push_indent(depth, out);
    write_end(element, out);
}

fn write_start(element: &XmlElement, out: &mut String) {
    out.push('<');
    out.push_str(element.name());
    for (name, value) in element.attributes() {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape_attribute(value));
        out.push('"');
    }
}

fn write_end(element: &XmlElement, out: &mut String) {
    out.push_str("</");
    out.push_str(element.name());
    out.push('>');
}

#[inline]
fn push_indent(depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}
