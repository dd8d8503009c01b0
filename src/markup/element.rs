//! Owned XML element tree.
//!
//! This is the structured-element view of a part: an element keeps its
//! qualified name, its attributes in document order and its mixed content
//! (child elements, text, comments and processing instructions). Adjacent
//! text is always merged into a single [`XmlNode::Text`] node.

use crate::markup::writer;

/// XML declaration written in front of serialized part content.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// A single piece of element content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    /// A nested element
    Element(XmlElement),
    /// Character data (entity and character references already resolved)
    Text(String),
    /// Comment content, without the `<!--` `-->` delimiters
    Comment(String),
    /// Processing instruction content, without the `<?` `?>` delimiters
    ProcessingInstruction(String),
}

/// An XML element with its attributes and content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlNode>,
}

impl XmlElement {
    /// Create an empty element with the given qualified name (e.g. `x:row`).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder form of [`set_attribute`](Self::set_attribute).
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Set an attribute, replacing the value in place if it already exists.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Append a child element.
    pub fn push_element(&mut self, element: XmlElement) {
        self.children.push(XmlNode::Element(element));
    }

    /// Append character data, merging with a preceding text node.
    pub fn push_text(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if text.is_empty() {
            return;
        }
        match self.children.last_mut() {
            Some(XmlNode::Text(existing)) => existing.push_str(text),
            _ => self.children.push(XmlNode::Text(text.to_string())),
        }
    }

    /// Append a comment.
    pub fn push_comment(&mut self, comment: impl Into<String>) {
        self.children.push(XmlNode::Comment(comment.into()));
    }

    /// Append a processing instruction (`target data`).
    pub fn push_processing_instruction(&mut self, content: impl Into<String>) {
        self.children.push(XmlNode::ProcessingInstruction(content.into()));
    }

    /// Append any content node.
    pub fn push_node(&mut self, node: XmlNode) {
        match node {
            XmlNode::Text(text) => self.push_text(text),
            other => self.children.push(other),
        }
    }

    /// Qualified name as written in the markup.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Namespace prefix, if the name is qualified.
    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(prefix, _)| prefix)
    }

    /// Name without its namespace prefix.
    pub fn local_name(&self) -> &str {
        match self.name.split_once(':') {
            Some((_, local)) => local,
            None => &self.name,
        }
    }

    /// Attributes in document order.
    #[inline]
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Look up an attribute value by its qualified name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// All content nodes in document order.
    #[inline]
    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<XmlNode> {
        &mut self.children
    }

    /// Child elements together with their position in [`children`](Self::children).
    pub fn element_children(&self) -> impl Iterator<Item = (usize, &XmlElement)> {
        self.children
            .iter()
            .enumerate()
            .filter_map(|(pos, node)| match node {
                XmlNode::Element(e) => Some((pos, e)),
                _ => None,
            })
    }

    /// The child element stored at content position `pos`.
    pub fn child_at(&self, pos: usize) -> Option<&XmlElement> {
        match self.children.get(pos) {
            Some(XmlNode::Element(e)) => Some(e),
            _ => None,
        }
    }

    /// Whether the element has no content at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Namespace declarations made on this element, as `(prefix, uri)`.
    ///
    /// The default namespace is reported with a `None` prefix.
    pub fn namespace_declarations(&self) -> impl Iterator<Item = (Option<&str>, &str)> {
        self.attributes.iter().filter_map(|(k, v)| {
            if k == "xmlns" {
                Some((None, v.as_str()))
            } else {
                k.strip_prefix("xmlns:").map(|prefix| (Some(prefix), v.as_str()))
            }
        })
    }

    /// Compact serialization without any added whitespace.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        writer::write_compact(self, &mut out);
        out
    }

    /// Compact serialization preceded by [`XML_DECLARATION`].
    pub fn to_xml_document(&self) -> String {
        let mut out = String::from(XML_DECLARATION);
        writer::write_compact(self, &mut out);
        out
    }

    /// Indented serialization (2 spaces per level).
    ///
    /// The element is expected to be normalized; see
    /// [`normalize`](crate::markup::normalize).
    pub fn to_pretty_xml(&self) -> String {
        writer::pretty(self)
    }
}
