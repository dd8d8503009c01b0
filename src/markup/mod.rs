//! Structured-element layer.
//!
//! Part markup is parsed into an owned [`XmlElement`] tree with quick-xml.
//! The tree is what the node model walks (ordered child elements, local
//! names, kind names, attribute lookup) and what the XML projection
//! serializes.
//!
//! # Example
//!
//! ```rust
//! use ooxml_tree::markup::{normalize, parse_fragment};
//!
//! let mut row = parse_fragment(r#"<row r="5">  <c r="B5"/>  </row>"#)?;
//! normalize(&mut row);
//! assert_eq!(row.to_pretty_xml(), "<row r=\"5\">\n  <c r=\"B5\"/>\n</row>");
//! # Ok::<(), ooxml_tree::markup::MarkupError>(())
//! ```

pub mod element;
pub mod error;
pub mod escape;
pub mod kind;
pub mod namespace;
pub mod parser;
pub mod writer;

pub use element::{XML_DECLARATION, XmlElement, XmlNode};
pub use error::MarkupError;
pub use escape::{escape_attribute, escape_text};
pub use kind::{UNKNOWN_ELEMENT_KIND, kind_name};
pub use namespace::NamespaceScope;
pub use parser::{MAX_DEPTH, parse_document, parse_fragment};
pub use writer::normalize;
