//! ooxml-tree - Navigable trees over Office Open XML packages
//!
//! Opens a `.docx`, `.xlsx` or `.pptx` package and presents it as a tree of
//! labelled nodes: the container, each part reached through the package
//! relationships, and each element of every part's markup. Any node can be
//! projected on demand into normalized, indented XML or into source code
//! that rebuilds the same object.
//!
//! # Features
//!
//! - **Document kinds**: wordprocessing, spreadsheet and presentation packages
//! - **Part tree**: parts follow relationship order, cycles end in a leaf
//! - **Annotations**: pluggable per-kind extractors (`Row` index, `Cell` reference)
//! - **XML projection**: idempotent 2-space pretty printing
//! - **Code projection**: Rust and Python emitters behind the [`CodeEmitter`] trait
//!
//! # Example
//!
//! ```no_run
//! use ooxml_tree::{Language, Session};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = Session::new();
//! let root = session.open_path("report.xlsx")?.clone();
//!
//! for (depth, node) in root.walk() {
//!     println!("{}{}", "  ".repeat(depth), node.header());
//! }
//!
//! if let Some(row) = root.find("<0> row (Row) [1]") {
//!     println!("{}", session.project_xml(row)?);
//!     println!("{}", session.project_code_in(row, Language::Rust)?);
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod markup;
pub mod opc;
pub mod options;
pub mod projection;
pub mod session;
pub mod tree;

#[cfg(test)]
mod test_support;

pub use error::{Error, Result};
pub use markup::{MarkupError, XmlElement, XmlNode};
pub use opc::{ElementRef, OpcError, OpcPackage, PartId};
pub use options::InspectOptions;
pub use projection::emit::{CodeEmitter, EmitError, EmitTarget, Language, PythonEmitter, RustEmitter};
pub use projection::{normalized_xml, project_code, project_xml};
pub use session::{DocumentHandle, DocumentKind, Session, detect_kind};
pub use tree::{Annotation, AnnotationPolicy, Node, NodeKind, TreeBuilder};
