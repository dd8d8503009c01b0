//! Open Packaging Conventions (OPC) container adapter.
//!
//! A read-only view of a ZIP-based Office Open XML package: the
//! `[Content_Types].xml` map, relationship files in their original order,
//! and every part reachable from the package relationships. XML parts carry
//! a parsed root element.
//!
//! # Example
//!
//! ```rust,no_run
//! use ooxml_tree::opc::OpcPackage;
//!
//! let pkg = OpcPackage::open("report.docx")?;
//! for (rel, id) in pkg.related_parts(None) {
//!     let part = pkg.get_part(id)?;
//!     println!("[{}] {} ({})", rel.r_id(), part.partname(), part.type_name());
//! }
//! # Ok::<(), ooxml_tree::opc::OpcError>(())
//! ```

pub mod constants;
pub mod error;
pub mod package;
pub mod packuri;
pub mod part;
pub mod phys_pkg;
pub mod pkgreader;
pub mod rel;

pub use error::{OpcError, Result};
pub use package::OpcPackage;
pub use packuri::PackURI;
pub use part::{ElementRef, Part, PartId};
pub use rel::{Relationship, Relationships};
