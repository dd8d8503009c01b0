//! Document tree model.
//!
//! An opened package becomes a strict tree of [`Node`]s: one container
//! node, a part node per relationship and an element node per element of
//! each part's markup. Nodes only carry their header and a reference
//! ([`PartId`](crate::opc::PartId) or [`ElementRef`](crate::opc::ElementRef))
//! into the package that built them.

pub mod annotation;
pub mod builder;
pub mod header;
pub mod node;

pub use annotation::{Annotation, AnnotationPolicy, Extractor};
pub use builder::TreeBuilder;
pub use header::{element_header, part_header};
pub use node::{Node, NodeKind, Walk};
