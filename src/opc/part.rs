//! Parts of an OPC package and references into their element trees.

use crate::markup::{XmlElement, parse_document};
use crate::opc::constants::{is_xml_content_type, part_type_name};
use crate::opc::error::{OpcError, Result};
use crate::opc::packuri::PackURI;
use crate::opc::rel::Relationships;
use smallvec::SmallVec;
use std::fmt;

/// Index of a part within its [`OpcPackage`](crate::opc::OpcPackage).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartId(pub(crate) usize);

impl PartId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "part#{}", self.0)
    }
}

/// Location of an element inside a part's root element.
///
/// `path` holds the position of each step within its parent's content
/// (text and comments included), starting below the root element; an empty
/// path addresses the root itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementRef {
    part: PartId,
    path: SmallVec<[u32; 8]>,
}

impl ElementRef {
    /// Reference to the root element of `part`.
    pub fn root(part: PartId) -> Self {
        Self {
            part,
            path: SmallVec::new(),
        }
    }

    /// Reference to the child at content position `pos` of this element.
    pub fn child(&self, pos: usize) -> Self {
        let mut path = self.path.clone();
        path.push(pos as u32);
        Self {
            part: self.part,
            path,
        }
    }

    #[inline]
    pub fn part(&self) -> PartId {
        self.part
    }

    #[inline]
    pub fn path(&self) -> &[u32] {
        &self.path
    }

    /// Number of steps below the root element.
    #[inline]
    pub fn depth(&self) -> usize {
        self.path.len()
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.part)?;
        for step in &self.path {
            write!(f, "/{step}")?;
        }
        Ok(())
    }
}

/// A part loaded from the package.
#[derive(Debug, Clone)]
pub struct Part {
    partname: PackURI,
    content_type: String,
    blob: Vec<u8>,
    rels: Relationships,
    root: Option<XmlElement>,
}

impl Part {
    /// Build a part, parsing its root element when the content is XML.
    ///
    /// Content larger than `max_part_size` is kept as a blob without a root
    /// element.
    ///
    /// # Errors
    /// Returns [`OpcError::Markup`] if XML content cannot be parsed.
    pub fn load(
        partname: PackURI,
        content_type: String,
        blob: Vec<u8>,
        rels: Relationships,
        max_part_size: Option<usize>,
    ) -> Result<Self> {
        let within_limit = max_part_size.is_none_or(|max| blob.len() <= max);
        let root = if is_xml_content_type(&content_type) && within_limit {
            let root = parse_document(&blob).map_err(|source| OpcError::Markup {
                partname: partname.to_string(),
                source,
            })?;
            Some(root)
        } else {
            None
        };

        Ok(Self {
            partname,
            content_type,
            blob,
            rels,
            root,
        })
    }

    #[inline]
    pub fn partname(&self) -> &PackURI {
        &self.partname
    }

    #[inline]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Part type kind name, e.g. `WorksheetPart`.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        part_type_name(&self.content_type)
    }

    #[inline]
    pub fn blob(&self) -> &[u8] {
        &self.blob
    }

    #[inline]
    pub fn rels(&self) -> &Relationships {
        &self.rels
    }

    /// Parsed root element, if the part holds XML.
    #[inline]
    pub fn root(&self) -> Option<&XmlElement> {
        self.root.as_ref()
    }
}
