/// Read-only in-memory model of an OPC package.
///
/// OpcPackage owns every reachable part (indexed by [`PartId`] in load
/// order) together with the package-level relationships. Parts are
/// immutable once loaded.
use crate::markup::{NamespaceScope, XML_DECLARATION, XmlElement, escape_attribute};
use crate::opc::constants::{content_type as CT, relationship_type};
use crate::opc::error::{OpcError, Result};
use crate::opc::part::{ElementRef, Part, PartId};
use crate::opc::phys_pkg::PhysPkgReader;
use crate::opc::pkgreader::PackageReader;
use crate::opc::rel::{Relationship, Relationships};
use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Main API type for reading OPC packages.
#[derive(Debug)]
pub struct OpcPackage {
    /// Package-level relationships
    rels: Relationships,

    /// Parts in load order; `PartId` indexes this
    parts: Vec<Part>,

    /// Lower-cased partname -> part
    index: HashMap<String, PartId>,

    /// Lower-cased names of every ZIP member
    members: HashSet<String>,
}

impl OpcPackage {
    /// Open an OPC package from a file.
    ///
    /// # Example
    /// ```no_run
    /// use ooxml_tree::opc::OpcPackage;
    ///
    /// let pkg = OpcPackage::open("book.xlsx")?;
    /// println!("{} parts", pkg.part_count());
    /// # Ok::<(), ooxml_tree::opc::OpcError>(())
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Load an OPC package from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    /// Load an OPC package from bytes, parsing every XML part.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::load(data, None)
    }

    /// Load an OPC package from bytes.
    ///
    /// XML parts larger than `max_part_size` are kept without a root element.
    pub fn load(data: &[u8], max_part_size: Option<usize>) -> Result<Self> {
        let phys_reader = PhysPkgReader::new(data)?;
        let members = phys_reader
            .member_names()
            .iter()
            .map(|name| name.to_ascii_lowercase())
            .collect();

        let (rels, sparts) = PackageReader::from_phys_reader(phys_reader)?.into_parts();

        let mut parts = Vec::with_capacity(sparts.len());
        let mut index = HashMap::with_capacity(sparts.len());
        for spart in sparts {
            index.insert(spart.partname.key(), PartId(parts.len()));
            parts.push(Part::load(
                spart.partname,
                spart.content_type,
                spart.blob,
                spart.rels,
                max_part_size,
            )?);
        }

        debug!(parts = parts.len(), rels = rels.len(), "opened package");
        Ok(Self {
            rels,
            parts,
            index,
            members,
        })
    }

    /// Get the package-level relationships.
    #[inline]
    pub fn rels(&self) -> &Relationships {
        &self.rels
    }

    /// Whether the package holds a member with this part name.
    ///
    /// Case-insensitive; works for parts that are not reachable through
    /// relationships too.
    pub fn part_exists(&self, partname: &str) -> bool {
        self.members
            .contains(&partname.trim_start_matches('/').to_ascii_lowercase())
    }

    /// Look up a loaded part by name.
    pub fn part_id(&self, partname: &str) -> Option<PartId> {
        self.index.get(&partname.to_ascii_lowercase()).copied()
    }

    #[inline]
    pub fn part(&self, id: PartId) -> Option<&Part> {
        self.parts.get(id.0)
    }

    /// Like [`part`](Self::part) but reports the missing id as an error.
    pub fn get_part(&self, id: PartId) -> Result<&Part> {
        self.part(id)
            .ok_or_else(|| OpcError::PartNotFound(id.to_string()))
    }

    /// All loaded parts in load order.
    pub fn parts(&self) -> impl Iterator<Item = (PartId, &Part)> {
        self.parts
            .iter()
            .enumerate()
            .map(|(i, part)| (PartId(i), part))
    }

    #[inline]
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Target of the package's officeDocument relationship.
    pub fn main_document_part(&self) -> Result<PartId> {
        let rel = self
            .rels
            .by_reltype(relationship_type::OFFICE_DOCUMENT)
            .ok_or_else(|| OpcError::PartNotFound("main document part".to_string()))?;
        let partname = rel.target_partname()?;
        self.part_id(partname.as_str())
            .ok_or_else(|| OpcError::PartNotFound(partname.to_string()))
    }

    /// Internal relationships of `source` (the package when `None`) whose
    /// target was loaded, in relationship-file order.
    pub fn related_parts(&self, source: Option<PartId>) -> Vec<(&Relationship, PartId)> {
        let rels = match source {
            None => &self.rels,
            Some(id) => match self.part(id) {
                Some(part) => part.rels(),
                None => return Vec::new(),
            },
        };

        rels.internal()
            .filter_map(|rel| {
                let partname = rel.target_partname().ok()?;
                let id = self.part_id(partname.as_str())?;
                Some((rel, id))
            })
            .collect()
    }

    /// Resolve an element reference.
    pub fn element(&self, element: &ElementRef) -> Option<&XmlElement> {
        let mut current = self.part(element.part())?.root()?;
        for &step in element.path() {
            current = current.child_at(step as usize)?;
        }
        Some(current)
    }

    /// Resolve an element reference together with the namespace bindings
    /// its ancestors put in scope.
    ///
    /// The element's own declarations are not entered.
    pub fn element_in_scope(&self, element: &ElementRef) -> Option<(&XmlElement, NamespaceScope)> {
        let mut scope = NamespaceScope::new();
        let mut current = self.part(element.part())?.root()?;
        for &step in element.path() {
            scope.enter(current);
            current = current.child_at(step as usize)?;
        }
        Some((current, scope))
    }

    /// `[Content_Types].xml` describing the loaded parts.
    ///
    /// One `Override` per part, in load order, plus the `rels` and `xml`
    /// defaults.
    pub fn content_types_xml(&self) -> String {
        let mut xml = String::with_capacity(256 + self.parts.len() * 160);
        xml.push_str(XML_DECLARATION);
        xml.push('\n');
        xml.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);
        xml.push_str(&format!(
            r#"<Default Extension="rels" ContentType="{}"/>"#,
            CT::OPC_RELATIONSHIPS
        ));
        xml.push_str(&format!(r#"<Default Extension="xml" ContentType="{}"/>"#, CT::XML));
        for part in &self.parts {
            xml.push_str(&format!(
                r#"<Override PartName="{}" ContentType="{}"/>"#,
                escape_attribute(part.partname().as_str()),
                escape_attribute(part.content_type()),
            ));
        }
        xml.push_str("</Types>");
        xml
    }
}
