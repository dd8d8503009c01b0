//! Low-level, read-only API to a serialized Open Packaging Convention (OPC) package.
//!
//! The PackageReader parses `[Content_Types].xml`, the package relationships
//! and every part reachable from them. Parts are visited breadth-first in
//! relationship-file order, so the resulting part list is the same for the
//! same bytes every time.

use crate::opc::constants::target_mode;
use crate::opc::error::{OpcError, Result};
use crate::opc::packuri::PackURI;
use crate::opc::phys_pkg::PhysPkgReader;
use crate::opc::rel::{Relationship, Relationships};
use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{trace, warn};

/// Serialized part with its content and relationships.
///
/// Represents a part as loaded from the physical package, before its
/// markup is parsed.
#[derive(Debug)]
pub struct SerializedPart {
    pub partname: PackURI,
    pub content_type: String,
    pub blob: Vec<u8>,
    pub rels: Relationships,
}

/// Content type map for looking up content types by part name or extension.
///
/// Implements the OPC discovery rule: an `Override` for the part name wins,
/// otherwise the `Default` for the extension applies. Both comparisons
/// ignore ASCII case.
#[derive(Debug, Default)]
pub struct ContentTypeMap {
    defaults: HashMap<String, String>,
    overrides: HashMap<String, String>,
}

impl ContentTypeMap {
    /// Parse content types from `[Content_Types].xml`.
    pub fn from_xml(xml: &[u8]) -> Result<Self> {
        let mut map = Self::default();
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                    let is_default = match e.local_name().as_ref() {
                        b"Default" => true,
                        b"Override" => false,
                        _ => {
                            buf.clear();
                            continue;
                        },
                    };

                    let mut key = None;
                    let mut content_type = None;
                    for attr in e.attributes() {
                        let attr = attr?;
                        match attr.key.as_ref() {
                            b"Extension" | b"PartName" => {
                                key = Some(attr.unescape_value()?.to_string());
                            },
                            b"ContentType" => {
                                content_type = Some(attr.unescape_value()?.to_string());
                            },
                            _ => {},
                        }
                    }

                    if let (Some(key), Some(ct)) = (key, content_type) {
                        if is_default {
                            map.add_default(&key, ct);
                        } else {
                            map.add_override(&key, ct);
                        }
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(OpcError::XmlError(format!(
                        "Content types parse error: {}",
                        e
                    )));
                },
                _ => {},
            }
            buf.clear();
        }

        Ok(map)
    }

    pub fn add_default(&mut self, extension: &str, content_type: String) {
        self.defaults
            .insert(extension.to_ascii_lowercase(), content_type);
    }

    pub fn add_override(&mut self, partname: &str, content_type: String) {
        self.overrides
            .insert(partname.to_ascii_lowercase(), content_type);
    }

    /// Get the content type for a partname.
    pub fn get(&self, pack_uri: &PackURI) -> Result<&str> {
        if let Some(ct) = self.overrides.get(&pack_uri.key()) {
            return Ok(ct);
        }
        if let Some(ct) = self.defaults.get(&pack_uri.ext().to_ascii_lowercase()) {
            return Ok(ct);
        }
        Err(OpcError::ContentTypeNotFound(pack_uri.to_string()))
    }
}

/// Parse the content of a `.rels` part, keeping file order.
///
/// `base_uri` is the directory of the source part and is stored on each
/// relationship for target resolution. Entries missing `Id`, `Type` or
/// `Target` are skipped.
pub fn parse_rels_xml(rels_xml: &[u8], base_uri: &str) -> Result<Relationships> {
    let mut rels = Relationships::new();
    let mut reader = Reader::from_reader(rels_xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                if e.local_name().as_ref() == b"Relationship" {
                    let mut r_id = None;
                    let mut reltype = None;
                    let mut target_ref = None;
                    let mut is_external = false;

                    for attr in e.attributes() {
                        let attr = attr?;
                        match attr.key.as_ref() {
                            b"Id" => r_id = Some(attr.unescape_value()?.to_string()),
                            b"Type" => reltype = Some(attr.unescape_value()?.to_string()),
                            b"Target" => target_ref = Some(attr.unescape_value()?.to_string()),
                            b"TargetMode" => {
                                is_external = attr.unescape_value()? == target_mode::EXTERNAL;
                            },
                            _ => {},
                        }
                    }

                    if let (Some(id), Some(rt), Some(tr)) = (r_id, reltype, target_ref) {
                        rels.push(Relationship::new(id, rt, tr, base_uri, is_external));
                    }
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(OpcError::XmlError(format!("Rels parse error: {}", e))),
            _ => {},
        }
        buf.clear();
    }

    Ok(rels)
}

/// Package reader that provides access to serialized parts and relationships.
#[derive(Debug)]
pub struct PackageReader {
    pkg_rels: Relationships,
    sparts: Vec<SerializedPart>,
}

impl PackageReader {
    /// Load the package relationships and every reachable part.
    ///
    /// Relationships pointing at members that do not exist are kept in
    /// their `.rels` list but contribute no part.
    pub fn from_phys_reader(mut phys_reader: PhysPkgReader) -> Result<Self> {
        let content_types = ContentTypeMap::from_xml(phys_reader.content_types_xml()?)?;

        let package_uri = PackURI::package();
        let pkg_rels = Self::load_rels(&phys_reader, &package_uri)?;

        let mut sparts = Vec::with_capacity(phys_reader.len());
        let mut visited: HashSet<String> = HashSet::new();
        let mut queue: VecDeque<PackURI> = VecDeque::new();
        Self::enqueue(&pkg_rels, &mut visited, &mut queue);

        while let Some(partname) = queue.pop_front() {
            let Some(blob) = phys_reader.take(&partname) else {
                warn!(part = %partname, "relationship target missing from package");
                continue;
            };

            let rels = Self::load_rels(&phys_reader, &partname)?;
            Self::enqueue(&rels, &mut visited, &mut queue);

            let content_type = content_types.get(&partname)?.to_string();
            trace!(part = %partname, content_type = %content_type, rels = rels.len(), "loaded part");

            sparts.push(SerializedPart {
                partname,
                content_type,
                blob,
                rels,
            });
        }

        Ok(Self { pkg_rels, sparts })
    }

    fn load_rels(phys_reader: &PhysPkgReader, source_uri: &PackURI) -> Result<Relationships> {
        match phys_reader.rels_xml_for(source_uri) {
            Some(xml) => parse_rels_xml(xml, source_uri.base_uri()),
            None => Ok(Relationships::new()),
        }
    }

    fn enqueue(
        rels: &Relationships,
        visited: &mut HashSet<String>,
        queue: &mut VecDeque<PackURI>,
    ) {
        for rel in rels.internal() {
            match rel.target_partname() {
                Ok(partname) => {
                    if visited.insert(partname.key()) {
                        queue.push_back(partname);
                    }
                },
                Err(e) => warn!(r_id = rel.r_id(), error = %e, "unresolvable relationship target"),
            }
        }
    }

    /// Take ownership of the relationships and parts.
    pub fn into_parts(self) -> (Relationships, Vec<SerializedPart>) {
        (self.pkg_rels, self.sparts)
    }
}
