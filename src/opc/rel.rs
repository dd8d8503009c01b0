use crate::markup::{XML_DECLARATION, escape_attribute};
use crate::opc::constants::target_mode;
use crate::opc::error::{OpcError, Result};
use crate::opc::packuri::PackURI;
/// Relationship-related objects for OPC packages.
///
/// Relationships are kept in the order they appear in their `.rels` part;
/// that order drives the order of child nodes in the tree.

/// A single relationship from a source part to a target.
///
/// Identified by an rId, either internal (pointing to another part) or
/// external (pointing to a URL outside the package).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1", "rId2")
    r_id: String,

    /// Relationship type URI
    reltype: String,

    /// Target reference, either a relative part URI or an external URL
    target_ref: String,

    /// Directory of the source part, used to resolve `target_ref`
    base_uri: String,

    is_external: bool,
}

impl Relationship {
    pub fn new(
        r_id: impl Into<String>,
        reltype: impl Into<String>,
        target_ref: impl Into<String>,
        base_uri: impl Into<String>,
        is_external: bool,
    ) -> Self {
        Self {
            r_id: r_id.into(),
            reltype: reltype.into(),
            target_ref: target_ref.into(),
            base_uri: base_uri.into(),
            is_external,
        }
    }

    #[inline]
    pub fn r_id(&self) -> &str {
        &self.r_id
    }

    #[inline]
    pub fn reltype(&self) -> &str {
        &self.reltype
    }

    /// Target reference exactly as written in the `.rels` part.
    #[inline]
    pub fn target_ref(&self) -> &str {
        &self.target_ref
    }

    #[inline]
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    #[inline]
    pub fn is_external(&self) -> bool {
        self.is_external
    }

    /// Absolute partname of the target; fails for external relationships.
    pub fn target_partname(&self) -> Result<PackURI> {
        if self.is_external {
            return Err(OpcError::InvalidRelationship(format!(
                "{} targets external resource {}",
                self.r_id, self.target_ref
            )));
        }
        PackURI::from_rel_ref(&self.base_uri, &self.target_ref).map_err(OpcError::InvalidPackUri)
    }
}

/// Ordered collection of relationships from one source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relationships {
    rels: Vec<Relationship>,
}

impl Relationships {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a relationship, keeping file order.
    pub fn push(&mut self, rel: Relationship) {
        self.rels.push(rel);
    }

    /// Look up a relationship by rId.
    pub fn get(&self, r_id: &str) -> Option<&Relationship> {
        self.rels.iter().find(|rel| rel.r_id == r_id)
    }

    /// First relationship of the given type.
    pub fn by_reltype(&self, reltype: &str) -> Option<&Relationship> {
        self.rels.iter().find(|rel| rel.reltype == reltype)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.rels.iter()
    }

    /// Internal relationships only, in file order.
    pub fn internal(&self) -> impl Iterator<Item = &Relationship> {
        self.rels.iter().filter(|rel| !rel.is_external)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }

    /// Serialize to the content of a `.rels` part, preserving order.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(128 + self.rels.len() * 160);

        xml.push_str(XML_DECLARATION);
        xml.push('\n');
        xml.push_str(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );

        for rel in &self.rels {
            xml.push_str(&format!(
                r#"<Relationship Id="{}" Type="{}" Target="{}""#,
                escape_attribute(&rel.r_id),
                escape_attribute(&rel.reltype),
                escape_attribute(&rel.target_ref),
            ));
            if rel.is_external {
                xml.push_str(&format!(r#" TargetMode="{}""#, target_mode::EXTERNAL));
            }
            xml.push_str("/>");
        }

        xml.push_str("</Relationships>");
        xml
    }
}

impl<'a> IntoIterator for &'a Relationships {
    type Item = &'a Relationship;
    type IntoIter = std::slice::Iter<'a, Relationship>;

    fn into_iter(self) -> Self::IntoIter {
        self.rels.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORKSHEET: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
    const STYLES: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
    const HYPERLINK: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";

    fn sample() -> Relationships {
        let mut rels = Relationships::new();
        rels.push(Relationship::new("rId3", WORKSHEET, "worksheets/sheet1.xml", "/xl", false));
        rels.push(Relationship::new("rId1", STYLES, "styles.xml", "/xl", false));
        rels.push(Relationship::new("rId2", HYPERLINK, "https://example.com/a?b&c", "/xl", true));
        rels
    }

    #[test]
    fn test_file_order_is_kept() {
        let ids: Vec<_> = sample().iter().map(|r| r.r_id().to_string()).collect();
        assert_eq!(ids, ["rId3", "rId1", "rId2"]);
    }

    #[test]
    fn test_internal_and_lookup() {
        let rels = sample();
        assert_eq!(rels.internal().count(), 2);
        assert_eq!(rels.get("rId1").unwrap().target_ref(), "styles.xml");
        assert_eq!(rels.by_reltype(WORKSHEET).unwrap().r_id(), "rId3");
        assert!(rels.get("rId9").is_none());
    }

    #[test]
    fn test_target_partname() {
        let rels = sample();
        let target = rels.get("rId3").unwrap().target_partname().unwrap();
        assert_eq!(target.as_str(), "/xl/worksheets/sheet1.xml");
        assert!(rels.get("rId2").unwrap().target_partname().is_err());
    }

    #[test]
    fn test_to_xml() {
        let xml = sample().to_xml();
        assert!(xml.starts_with(XML_DECLARATION));
        let first = xml.find("rId3").unwrap();
        let second = xml.find("rId1").unwrap();
        assert!(first < second);
        assert!(xml.contains(r#"Target="https://example.com/a?b&amp;c" TargetMode="External"/>"#));
    }
}
