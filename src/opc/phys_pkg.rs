//! Provides a general interface to a physical OPC package (ZIP file).
//!
//! Every member is decompressed once when the package is opened; the rest
//! of the reader works from that in-memory table.

use crate::opc::error::{OpcError, Result};
use crate::opc::packuri::{CONTENT_TYPES_URI, PackURI};
use std::collections::HashMap;
use std::io::{Cursor, Read};
use tracing::trace;
use zip::ZipArchive;

/// Physical package reader holding the decompressed ZIP members.
#[derive(Debug, Default)]
pub struct PhysPkgReader {
    /// Lower-cased member name (no leading slash) -> content
    members: HashMap<String, Vec<u8>>,

    /// Member names in archive order
    names: Vec<String>,
}

impl PhysPkgReader {
    /// Read every file member of the ZIP archive in `data`.
    ///
    /// # Errors
    /// Returns [`OpcError::ZipError`] when `data` is not a readable ZIP
    /// archive and [`OpcError::IoError`] when a member cannot be inflated.
    pub fn new(data: &[u8]) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(data))?;
        let mut members = HashMap::with_capacity(archive.len());
        let mut names = Vec::with_capacity(archive.len());

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().trim_start_matches('/').to_string();
            let mut blob = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut blob)?;
            trace!(member = %name, size = blob.len(), "read zip member");
            members.insert(name.to_ascii_lowercase(), blob);
            names.push(name);
        }

        Ok(Self { members, names })
    }

    /// Get the binary content for a part by its PackURI.
    ///
    /// Part names compare case-insensitively, as they do in OPC.
    pub fn blob_for(&self, pack_uri: &PackURI) -> Result<&[u8]> {
        self.members
            .get(&member_key(pack_uri))
            .map(Vec::as_slice)
            .ok_or_else(|| OpcError::PartNotFound(pack_uri.to_string()))
    }

    /// Move the content of a member out of the reader.
    pub fn take(&mut self, pack_uri: &PackURI) -> Option<Vec<u8>> {
        self.members.remove(&member_key(pack_uri))
    }

    /// Get the [Content_Types].xml content.
    pub fn content_types_xml(&self) -> Result<&[u8]> {
        let uri = PackURI::new(CONTENT_TYPES_URI).map_err(OpcError::InvalidPackUri)?;
        self.blob_for(&uri)
    }

    /// Get the relationships XML for a source (part or package), if it has any.
    pub fn rels_xml_for(&self, source_uri: &PackURI) -> Option<&[u8]> {
        self.members
            .get(&member_key(&source_uri.rels_uri()))
            .map(Vec::as_slice)
    }

    /// Whether a member with this part name exists, taken or not.
    pub fn contains(&self, pack_uri: &PackURI) -> bool {
        let membername = pack_uri.membername();
        self.names
            .iter()
            .any(|name| name.eq_ignore_ascii_case(membername))
    }

    /// Member names in archive order, including ones already taken.
    pub fn member_names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn member_key(pack_uri: &PackURI) -> String {
    pack_uri.membername().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for (name, data) in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_reads_members_in_order() {
        let data = archive(&[("[Content_Types].xml", b"<Types/>"), ("xl/workbook.xml", b"<workbook/>")]);
        let reader = PhysPkgReader::new(&data).unwrap();
        assert_eq!(reader.member_names(), ["[Content_Types].xml", "xl/workbook.xml"]);
        assert_eq!(reader.content_types_xml().unwrap(), b"<Types/>");

        let uri = PackURI::new("/xl/workbook.xml").unwrap();
        assert_eq!(reader.blob_for(&uri).unwrap(), b"<workbook/>");
        assert!(reader.contains(&PackURI::new("/XL/Workbook.xml").unwrap()));
        assert!(reader.rels_xml_for(&uri).is_none());
    }

    #[test]
    fn test_take_keeps_name() {
        let data = archive(&[("a.xml", b"<a/>")]);
        let mut reader = PhysPkgReader::new(&data).unwrap();
        let uri = PackURI::new("/a.xml").unwrap();
        assert_eq!(reader.take(&uri).unwrap(), b"<a/>");
        assert!(reader.blob_for(&uri).is_err());
        assert!(reader.contains(&uri));
    }

    #[test]
    fn test_member_lookup_ignores_case() {
        let data = archive(&[
            ("xl/workbook.xml", b"<workbook/>"),
            ("xl/_rels/workbook.xml.rels", b"<Relationships/>"),
        ]);
        let mut reader = PhysPkgReader::new(&data).unwrap();
        let uri = PackURI::new("/xl/Workbook.xml").unwrap();
        assert_eq!(reader.blob_for(&uri).unwrap(), b"<workbook/>");
        assert_eq!(reader.rels_xml_for(&uri).unwrap(), b"<Relationships/>");
        assert_eq!(reader.take(&uri).unwrap(), b"<workbook/>");
        assert_eq!(reader.member_names()[0], "xl/workbook.xml");
    }

    #[test]
    fn test_not_a_zip() {
        assert!(matches!(
            PhysPkgReader::new(b"definitely not a zip archive"),
            Err(OpcError::ZipError(_))
        ));
    }
}
