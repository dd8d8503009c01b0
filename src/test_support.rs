//! In-memory package fixtures shared by unit tests.

use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;

pub(crate) const SML_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
pub(crate) const REL_NS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

pub(crate) use crate::opc::constants::relationship_type::OFFICE_DOCUMENT;

/// ZIP archive assembled entry by entry.
#[derive(Default)]
pub(crate) struct ZipFixture {
    entries: Vec<(String, Vec<u8>)>,
}

impl ZipFixture {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn file(mut self, name: &str, data: impl AsRef<[u8]>) -> Self {
        self.entries.push((name.to_string(), data.as_ref().to_vec()));
        self
    }

    pub(crate) fn build(self) -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for (name, data) in &self.entries {
            zip.start_file(name.as_str(), options).unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }
}

/// `.rels` content for `(id, type, target)` triples.
pub(crate) fn rels(entries: &[(&str, &str, &str)]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for (id, reltype, target) in entries {
        xml.push_str(&format!(
            r#"<Relationship Id="{id}" Type="{reltype}" Target="{target}"/>"#
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

/// `[Content_Types].xml` with the usual defaults plus `(partname, type)` overrides.
pub(crate) fn content_types(overrides: &[(&str, &str)]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Default Extension="png" ContentType="image/png"/>"#,
    );
    for (partname, ct) in overrides {
        xml.push_str(&format!(r#"<Override PartName="{partname}" ContentType="{ct}"/>"#));
    }
    xml.push_str("</Types>");
    xml
}

/// Workbook with one sheet; the sheet holds three rows, the third one
/// numbered 5, and a shared strings part.
pub(crate) fn spreadsheet() -> Vec<u8> {
    let workbook = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="{SML_NS}" xmlns:r="{REL_NS}">
  <sheets>
    <sheet name="Data" sheetId="1" r:id="rId1"/>
  </sheets>
</workbook>"#
    );
    let sheet = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="{SML_NS}">
  <cols><col min="1" max="3" width="12"/></cols>
  <sheetData>
    <row r="1"><c r="A1" t="s"><v>0</v></c></row>
    <row r="2"><c r="B2"><v>42</v></c><c r=""/></row>
    <!-- gap -->
    <row r="5" spans="1:2"><c r="A5"><v>1</v></c><c r="B5"><f>SUM(A1:A5)</f><v>43</v></c></row>
  </sheetData>
</worksheet>"#
    );
    let shared = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="{SML_NS}" count="1" uniqueCount="1"><si><t xml:space="preserve"> Hello </t></si></sst>"#
    );

    ZipFixture::new()
        .file(
            "[Content_Types].xml",
            content_types(&[
                (
                    "/xl/workbook.xml",
                    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml",
                ),
                (
                    "/xl/worksheets/sheet1.xml",
                    "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml",
                ),
                (
                    "/xl/sharedStrings.xml",
                    "application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml",
                ),
            ]),
        )
        .file("_rels/.rels", rels(&[("rId1", OFFICE_DOCUMENT, "xl/workbook.xml")]))
        .file("xl/workbook.xml", workbook)
        .file(
            "xl/_rels/workbook.xml.rels",
            rels(&[
                (
                    "rId1",
                    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet",
                    "worksheets/sheet1.xml",
                ),
                (
                    "rId2",
                    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings",
                    "sharedStrings.xml",
                ),
                (
                    "rId3",
                    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink",
                    "missing.xml",
                ),
            ]),
        )
        .file("xl/worksheets/sheet1.xml", sheet)
        .file("xl/sharedStrings.xml", shared)
        .build()
}

/// Document with one paragraph and an embedded image.
pub(crate) fn wordprocessing() -> Vec<u8> {
    let document = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:t xml:space="preserve">Hello </w:t></w:r><w:r><w:t>world</w:t></w:r></w:p><w:sectPr/></w:body></w:document>"#;

    ZipFixture::new()
        .file(
            "[Content_Types].xml",
            content_types(&[(
                "/word/document.xml",
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml",
            )]),
        )
        .file("_rels/.rels", rels(&[("rId1", OFFICE_DOCUMENT, "word/document.xml")]))
        .file("word/document.xml", document)
        .file(
            "word/_rels/document.xml.rels",
            rels(&[(
                "rId7",
                "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image",
                "media/image1.png",
            )]),
        )
        .file("word/media/image1.png", [0x89, b'P', b'N', b'G', 0x0d, 0x0a])
        .build()
}

/// Presentation whose slide master and layout point at each other.
pub(crate) fn presentation() -> Vec<u8> {
    let pml = "http://schemas.openxmlformats.org/presentationml/2006/main";
    let master_rel = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
    let layout_rel = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";

    ZipFixture::new()
        .file(
            "[Content_Types].xml",
            content_types(&[
                (
                    "/ppt/presentation.xml",
                    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml",
                ),
                (
                    "/ppt/slideMasters/slideMaster1.xml",
                    "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml",
                ),
                (
                    "/ppt/slideLayouts/slideLayout1.xml",
                    "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml",
                ),
            ]),
        )
        .file("_rels/.rels", rels(&[("rId1", OFFICE_DOCUMENT, "ppt/presentation.xml")]))
        .file("ppt/presentation.xml", format!(r#"<p:presentation xmlns:p="{pml}"/>"#))
        .file(
            "ppt/_rels/presentation.xml.rels",
            rels(&[("rId1", master_rel, "slideMasters/slideMaster1.xml")]),
        )
        .file("ppt/slideMasters/slideMaster1.xml", format!(r#"<p:sldMaster xmlns:p="{pml}"/>"#))
        .file(
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            rels(&[("rId1", layout_rel, "../slideLayouts/slideLayout1.xml")]),
        )
        .file("ppt/slideLayouts/slideLayout1.xml", format!(r#"<p:sldLayout xmlns:p="{pml}"/>"#))
        .file(
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            rels(&[("rId1", master_rel, "../slideMasters/slideMaster1.xml")]),
        )
        .build()
}

/// A valid package with no recognized main part.
pub(crate) fn unrecognized() -> Vec<u8> {
    ZipFixture::new()
        .file("[Content_Types].xml", content_types(&[]))
        .file("_rels/.rels", rels(&[("rId1", OFFICE_DOCUMENT, "custom/main.xml")]))
        .file("custom/main.xml", "<main/>")
        .build()
}
