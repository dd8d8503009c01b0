//! Document sessions.
//!
//! A [`Session`] owns everything an opened document needs: the buffered
//! source bytes, the parsed package, the document handle and the node tree.
//! Nodes borrowed from the session stay valid until it is closed or
//! reopened; projecting through a closed session reports
//! [`Error::SessionClosed`].

use crate::error::{Error, Result};
use crate::opc::{OpcError, OpcPackage, PartId};
use crate::options::InspectOptions;
use crate::projection::{self, emit::CodeEmitter, emit::Language};
use crate::markup::XmlElement;
use crate::tree::{Annotation, AnnotationPolicy, Node, TreeBuilder};
use std::fmt;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Kind of Office document held by a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Wordprocessing,
    Spreadsheet,
    Presentation,
}

impl DocumentKind {
    /// Typed document name, e.g. `SpreadsheetDocument`.
    pub fn name(self) -> &'static str {
        match self {
            DocumentKind::Wordprocessing => "WordprocessingDocument",
            DocumentKind::Spreadsheet => "SpreadsheetDocument",
            DocumentKind::Presentation => "PresentationDocument",
        }
    }

    /// Part whose presence identifies this kind.
    pub fn marker_part(self) -> &'static str {
        match self {
            DocumentKind::Wordprocessing => "/word/document.xml",
            DocumentKind::Spreadsheet => "/xl/workbook.xml",
            DocumentKind::Presentation => "/ppt/presentation.xml",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Marker probes in the order they are tried; the first hit wins.
pub const MARKER_PROBES: [DocumentKind; 3] = [
    DocumentKind::Wordprocessing,
    DocumentKind::Spreadsheet,
    DocumentKind::Presentation,
];

/// Document kind of `package`, from the first marker part it contains.
pub fn detect_kind(package: &OpcPackage) -> Option<DocumentKind> {
    MARKER_PROBES
        .into_iter()
        .find(|kind| package.part_exists(kind.marker_part()))
}

/// Typed handle on the main part of an opened document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentHandle {
    kind: DocumentKind,
    main_part: PartId,
}

impl DocumentHandle {
    /// Open `package` as a document of `kind`.
    ///
    /// # Errors
    /// [`Error::ContainerOpenFailure`] if the marker part is present in the
    /// archive but not reachable through the package relationships.
    pub fn open(package: &OpcPackage, kind: DocumentKind) -> Result<Self> {
        let main_part = package
            .part_id(kind.marker_part())
            .ok_or_else(|| OpcError::PartNotFound(kind.marker_part().to_string()))?;
        Ok(Self { kind, main_part })
    }

    #[inline]
    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    #[inline]
    pub fn main_part(&self) -> PartId {
        self.main_part
    }
}

/// An inspection session over at most one open document.
///
/// # Example
///
/// ```rust,no_run
/// use ooxml_tree::{Language, Session};
///
/// let mut session = Session::new();
/// let root = session.open_path("book.xlsx")?.clone();
/// for (depth, node) in root.walk() {
///     println!("{}{}", "  ".repeat(depth), node.header());
/// }
/// let first = &root.children()[0];
/// println!("{}", session.project_code_in(first, Language::Python)?);
/// session.close();
/// # Ok::<(), ooxml_tree::Error>(())
/// ```
#[derive(Debug)]
pub struct Session {
    options: InspectOptions,
    policy: AnnotationPolicy,
    name: Option<String>,
    source: Option<Vec<u8>>,
    package: Option<OpcPackage>,
    document: Option<DocumentHandle>,
    root: Option<Node>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// An unopened session with default options.
    pub fn new() -> Self {
        Self::with_options(InspectOptions::default())
    }

    pub fn with_options(options: InspectOptions) -> Self {
        let policy = options.annotation_policy();
        Self {
            options,
            policy,
            name: None,
            source: None,
            package: None,
            document: None,
            root: None,
        }
    }

    /// Open a document from a byte stream; the container node is labelled
    /// with the document kind's name.
    pub fn open<R: Read>(&mut self, reader: R) -> Result<&Node> {
        let data = read_stream(reader)?;
        self.load(None, data)
    }

    /// Open a document from a byte stream with an explicit container label.
    pub fn open_named<R: Read>(&mut self, name: impl Into<String>, reader: R) -> Result<&Node> {
        let data = read_stream(reader)?;
        self.load(Some(name.into()), data)
    }

    /// Open a document file; the container node is labelled with its file name.
    pub fn open_path<P: AsRef<Path>>(&mut self, path: P) -> Result<&Node> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|e| Error::ContainerOpenFailure(OpcError::IoError(e)))?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        self.load(name, data)
    }

    /// Open a document from bytes already in memory.
    pub fn open_bytes(&mut self, data: impl Into<Vec<u8>>) -> Result<&Node> {
        self.load(None, data.into())
    }

    fn load(&mut self, name: Option<String>, data: Vec<u8>) -> Result<&Node> {
        self.close();

        let package = OpcPackage::load(&data, self.options.max_part_size)?;
        let kind = detect_kind(&package).ok_or(Error::UnsupportedDocumentKind)?;
        let document = DocumentHandle::open(&package, kind)?;

        let header = name.clone().unwrap_or_else(|| kind.name().to_string());
        let root = TreeBuilder::new(&package, &self.policy).build(header);
        debug!(kind = %kind, parts = package.part_count(), nodes = root.len(), "opened document");

        self.name = name;
        self.source = Some(data);
        self.package = Some(package);
        self.document = Some(document);
        Ok(self.root.insert(root))
    }

    /// Rebuild the tree of the open document, e.g. after the annotation
    /// policy changed.
    pub fn rebuild(&mut self) -> Result<&Node> {
        let data = self.source.take().ok_or(Error::SessionClosed)?;
        let name = self.name.take();
        self.load(name, data)
    }

    /// Release the document handle, the package and the buffered stream.
    ///
    /// Safe to call any number of times, including before any open.
    pub fn close(&mut self) {
        if !self.is_open() {
            return;
        }
        self.root = None;
        if let Some(document) = self.document.take() {
            debug!(kind = %document.kind(), "closing document");
        }
        self.package = None;
        self.source = None;
        self.name = None;
    }

    pub fn is_open(&self) -> bool {
        self.package.is_some()
    }

    /// Root of the node tree, while a document is open.
    pub fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    pub fn kind(&self) -> Option<DocumentKind> {
        self.document.map(|document| document.kind())
    }

    pub fn document(&self) -> Option<&DocumentHandle> {
        self.document.as_ref()
    }

    pub fn package(&self) -> Option<&OpcPackage> {
        self.package.as_ref()
    }

    pub fn options(&self) -> &InspectOptions {
        &self.options
    }

    pub fn policy(&self) -> &AnnotationPolicy {
        &self.policy
    }

    /// Replace the annotation policy; takes effect on the next open or
    /// [`rebuild`](Self::rebuild).
    pub fn set_policy(&mut self, policy: AnnotationPolicy) {
        self.policy = policy;
    }

    /// Add or replace an extractor; takes effect on the next open or
    /// [`rebuild`](Self::rebuild).
    pub fn register_annotation<F>(&mut self, kind: impl Into<String>, extractor: F)
    where
        F: Fn(&XmlElement) -> Option<Annotation> + Send + Sync + 'static,
    {
        self.policy.register(kind, extractor);
    }

    /// Pretty-printed XML of `node`; empty for container and part nodes.
    pub fn project_xml(&self, node: &Node) -> Result<String> {
        let package = self.package.as_ref().ok_or(Error::SessionClosed)?;
        projection::project_xml(package, node)
    }

    /// Code rebuilding the object behind `node`, generated by `emitter`.
    pub fn project_code(&self, node: &Node, emitter: &dyn CodeEmitter) -> Result<String> {
        let package = self.package.as_ref().ok_or(Error::SessionClosed)?;
        projection::project_code(package, node, emitter)
    }

    /// [`project_code`](Self::project_code) with a built-in emitter.
    pub fn project_code_in(&self, node: &Node, language: Language) -> Result<String> {
        self.project_code(node, language.emitter().as_ref())
    }

    /// [`project_code`](Self::project_code) in the configured default language.
    pub fn project_default_code(&self, node: &Node) -> Result<String> {
        self.project_code_in(node, self.options.default_language)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}

fn read_stream<R: Read>(mut reader: R) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    reader
        .read_to_end(&mut data)
        .map_err(|e| Error::ContainerOpenFailure(OpcError::IoError(e)))?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{self, SML_NS, ZipFixture};
    use proptest::prelude::*;
    use std::io::Cursor;

    /// Workbook whose main part holds `rows` element children named `Row`.
    fn pascal_workbook(rows: &[usize]) -> Vec<u8> {
        let mut body = String::new();
        for (i, cells) in rows.iter().enumerate() {
            body.push_str(&format!(r#"<Row r="{}">"#, i * 2 + 1));
            for c in 0..*cells {
                body.push_str(&format!(r#"<Cell r="{}{}"/>"#, (b'A' + c as u8) as char, i * 2 + 1));
            }
            body.push_str("</Row>");
        }
        ZipFixture::new()
            .file("[Content_Types].xml", test_support::content_types(&[]))
            .file(
                "_rels/.rels",
                test_support::rels(&[("rId1", test_support::OFFICE_DOCUMENT, "xl/workbook.xml")]),
            )
            .file(
                "xl/workbook.xml",
                format!(r#"<workbook xmlns="{SML_NS}"><Rows>{body}</Rows></workbook>"#),
            )
            .build()
    }

    fn headers(root: &Node) -> Vec<String> {
        root.walk().map(|(_, node)| node.header().to_string()).collect()
    }

    #[test]
    fn test_detects_each_kind() {
        let cases = [
            (test_support::wordprocessing(), DocumentKind::Wordprocessing),
            (test_support::spreadsheet(), DocumentKind::Spreadsheet),
            (test_support::presentation(), DocumentKind::Presentation),
        ];
        for (data, kind) in cases {
            let mut session = Session::new();
            let root = session.open(Cursor::new(data)).unwrap();
            assert_eq!(root.header(), kind.name());
            assert_eq!(session.kind(), Some(kind));
        }
    }

    #[test]
    fn test_first_marker_wins() {
        let data = test_support::ZipFixture::new()
            .file("[Content_Types].xml", test_support::content_types(&[]))
            .file(
                "_rels/.rels",
                test_support::rels(&[
                    ("rId1", "urn:a", "xl/workbook.xml"),
                    ("rId2", "urn:b", "word/document.xml"),
                ]),
            )
            .file("xl/workbook.xml", "<workbook/>")
            .file("word/document.xml", "<document/>")
            .build();
        let pkg = OpcPackage::from_bytes(&data).unwrap();
        assert_eq!(detect_kind(&pkg), Some(DocumentKind::Wordprocessing));
    }

    #[test]
    fn test_row_and_cell_annotations() {
        let data = ZipFixture::new()
            .file("[Content_Types].xml", test_support::content_types(&[]))
            .file(
                "_rels/.rels",
                test_support::rels(&[("rId1", test_support::OFFICE_DOCUMENT, "xl/workbook.xml")]),
            )
            .file(
                "xl/workbook.xml",
                format!(
                    r#"<workbook xmlns="{SML_NS}"><Rows><Row r="1"/><Row r="3"/><Row r="5"><Cell r="B2"/><Cell/></Row></Rows></workbook>"#
                ),
            )
            .build();
        let mut session = Session::new();
        let root = session.open(Cursor::new(data)).unwrap();
        let row = root.find("<2> Row (Row) [5]").unwrap();
        let cells: Vec<_> = row.children().iter().map(|n| n.header()).collect();
        assert_eq!(cells, ["<0> Cell (Cell) [B2]", "<1> Cell (Cell)"]);
    }

    #[test]
    fn test_deeply_nested_markup_is_rejected() {
        let depth = 5_000;
        let data = ZipFixture::new()
            .file("[Content_Types].xml", test_support::content_types(&[]))
            .file(
                "_rels/.rels",
                test_support::rels(&[("rId1", test_support::OFFICE_DOCUMENT, "xl/workbook.xml")]),
            )
            .file(
                "xl/workbook.xml",
                format!(
                    r#"<workbook xmlns="{SML_NS}">{}{}</workbook>"#,
                    "<a>".repeat(depth),
                    "</a>".repeat(depth)
                ),
            )
            .build();
        let mut session = Session::new();
        let err = session.open(Cursor::new(data)).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedMarkup(crate::markup::MarkupError::TooDeep { .. })
        ));
        assert!(!session.is_open());
    }

    #[test]
    fn test_relationship_target_case_differs_from_member() {
        let data = ZipFixture::new()
            .file("[Content_Types].xml", test_support::content_types(&[]))
            .file(
                "_rels/.rels",
                test_support::rels(&[("rId1", test_support::OFFICE_DOCUMENT, "xl/Workbook.xml")]),
            )
            .file("xl/workbook.xml", format!(r#"<workbook xmlns="{SML_NS}"><sheets/></workbook>"#))
            .build();
        let mut session = Session::new();
        let root = session.open(Cursor::new(data)).unwrap();
        assert_eq!(root.children()[0].header(), "[rId1] /xl/Workbook.xml (ExtendedPart)");
        assert!(root.find("<0> sheets (Sheets)").is_some());
        assert_eq!(session.kind(), Some(DocumentKind::Spreadsheet));
    }

    #[test]
    fn test_failed_reopen_releases_previous_document() {
        let mut session = Session::new();
        session.open(Cursor::new(test_support::spreadsheet())).unwrap();
        assert!(session.is_open());

        let err = session.open(Cursor::new(test_support::unrecognized())).unwrap_err();
        assert!(matches!(err, Error::UnsupportedDocumentKind));
        assert!(!session.is_open());
        assert!(session.root().is_none());
        assert!(session.package().is_none());
        assert!(session.kind().is_none());
    }

    #[test]
    fn test_unsupported_kind_leaves_session_empty() {
        let mut session = Session::new();
        let err = session.open(Cursor::new(test_support::unrecognized())).unwrap_err();
        assert!(matches!(err, Error::UnsupportedDocumentKind));
        assert!(!session.is_open());
        assert!(session.root().is_none());
        assert!(session.package().is_none());
    }

    #[test]
    fn test_not_a_container() {
        let mut session = Session::new();
        let err = session.open(Cursor::new(b"not a zip".to_vec())).unwrap_err();
        assert!(matches!(err, Error::ContainerOpenFailure(_)));
        assert!(!session.is_open());
    }

    #[test]
    fn test_unreachable_marker() {
        let data = test_support::ZipFixture::new()
            .file("[Content_Types].xml", test_support::content_types(&[]))
            .file("xl/workbook.xml", "<workbook/>")
            .build();
        let mut session = Session::new();
        let err = session.open(Cursor::new(data)).unwrap_err();
        assert!(matches!(err, Error::ContainerOpenFailure(OpcError::PartNotFound(_))));
    }

    #[test]
    fn test_open_twice_is_identical() {
        let mut session = Session::new();
        let first = headers(session.open_named("book.xlsx", Cursor::new(test_support::spreadsheet())).unwrap());
        let second = headers(session.open_named("book.xlsx", Cursor::new(test_support::spreadsheet())).unwrap());
        assert_eq!(first, second);
        assert_eq!(first[0], "book.xlsx");
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut session = Session::new();
        session.close();
        session.close();
        assert!(!session.is_open());

        session.open(Cursor::new(test_support::spreadsheet())).unwrap();
        assert!(session.is_open());
        session.close();
        session.close();
        assert!(!session.is_open());
        assert!(session.kind().is_none());
    }

    #[test]
    fn test_projection_after_close() {
        let mut session = Session::new();
        let root = session.open(Cursor::new(test_support::spreadsheet())).unwrap().clone();
        let row = root.find("<2> row (Row) [5]").unwrap().clone();
        assert!(session.project_xml(&row).unwrap().starts_with("<row "));

        session.close();
        assert!(matches!(session.project_xml(&row), Err(Error::SessionClosed)));
        assert!(matches!(
            session.project_code_in(&row, Language::Rust),
            Err(Error::SessionClosed)
        ));
    }

    #[test]
    fn test_register_and_rebuild() {
        let mut session = Session::new();
        session.open(Cursor::new(test_support::spreadsheet())).unwrap();
        assert!(session.root().unwrap().find("<0> sheet (Sheet) [Data]").is_none());

        session.register_annotation("Sheet", |e| {
            e.attribute("name").map(|n| Annotation::Text(n.to_string()))
        });
        let root = session.rebuild().unwrap();
        assert!(root.find("<0> sheet (Sheet) [Data]").is_some());
        assert!(root.find("<2> row (Row) [5]").is_some());
    }

    #[test]
    fn test_rebuild_requires_open_document() {
        let mut session = Session::new();
        assert!(matches!(session.rebuild(), Err(Error::SessionClosed)));
    }

    #[test]
    fn test_max_part_size_keeps_parts_shallow() {
        let options = InspectOptions::new().with_max_part_size(Some(16));
        let mut session = Session::with_options(options);
        let root = session.open(Cursor::new(test_support::spreadsheet())).unwrap();
        assert!(root.walk().all(|(_, node)| !node.is_element()));
        assert_eq!(root.len(), 4);
    }

    #[test]
    fn test_default_language() {
        let options = InspectOptions::new().with_default_language(Language::Python);
        let mut session = Session::with_options(options);
        let root = session.open(Cursor::new(test_support::spreadsheet())).unwrap().clone();
        let code = session.project_default_code(&root).unwrap();
        assert!(code.contains("def build_package():"));
    }

    #[test]
    fn test_open_path_uses_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quarterly.xlsx");
        std::fs::write(&path, test_support::spreadsheet()).unwrap();

        let mut session = Session::new();
        assert_eq!(session.open_path(&path).unwrap().header(), "quarterly.xlsx");
        assert!(matches!(
            session.open_path(dir.path().join("missing.xlsx")),
            Err(Error::ContainerOpenFailure(OpcError::IoError(_)))
        ));
        assert!(!session.is_open());
    }

    proptest! {
        #[test]
        fn prop_sibling_indices_are_contiguous(rows in proptest::collection::vec(0usize..5, 0..6)) {
            let mut session = Session::new();
            let root = session.open(Cursor::new(pascal_workbook(&rows))).unwrap();
            for (_, node) in root.walk() {
                let elements = node.children().iter().filter(|c| c.is_element());
                for (i, child) in elements.enumerate() {
                    let prefix = format!("<{i}> ");
                    prop_assert!(child.header().starts_with(&prefix), "{}", child.header());
                }
            }
            let listed = root.find("<0> Rows (Rows)").map_or(0, |n| n.children().len());
            prop_assert_eq!(listed, rows.len());
        }
    }
}
