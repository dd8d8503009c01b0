/// Constant values related to the Open Packaging Convention.
///
/// Content type URIs (like MIME-types) that specify a part's format, the
/// relationship types the package reader cares about, and the table that maps
/// content types to the part type names shown in part headers.
use phf::phf_map;

/// Content types the reader and writers refer to by name
pub mod content_type {
    pub const OPC_RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
    pub const SML_WORKSHEET: &str =
        "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml";

    // Generic XML
    pub const XML: &str = "application/xml";
    pub const TEXT_XML: &str = "text/xml";
}

/// Open XML relationship target modes
pub mod target_mode {
    /// External relationship target mode (e.g., hyperlinks to external URLs)
    pub const EXTERNAL: &str = "External";
}

/// Relationship type URIs used in OPC packages
pub mod relationship_type {
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
}

/// Part type name used for content types missing from [`PART_TYPE_NAMES`].
pub const EXTENDED_PART: &str = "ExtendedPart";

/// Part type name used for every `image/*` content type.
pub const IMAGE_PART: &str = "ImagePart";

/// Content type -> part type name.
static PART_TYPE_NAMES: phf::Map<&'static str, &'static str> = phf_map! {
    // WordprocessingML
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml" => "MainDocumentPart",
    "application/vnd.ms-word.document.macroEnabled.main+xml" => "MainDocumentPart",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.template.main+xml" => "MainDocumentPart",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml" => "StyleDefinitionsPart",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.settings+xml" => "DocumentSettingsPart",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.webSettings+xml" => "WebSettingsPart",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.fontTable+xml" => "FontTablePart",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml" => "NumberingDefinitionsPart",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.header+xml" => "HeaderPart",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml" => "FooterPart",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.footnotes+xml" => "FootnotesPart",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.endnotes+xml" => "EndnotesPart",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.comments+xml" => "WordprocessingCommentsPart",
    // SpreadsheetML
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml" => "WorkbookPart",
    "application/vnd.ms-excel.sheet.macroEnabled.main+xml" => "WorkbookPart",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.template.main+xml" => "WorkbookPart",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml" => "WorksheetPart",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml" => "WorkbookStylesPart",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml" => "SharedStringTablePart",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.calcChain+xml" => "CalculationChainPart",
    // PresentationML
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml" => "PresentationPart",
    "application/vnd.ms-powerpoint.presentation.macroEnabled.main+xml" => "PresentationPart",
    "application/vnd.openxmlformats-officedocument.presentationml.slide+xml" => "SlidePart",
    "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml" => "SlideLayoutPart",
    "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml" => "SlideMasterPart",
    "application/vnd.openxmlformats-officedocument.presentationml.presProps+xml" => "PresentationPropertiesPart",
    "application/vnd.openxmlformats-officedocument.presentationml.viewProps+xml" => "ViewPropertiesPart",
    "application/vnd.openxmlformats-officedocument.presentationml.tableStyles+xml" => "TableStylesPart",
    // Shared
    "application/vnd.openxmlformats-officedocument.theme+xml" => "ThemePart",
    "application/vnd.openxmlformats-package.core-properties+xml" => "CoreFilePropertiesPart",
    "application/vnd.openxmlformats-officedocument.extended-properties+xml" => "ExtendedFilePropertiesPart",
    "application/vnd.openxmlformats-officedocument.custom-properties+xml" => "CustomFilePropertiesPart",
    "application/vnd.openxmlformats-officedocument.drawingml.chart+xml" => "ChartPart",
    "application/vnd.openxmlformats-officedocument.drawing+xml" => "DrawingsPart",
    "application/vnd.openxmlformats-officedocument.vmlDrawing" => "VmlDrawingPart",
};

/// Part type name for a content type.
pub fn part_type_name(content_type: &str) -> &'static str {
    if let Some(name) = PART_TYPE_NAMES.get(content_type) {
        return *name;
    }
    if content_type.starts_with("image/") {
        return IMAGE_PART;
    }
    EXTENDED_PART
}

/// Whether a content type denotes XML markup that has a root element.
pub fn is_xml_content_type(content_type: &str) -> bool {
    content_type.ends_with("+xml")
        || content_type == content_type::XML
        || content_type == content_type::TEXT_XML
}
