//! Element kind names.
//!
//! An element's kind is the class-style name a typed Open XML object model
//! would give it: `row` in the SpreadsheetML namespace is a `Row`, `c` is a
//! `Cell`, `p` in WordprocessingML is a `Paragraph`. Names are derived from
//! the namespace family plus the local name; abbreviated local names go
//! through an override table and everything else is PascalCased.

use phf::phf_map;
use std::borrow::Cow;

/// Kind reported for elements outside every recognized namespace.
pub const UNKNOWN_ELEMENT_KIND: &str = "OpenXmlUnknownElement";

/// Namespace URI -> conventional prefix of the namespace family.
static NAMESPACE_FAMILIES: phf::Map<&'static str, &'static str> = phf_map! {
    // WordprocessingML
    "http://schemas.openxmlformats.org/wordprocessingml/2006/main" => "w",
    "http://purl.oclc.org/ooxml/wordprocessingml/main" => "w",
    "http://schemas.microsoft.com/office/word/2010/wordml" => "w14",
    "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" => "wp",
    // SpreadsheetML
    "http://schemas.openxmlformats.org/spreadsheetml/2006/main" => "x",
    "http://purl.oclc.org/ooxml/spreadsheetml/main" => "x",
    "http://schemas.openxmlformats.org/drawingml/2006/spreadsheetDrawing" => "xdr",
    // PresentationML
    "http://schemas.openxmlformats.org/presentationml/2006/main" => "p",
    "http://purl.oclc.org/ooxml/presentationml/main" => "p",
    // DrawingML
    "http://schemas.openxmlformats.org/drawingml/2006/main" => "a",
    "http://purl.oclc.org/ooxml/drawingml/main" => "a",
    "http://schemas.openxmlformats.org/drawingml/2006/picture" => "pic",
    "http://schemas.openxmlformats.org/drawingml/2006/chart" => "c",
    // Shared
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships" => "r",
    "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" => "ap",
    "http://schemas.openxmlformats.org/officeDocument/2006/custom-properties" => "op",
    "http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes" => "vt",
    "http://schemas.openxmlformats.org/officeDocument/2006/math" => "m",
    "http://schemas.openxmlformats.org/markup-compatibility/2006" => "mc",
    // VML
    "urn:schemas-microsoft-com:vml" => "v",
    "urn:schemas-microsoft-com:office:office" => "o",
};

/// `family:local` -> kind name for local names that are abbreviations.
static KIND_OVERRIDES: phf::Map<&'static str, &'static str> = phf_map! {
    // WordprocessingML
    "w:p" => "Paragraph",
    "w:pPr" => "ParagraphProperties",
    "w:r" => "Run",
    "w:rPr" => "RunProperties",
    "w:t" => "Text",
    "w:b" => "Bold",
    "w:i" => "Italic",
    "w:u" => "Underline",
    "w:sz" => "FontSize",
    "w:br" => "Break",
    "w:tab" => "TabChar",
    "w:tbl" => "Table",
    "w:tblPr" => "TableProperties",
    "w:tr" => "TableRow",
    "w:tc" => "TableCell",
    "w:sectPr" => "SectionProperties",
    "w:pgSz" => "PageSize",
    "w:pgMar" => "PageMargin",
    "w:rFonts" => "RunFonts",
    "w:jc" => "Justification",
    // SpreadsheetML
    "x:c" => "Cell",
    "x:v" => "CellValue",
    "x:f" => "CellFormula",
    "x:is" => "InlineString",
    "x:col" => "Column",
    "x:cols" => "Columns",
    "x:dimension" => "SheetDimension",
    "x:sst" => "SharedStringTable",
    "x:si" => "SharedStringItem",
    "x:r" => "Run",
    "x:rPr" => "RunProperties",
    "x:t" => "Text",
    "x:workbookPr" => "WorkbookProperties",
    "x:numFmt" => "NumberingFormat",
    "x:numFmts" => "NumberingFormats",
    "x:xf" => "CellFormat",
    "x:cellXfs" => "CellFormats",
    "x:sz" => "FontSize",
    // PresentationML
    "p:sld" => "Slide",
    "p:sldId" => "SlideId",
    "p:sldIdLst" => "SlideIdList",
    "p:sldMasterId" => "SlideMasterId",
    "p:sldMasterIdLst" => "SlideMasterIdList",
    "p:sldLayout" => "SlideLayout",
    "p:sldMaster" => "SlideMaster",
    "p:sldSz" => "SlideSize",
    "p:cSld" => "CommonSlideData",
    "p:spTree" => "ShapeTree",
    "p:sp" => "Shape",
    "p:nvSpPr" => "NonVisualShapeProperties",
    "p:cNvPr" => "NonVisualDrawingProperties",
    "p:spPr" => "ShapeProperties",
    "p:txBody" => "TextBody",
    "p:pic" => "Picture",
    // DrawingML
    "a:p" => "Paragraph",
    "a:r" => "Run",
    "a:t" => "Text",
    "a:rPr" => "RunProperties",
    "a:pPr" => "ParagraphProperties",
    "a:bodyPr" => "BodyProperties",
    "a:off" => "Offset",
    "a:ext" => "Extents",
    "a:xfrm" => "Transform2D",
    "a:srgbClr" => "RgbColorModelHex",
    "a:clrScheme" => "ColorScheme",
    "a:fontScheme" => "FontScheme",
    "a:fmtScheme" => "FormatScheme",
    // Markup compatibility
    "mc:AlternateContent" => "AlternateContent",
    "mc:Choice" => "AlternateContentChoice",
    "mc:Fallback" => "AlternateContentFallback",
};

/// Family prefix for a namespace URI, if it is a recognized Open XML namespace.
#[inline]
pub fn namespace_family(namespace: &str) -> Option<&'static str> {
    NAMESPACE_FAMILIES.get(namespace).copied()
}

/// Kind name for an element with the given local name in `namespace`.
pub fn kind_name(local_name: &str, namespace: Option<&str>) -> Cow<'static, str> {
    let Some(family) = namespace.and_then(namespace_family) else {
        return Cow::Borrowed(UNKNOWN_ELEMENT_KIND);
    };

    let key = format!("{family}:{local_name}");
    if let Some(kind) = KIND_OVERRIDES.get(key.as_str()) {
        return Cow::Borrowed(*kind);
    }
    Cow::Owned(pascal_case(local_name))
}

fn pascal_case(local_name: &str) -> String {
    let mut out = String::with_capacity(local_name.len());
    let mut upper_next = true;
    for ch in local_name.chars() {
        if ch == '-' || ch == '_' || ch == '.' {
            upper_next = true;
            continue;
        }
        if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}
