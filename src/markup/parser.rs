//! quick-xml driven construction of [`XmlElement`] trees.

use crate::markup::element::XmlElement;
use crate::markup::error::{MarkupError, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesRef, BytesStart, Event};

/// Deepest element nesting accepted, the root element being level 1.
///
/// Tree building, normalization and serialization all recurse per level.
pub const MAX_DEPTH: usize = 256;

/// Parse a complete XML document and return its root element.
///
/// Whitespace is kept exactly as written; the XML declaration, doctype and
/// anything outside the root element other than whitespace, comments and
/// processing instructions is rejected or skipped. Markup nesting deeper
/// than [`MAX_DEPTH`] is rejected with [`MarkupError::TooDeep`].
pub fn parse_document(xml: &[u8]) -> Result<XmlElement> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| MarkupError::Syntax {
                position: reader.buffer_position() as u64,
                message: e.to_string(),
            })?;

        match event {
            Event::Start(ref e) => {
                if root.is_some() {
                    return Err(MarkupError::TrailingContent);
                }
                check_depth(&stack)?;
                stack.push(start_element(e)?);
            },
            Event::Empty(ref e) => {
                check_depth(&stack)?;
                let element = start_element(e)?;
                attach(&mut stack, &mut root, element)?;
            },
            Event::End(_) => {
                let element = stack.pop().ok_or_else(|| MarkupError::Syntax {
                    position: reader.buffer_position() as u64,
                    message: "closing tag without matching start".to_string(),
                })?;
                attach(&mut stack, &mut root, element)?;
            },
            Event::Text(ref e) => push_text(&mut stack, std::str::from_utf8(e)?)?,
            Event::CData(ref e) => push_text(&mut stack, std::str::from_utf8(e)?)?,
            Event::GeneralRef(ref e) => {
                let resolved = resolve_reference(e)?;
                push_text(&mut stack, resolved.encode_utf8(&mut [0u8; 4]))?;
            },
            Event::Comment(ref e) => {
                if let Some(top) = stack.last_mut() {
                    top.push_comment(std::str::from_utf8(e)?);
                }
            },
            Event::PI(ref e) => {
                if let Some(top) = stack.last_mut() {
                    top.push_processing_instruction(std::str::from_utf8(e)?);
                }
            },
            Event::Eof => break,
            // Declaration and doctype carry nothing the element tree keeps
            _ => {},
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(MarkupError::Unclosed(open.name().to_string()));
    }
    root.ok_or(MarkupError::MissingRoot)
}

/// Parse a serialized element (no declaration required).
#[inline]
pub fn parse_fragment(xml: &str) -> Result<XmlElement> {
    parse_document(xml.as_bytes())
}

/// Fails when one more level below `stack` would exceed [`MAX_DEPTH`].
fn check_depth(stack: &[XmlElement]) -> Result<()> {
    if stack.len() >= MAX_DEPTH {
        return Err(MarkupError::TooDeep { limit: MAX_DEPTH });
    }
    Ok(())
}

fn start_element(e: &BytesStart<'_>) -> Result<XmlElement> {
    let qname = e.name();
    let name = std::str::from_utf8(qname.as_ref())?;
    let mut element = XmlElement::new(name);

    for attr in e.attributes() {
        let attr = attr.map_err(|err| MarkupError::Attr(err.to_string()))?;
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = attr
            .unescape_value()
            .map_err(|err| MarkupError::Attr(err.to_string()))?;
        element.set_attribute(key, value.into_owned());
    }

    Ok(element)
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.push_element(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(MarkupError::TrailingContent),
    }
    Ok(())
}

fn push_text(stack: &mut [XmlElement], text: &str) -> Result<()> {
    match stack.last_mut() {
        Some(top) => top.push_text(text),
        // Prolog/epilog: only whitespace (and a stray BOM) is allowed
        None if text.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}').is_empty() => {},
        None => return Err(MarkupError::TrailingContent),
    }
    Ok(())
}

fn resolve_reference(reference: &BytesRef<'_>) -> Result<char> {
    let resolved = reference
        .resolve_char_ref()
        .map_err(|e| MarkupError::Syntax {
            position: 0,
            message: e.to_string(),
        })?;
    if let Some(ch) = resolved {
        return Ok(ch);
    }

    match &**reference {
        b"amp" => Ok('&'),
        b"lt" => Ok('<'),
        b"gt" => Ok('>'),
        b"quot" => Ok('"'),
        b"apos" => Ok('\''),
        other => Err(MarkupError::UnknownEntity(
            String::from_utf8_lossy(other).into_owned(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::element::XmlNode;

    #[test]
    fn test_parse_nested_elements() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8"?>
<x:worksheet xmlns:x="urn:sml"><x:sheetData><x:row r="1"><x:c r="A1"/></x:row></x:sheetData></x:worksheet>"#;
        let root = parse_document(xml).unwrap();

        assert_eq!(root.name(), "x:worksheet");
        let sheet_data = root.child_at(0).unwrap();
        let row = sheet_data.child_at(0).unwrap();
        assert_eq!(row.attribute("r"), Some("1"));
        assert_eq!(row.child_at(0).unwrap().attribute("r"), Some("A1"));
    }

    #[test]
    fn test_parse_keeps_whitespace_and_resolves_references() {
        let root = parse_fragment("<t> a &amp; b &#65;<![CDATA[<c>]]></t>").unwrap();
        assert_eq!(root.children(), &[XmlNode::Text(" a & b A<c>".to_string())]);
    }

    #[test]
    fn test_parse_comments_and_pis() {
        let root = parse_fragment("<a><!-- note --><?mso-app x?><b/></a>").unwrap();
        assert_eq!(root.children().len(), 3);
        assert_eq!(root.children()[0], XmlNode::Comment(" note ".to_string()));
        assert_eq!(
            root.children()[1],
            XmlNode::ProcessingInstruction("mso-app x".to_string())
        );
    }

    #[test]
    fn test_parse_attribute_entities() {
        let root = parse_fragment(r#"<a v="x &amp; &quot;y&quot;"/>"#).unwrap();
        assert_eq!(root.attribute("v"), Some("x & \"y\""));
    }

    fn nested(depth: usize) -> String {
        format!("{}{}", "<a>".repeat(depth), "</a>".repeat(depth))
    }

    #[test]
    fn test_nesting_limit() {
        assert!(parse_fragment(&nested(MAX_DEPTH)).is_ok());
        assert!(parse_fragment(&format!("{}<b/>{}", "<a>".repeat(MAX_DEPTH - 1), "</a>".repeat(MAX_DEPTH - 1))).is_ok());

        assert_eq!(
            parse_fragment(&nested(MAX_DEPTH + 1)),
            Err(MarkupError::TooDeep { limit: MAX_DEPTH })
        );
        assert_eq!(
            parse_fragment(&format!("{}<b/>{}", "<a>".repeat(MAX_DEPTH), "</a>".repeat(MAX_DEPTH))),
            Err(MarkupError::TooDeep { limit: MAX_DEPTH })
        );
        assert_eq!(
            parse_fragment(&nested(20_000)),
            Err(MarkupError::TooDeep { limit: MAX_DEPTH })
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse_fragment(""), Err(MarkupError::MissingRoot)));
        assert!(matches!(
            parse_fragment("<a><b></a>"),
            Err(MarkupError::Syntax { .. })
        ));
        assert!(matches!(
            parse_fragment("<a/><b/>"),
            Err(MarkupError::TrailingContent)
        ));
        assert!(parse_fragment("<a>").is_err());
        assert!(matches!(
            parse_fragment("<a>&nbsp;</a>"),
            Err(MarkupError::UnknownEntity(_))
        ));
    }
}
