//! Header text for part and element nodes.

use crate::tree::annotation::Annotation;

/// `[{rId}] {partUri} ({partTypeName})`
pub fn part_header(relationship_id: &str, partname: &str, type_name: &str) -> String {
    format!("[{relationship_id}] {partname} ({type_name})")
}

/// `<{index}> {localName} ({kindName})`, followed by ` [{value}]` when an
/// annotation is present.
pub fn element_header(
    index: usize,
    local_name: &str,
    kind_name: &str,
    annotation: Option<&Annotation>,
) -> String {
    match annotation {
        Some(annotation) => format!("<{index}> {local_name} ({kind_name}) [{annotation}]"),
        None => format!("<{index}> {local_name} ({kind_name})"),
    }
}
