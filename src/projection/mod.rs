//! Projection engine.
//!
//! Two on-demand views of the object behind a node: normalized, indented
//! XML ([`project_xml`]) and generated source code ([`project_code`]).
//! Nothing is cached; every call recomputes its output from the package.

pub mod emit;

use crate::error::{Error, Result};
use crate::markup::{NamespaceScope, XmlElement, normalize, parse_fragment};
use crate::opc::{ElementRef, OpcPackage};
use crate::tree::{Node, NodeKind};
use emit::{CodeEmitter, EmitTarget};
use tracing::trace;

/// Pretty-printed XML of an element node.
///
/// Container and part nodes yield an empty string. The element is written
/// with the namespace declarations it inherits from its ancestors, then
/// re-parsed, normalized and indented with 2 spaces per level.
///
/// # Errors
/// [`Error::MalformedMarkup`] if the markup cannot be parsed and
/// [`Error::StaleNode`] if the node does not belong to `package`.
pub fn project_xml(package: &OpcPackage, node: &Node) -> Result<String> {
    let NodeKind::Element(element_ref) = node.kind() else {
        return Ok(String::new());
    };
    let element = standalone_element(package, element_ref)?;
    trace!(element = %element_ref, "projecting xml");
    normalized_xml(&element.to_xml())
}

/// Normalize and indent a fragment of XML markup.
///
/// Applying this to its own output returns the same text.
pub fn normalized_xml(markup: &str) -> Result<String> {
    let mut element = parse_fragment(markup)?;
    normalize(&mut element);
    Ok(element.to_pretty_xml())
}

/// Source code that rebuilds the object behind `node`.
///
/// Container nodes emit the whole package, part nodes their part and
/// element nodes their element. Emitter failures are reported as
/// [`Error::CodeGenerationFailure`] and leave nothing behind.
pub fn project_code(package: &OpcPackage, node: &Node, emitter: &dyn CodeEmitter) -> Result<String> {
    let generated = match node.kind() {
        NodeKind::Container => emitter.emit(&EmitTarget::Package(package)),
        NodeKind::Part { part, .. } => {
            let part = package
                .part(*part)
                .ok_or_else(|| Error::StaleNode(node.header().to_string()))?;
            emitter.emit(&EmitTarget::Part { package, part })
        },
        NodeKind::Element(element_ref) => {
            let element = standalone_element(package, element_ref)?;
            emitter.emit(&EmitTarget::Element(&element))
        },
    };

    trace!(language = emitter.language(), node = node.header(), "projecting code");
    generated.map_err(|e| Error::CodeGenerationFailure {
        language: emitter.language().to_string(),
        reason: e.to_string(),
    })
}

/// Copy of the referenced element carrying every namespace declaration in
/// scope, so that it parses on its own.
fn standalone_element(package: &OpcPackage, element_ref: &ElementRef) -> Result<XmlElement> {
    let (element, scope) = package
        .element_in_scope(element_ref)
        .ok_or_else(|| Error::StaleNode(element_ref.to_string()))?;
    Ok(with_declarations(element, &scope))
}

fn with_declarations(element: &XmlElement, scope: &NamespaceScope) -> XmlElement {
    let mut out = XmlElement::new(element.name());
    for (name, uri) in scope.as_declarations() {
        if element.attribute(&name).is_none() {
            out.set_attribute(name, uri);
        }
    }
    for (name, value) in element.attributes() {
        out.set_attribute(name.as_str(), value.as_str());
    }
    for child in element.children() {
        out.push_node(child.clone());
    }
    out
}
