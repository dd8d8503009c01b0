//! Rust source emitter.
//!
//! Elements are rebuilt with this crate's [`XmlElement`] builder API;
//! parts become functions returning their bytes, and a package becomes a
//! function writing every part into a `zip::ZipWriter`.

use crate::markup::{XmlElement, XmlNode};
use crate::opc::{OpcPackage, Part};
use crate::projection::emit::writer::{CodeWriter, IdentAllocator, Keywords, emit_line};
use crate::projection::emit::{CodeEmitter, EmitError, EmitTarget, part_text};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Emits Rust code.
#[derive(Debug, Default, Clone, Copy)]
pub struct RustEmitter;

impl RustEmitter {
    pub fn new() -> Self {
        Self
    }
}

impl CodeEmitter for RustEmitter {
    fn language(&self) -> &str {
        "rust"
    }

    fn file_extension(&self) -> &str {
        "rs"
    }

    fn emit(&self, target: &EmitTarget<'_>) -> Result<String, EmitError> {
        let mut out = Generator::new();
        match *target {
            EmitTarget::Package(package) => out.package(package)?,
            EmitTarget::Part { part, .. } => out.part(part)?,
            EmitTarget::Element(element) => out.element(element)?,
        }
        Ok(out.finish())
    }
}

/// One emit run; names are allocated in a fixed order.
struct Generator<'a> {
    w: CodeWriter,
    items: IdentAllocator,
    /// Element functions still to be written
    pending: Vec<(String, &'a XmlElement)>,
}

impl<'a> Generator<'a> {
    fn new() -> Self {
        Self {
            w: CodeWriter::new("    "),
            items: IdentAllocator::new(Keywords::Rust),
            pending: Vec::new(),
        }
    }

    fn finish(self) -> String {
        self.w.finish()
    }

    fn element(&mut self, element: &'a XmlElement) -> Result<(), EmitError> {
        emit_line!(self.w, "use ooxml_tree::markup::XmlElement;")?;
        self.w.blank();
        let name = self.element_fn_name(element);
        self.element_fn(&name, element, true)
    }

    fn part(&mut self, part: &'a Part) -> Result<(), EmitError> {
        self.imports(&[part], false)?;
        self.part_fns(part, true)?;
        self.flush_pending()
    }

    fn package(&mut self, package: &'a OpcPackage) -> Result<(), EmitError> {
        let parts: Vec<&'a Part> = package.parts().map(|(_, part)| part).collect();
        self.imports(&parts, true)?;

        let build = self.items.allocate("build_package");
        let mut part_fns = Vec::with_capacity(parts.len());
        for part in &parts {
            part_fns.push(self.items.allocate(&format!("{}_part", part.partname().stem())));
        }

        emit_line!(
            self.w,
            "/// Writes the package as a ZIP archive ({} parts).",
            parts.len()
        )?;
        emit_line!(self.w, "pub fn {build}() -> zip::result::ZipResult<Vec<u8>> {{")?;
        self.w.indent();
        emit_line!(self.w, "let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));")?;
        emit_line!(self.w, "let options = SimpleFileOptions::default();")?;
        self.w.blank();

        self.zip_entry("[Content_Types].xml", &format!("{}.as_bytes()", lit(&package.content_types_xml())))?;
        if !package.rels().is_empty() {
            self.zip_entry("_rels/.rels", &format!("{}.as_bytes()", lit(&package.rels().to_xml())))?;
        }
        for (part, name) in parts.iter().zip(&part_fns) {
            self.zip_entry(part.partname().membername(), &format!("&{name}()"))?;
            if !part.rels().is_empty() {
                let rels_uri = part.partname().rels_uri();
                self.zip_entry(rels_uri.membername(), &format!("{}.as_bytes()", lit(&part.rels().to_xml())))?;
            }
        }

        emit_line!(self.w, "Ok(zip.finish()?.into_inner())")?;
        self.w.dedent();
        emit_line!(self.w, "}}")?;

        for (&part, name) in parts.iter().zip(&part_fns) {
            self.w.blank();
            self.part_content_fn(name, part, false)?;
        }
        self.flush_pending()
    }

    fn imports(&mut self, parts: &[&Part], zip: bool) -> Result<(), EmitError> {
        let any_xml = parts.iter().any(|p| p.root().is_some());
        let any_binary = parts
            .iter()
            .any(|p| p.root().is_none() && part_text(p).is_none());

        if zip {
            emit_line!(self.w, "use std::io::{{Cursor, Write}};")?;
            self.w.blank();
        }
        if any_binary {
            emit_line!(self.w, "use base64::Engine as _;")?;
        }
        if any_xml {
            emit_line!(self.w, "use ooxml_tree::markup::XmlElement;")?;
        }
        if zip {
            emit_line!(self.w, "use zip::write::SimpleFileOptions;")?;
        }
        self.w.blank();
        Ok(())
    }

    fn zip_entry(&mut self, membername: &str, bytes_expr: &str) -> Result<(), EmitError> {
        emit_line!(self.w, "zip.start_file({}, options)?;", lit(membername))?;
        emit_line!(self.w, "zip.write_all({bytes_expr})?;")?;
        Ok(())
    }

    /// Content function for a lone part, plus its relationships when present.
    fn part_fns(&mut self, part: &'a Part, public: bool) -> Result<(), EmitError> {
        let name = self
            .items
            .allocate(&format!("{}_part", part.partname().stem()));
        self.part_content_fn(&name, part, public)?;

        if !part.rels().is_empty() {
            let rels_name = self.items.allocate(&format!("{name}_rels"));
            self.w.blank();
            emit_line!(
                self.w,
                "/// Relationships of `{}`, stored at `{}`.",
                part.partname(),
                part.partname().rels_uri()
            )?;
            emit_line!(self.w, "pub fn {rels_name}() -> &'static str {{")?;
            self.w.indent();
            emit_line!(self.w, "{}", lit(&part.rels().to_xml()))?;
            self.w.dedent();
            emit_line!(self.w, "}}")?;
        }
        Ok(())
    }

    fn part_content_fn(&mut self, name: &str, part: &'a Part, public: bool) -> Result<(), EmitError> {
        let vis = if public { "pub " } else { "" };
        emit_line!(
            self.w,
            "/// `{}` ({}, {})",
            part.partname(),
            part.type_name(),
            part.content_type()
        )?;
        emit_line!(self.w, "{vis}fn {name}() -> Vec<u8> {{")?;
        self.w.indent();
        if let Some(root) = part.root() {
            let build = self.element_fn_name(root);
            emit_line!(self.w, "{build}().to_xml_document().into_bytes()")?;
            self.pending.push((build, root));
        } else if let Some(text) = part_text(part) {
            emit_line!(self.w, "{}.as_bytes().to_vec()", lit(text))?;
        } else {
            emit_line!(self.w, "base64::engine::general_purpose::STANDARD")?;
            self.w.indent();
            emit_line!(self.w, ".decode({})", lit(&STANDARD.encode(part.blob())))?;
            emit_line!(self.w, ".expect(\"embedded base64 is valid\")")?;
            self.w.dedent();
        }
        self.w.dedent();
        emit_line!(self.w, "}}")?;
        Ok(())
    }

    fn flush_pending(&mut self) -> Result<(), EmitError> {
        let pending = std::mem::take(&mut self.pending);
        for (name, element) in pending {
            self.w.blank();
            self.element_fn(&name, element, false)?;
        }
        Ok(())
    }

    fn element_fn_name(&mut self, element: &XmlElement) -> String {
        self.items
            .allocate(&format!("build_{}", element.local_name()))
    }

    fn element_fn(&mut self, name: &str, element: &XmlElement, public: bool) -> Result<(), EmitError> {
        let vis = if public { "pub " } else { "" };
        emit_line!(self.w, "/// Rebuilds `<{}>`.", element.name())?;
        emit_line!(self.w, "{vis}fn {name}() -> XmlElement {{")?;
        self.w.indent();
        let mut locals = IdentAllocator::new(Keywords::Rust);
        let root = self.element_body(element, &mut locals)?;
        emit_line!(self.w, "{root}")?;
        self.w.dedent();
        emit_line!(self.w, "}}")?;
        Ok(())
    }

    /// Statements building `element` into a fresh local; returns its name.
    fn element_body(&mut self, element: &XmlElement, locals: &mut IdentAllocator) -> Result<String, EmitError> {
        let var = locals.allocate(element.local_name());
        let mutable = !element.attributes().is_empty() || !element.is_empty();
        emit_line!(
            self.w,
            "let {}{var} = XmlElement::new({});",
            if mutable { "mut " } else { "" },
            lit(element.name())
        )?;
        for (key, value) in element.attributes() {
            emit_line!(self.w, "{var}.set_attribute({}, {});", lit(key), lit(value))?;
        }
        for child in element.children() {
            match child {
                XmlNode::Element(e) => {
                    let child_var = self.element_body(e, locals)?;
                    emit_line!(self.w, "{var}.push_element({child_var});")?;
                },
                XmlNode::Text(text) => {
                    emit_line!(self.w, "{var}.push_text({});", lit(text))?;
                },
                XmlNode::Comment(comment) => {
                    emit_line!(self.w, "{var}.push_comment({});", lit(comment))?;
                },
                XmlNode::ProcessingInstruction(pi) => {
                    emit_line!(self.w, "{var}.push_processing_instruction({});", lit(pi))?;
                },
            }
        }
        Ok(var)
    }
}

/// Rust string literal for `s`.
fn lit(s: &str) -> String {
    format!("{s:?}")
}
