//! Python source emitter.
//!
//! Generated code uses only the standard library: `xml.etree.ElementTree`
//! for elements, `zipfile` for packages and `base64` for binary parts.
//! Text follows the ElementTree model, so character data after a child
//! element becomes that child's `tail`.

use crate::markup::{XML_DECLARATION, XmlElement, XmlNode};
use crate::opc::{OpcPackage, Part};
use crate::projection::emit::writer::{CodeWriter, IdentAllocator, Keywords, emit_line};
use crate::projection::emit::{CodeEmitter, EmitError, EmitTarget, part_text};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Emits Python 3 code.
#[derive(Debug, Default, Clone, Copy)]
pub struct PythonEmitter;

impl PythonEmitter {
    pub fn new() -> Self {
        Self
    }
}

impl CodeEmitter for PythonEmitter {
    fn language(&self) -> &str {
        "python"
    }

    fn file_extension(&self) -> &str {
        "py"
    }

    fn emit(&self, target: &EmitTarget<'_>) -> Result<String, EmitError> {
        let mut out = Generator::new();
        match *target {
            EmitTarget::Package(package) => out.package(package)?,
            EmitTarget::Part { part, .. } => out.part(part)?,
            EmitTarget::Element(element) => out.element(element)?,
        }
        Ok(out.w.finish())
    }
}

struct Generator<'a> {
    w: CodeWriter,
    items: IdentAllocator,
    pending: Vec<(String, &'a XmlElement)>,
}

impl<'a> Generator<'a> {
    fn new() -> Self {
        Self {
            w: CodeWriter::new("    "),
            items: IdentAllocator::new(Keywords::Python),
            pending: Vec::new(),
        }
    }

    fn element(&mut self, element: &'a XmlElement) -> Result<(), EmitError> {
        emit_line!(self.w, "import xml.etree.ElementTree as ET")?;
        self.w.blank();
        self.w.blank();
        let name = self.element_fn_name(element);
        self.element_fn(&name, element)
    }

    fn part(&mut self, part: &'a Part) -> Result<(), EmitError> {
        self.imports(&[part], false)?;

        let name = self
            .items
            .allocate(&format!("{}_part", part.partname().stem()));
        self.part_content_fn(&name, part)?;

        if !part.rels().is_empty() {
            let rels_name = self.items.allocate(&format!("{name}_rels"));
            self.w.blank();
            self.w.blank();
            emit_line!(self.w, "def {rels_name}():")?;
            self.w.indent();
            emit_line!(
                self.w,
                "\"\"\"Relationships of {}, stored at {}.\"\"\"",
                part.partname(),
                part.partname().rels_uri()
            )?;
            emit_line!(self.w, "return {}", lit(&part.rels().to_xml()))?;
            self.w.dedent();
        }
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

        emit_line!(self.w, "def {build}():")?;
        self.w.indent();
        emit_line!(
            self.w,
            "\"\"\"Return the package as ZIP bytes ({} parts).\"\"\"",
            parts.len()
        )?;
        emit_line!(self.w, "buffer = io.BytesIO()")?;
        emit_line!(
            self.w,
            "with zipfile.ZipFile(buffer, \"w\", zipfile.ZIP_DEFLATED) as package:"
        )?;
        self.w.indent();
        self.zip_entry("[Content_Types].xml", &lit(&package.content_types_xml()))?;
        if !package.rels().is_empty() {
            self.zip_entry("_rels/.rels", &lit(&package.rels().to_xml()))?;
        }
        for (part, name) in parts.iter().zip(&part_fns) {
            self.zip_entry(part.partname().membername(), &format!("{name}()"))?;
            if !part.rels().is_empty() {
                let rels_uri = part.partname().rels_uri();
                self.zip_entry(rels_uri.membername(), &lit(&part.rels().to_xml()))?;
            }
        }
        self.w.dedent();
        emit_line!(self.w, "return buffer.getvalue()")?;
        self.w.dedent();

        for (&part, name) in parts.iter().zip(&part_fns) {
            self.w.blank();
            self.w.blank();
            self.part_content_fn(name, part)?;
        }
        self.flush_pending()
    }

    fn imports(&mut self, parts: &[&Part], zip: bool) -> Result<(), EmitError> {
        let any_xml = parts.iter().any(|p| p.root().is_some());
        let any_binary = parts
            .iter()
            .any(|p| p.root().is_none() && part_text(p).is_none());

        if any_binary {
            emit_line!(self.w, "import base64")?;
        }
        if zip {
            emit_line!(self.w, "import io")?;
        }
        if any_xml {
            emit_line!(self.w, "import xml.etree.ElementTree as ET")?;
        }
        if zip {
            emit_line!(self.w, "import zipfile")?;
        }
        if any_xml {
            self.w.blank();
            emit_line!(self.w, "XML_DECLARATION = {}", lit(XML_DECLARATION))?;
        }
        self.w.blank();
        self.w.blank();
        Ok(())
    }

    fn zip_entry(&mut self, membername: &str, data_expr: &str) -> Result<(), EmitError> {
        emit_line!(self.w, "package.writestr({}, {data_expr})", lit(membername))?;
        Ok(())
    }

    fn part_content_fn(&mut self, name: &str, part: &'a Part) -> Result<(), EmitError> {
        emit_line!(self.w, "def {name}():")?;
        self.w.indent();
        emit_line!(
            self.w,
            "\"\"\"{} ({}, {})\"\"\"",
            part.partname(),
            part.type_name(),
            part.content_type()
        )?;
        if let Some(root) = part.root() {
            let build = self.element_fn_name(root);
            emit_line!(
                self.w,
                "return (XML_DECLARATION + ET.tostring({build}(), encoding=\"unicode\")).encode(\"utf-8\")"
            )?;
            self.pending.push((build, root));
        } else if let Some(text) = part_text(part) {
            emit_line!(self.w, "return {}.encode(\"utf-8\")", lit(text))?;
        } else {
            emit_line!(self.w, "return base64.b64decode({})", lit(&STANDARD.encode(part.blob())))?;
        }
        self.w.dedent();
        Ok(())
    }

    fn flush_pending(&mut self) -> Result<(), EmitError> {
        let pending = std::mem::take(&mut self.pending);
        for (name, element) in pending {
            self.w.blank();
            self.w.blank();
            self.element_fn(&name, element)?;
        }
        Ok(())
    }

    fn element_fn_name(&mut self, element: &XmlElement) -> String {
        self.items
            .allocate(&format!("build_{}", element.local_name()))
    }

    fn element_fn(&mut self, name: &str, element: &XmlElement) -> Result<(), EmitError> {
        emit_line!(self.w, "def {name}():")?;
        self.w.indent();
        emit_line!(self.w, "\"\"\"Rebuild <{}>.\"\"\"", element.name())?;
        let mut locals = IdentAllocator::new(Keywords::Python);
        let var = locals.allocate(element.local_name());
        emit_line!(self.w, "{var} = ET.Element({})", lit(element.name()))?;
        self.element_body(&var, element, &mut locals)?;
        emit_line!(self.w, "return {var}")?;
        self.w.dedent();
        Ok(())
    }

    /// Attributes and content of `element`, already bound to `var`.
    fn element_body(&mut self, var: &str, element: &XmlElement, locals: &mut IdentAllocator) -> Result<(), EmitError> {
        for (key, value) in element.attributes() {
            emit_line!(self.w, "{var}.set({}, {})", lit(key), lit(value))?;
        }

        // Most recent child node, which owns any following text as its tail
        let mut last: Option<String> = None;
        for child in element.children() {
            match child {
                XmlNode::Element(e) => {
                    let child_var = locals.allocate(e.local_name());
                    emit_line!(self.w, "{child_var} = ET.SubElement({var}, {})", lit(e.name()))?;
                    self.element_body(&child_var, e, locals)?;
                    last = Some(child_var);
                },
                XmlNode::Text(text) => match &last {
                    Some(prev) => emit_line!(self.w, "{prev}.tail = {}", lit(text))?,
                    None => emit_line!(self.w, "{var}.text = {}", lit(text))?,
                },
                XmlNode::Comment(comment) => {
                    let child_var = locals.allocate("comment");
                    emit_line!(self.w, "{child_var} = ET.Comment({})", lit(comment))?;
                    emit_line!(self.w, "{var}.append({child_var})")?;
                    last = Some(child_var);
                },
                XmlNode::ProcessingInstruction(pi) => {
                    let child_var = locals.allocate("pi");
                    let (target, data) = pi.split_once(char::is_whitespace).unwrap_or((pi.as_str(), ""));
                    emit_line!(
                        self.w,
                        "{child_var} = ET.ProcessingInstruction({}, {})",
                        lit(target),
                        lit(data.trim_start())
                    )?;
                    emit_line!(self.w, "{var}.append({child_var})")?;
                    last = Some(child_var);
                },
            }
        }
        Ok(())
    }
}

/// Python string literal for `s`.
fn lit(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c == '\u{7f}' => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            },
            c if c.is_control() || c == '\u{2028}' || c == '\u{2029}' => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            },
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::parse_fragment;
    use crate::test_support;

    fn emit(target: EmitTarget<'_>) -> String {
        PythonEmitter::new().emit(&target).unwrap()
    }

    #[test]
    fn test_element_code() {
        let p = parse_fragment(r#"<w:p xmlns:w="urn:w">Hi <w:r>there</w:r>!<!--c--><?pi data?></w:p>"#).unwrap();
        let code = emit(EmitTarget::Element(&p));
        assert_eq!(
            code,
            r#"import xml.etree.ElementTree as ET


def build_p():
    """Rebuild <w:p>."""
    p = ET.Element("w:p")
    p.set("xmlns:w", "urn:w")
    p.text = "Hi "
    r = ET.SubElement(p, "w:r")
    r.text = "there"
    r.tail = "!"
    comment = ET.Comment("c")
    p.append(comment)
    pi = ET.ProcessingInstruction("pi", "data")
    p.append(pi)
    return p
"#
        );
    }

    #[test]
    fn test_keyword_names_are_escaped() {
        let e = parse_fragment("<class><import/></class>").unwrap();
        let code = emit(EmitTarget::Element(&e));
        assert!(code.contains("class_ = ET.Element(\"class\")"));
        assert!(code.contains("import_ = ET.SubElement(class_, \"import\")"));
    }

    #[test]
    fn test_string_literals() {
        assert_eq!(lit("a\"b\\c\n"), r#""a\"b\\c\n""#);
        assert_eq!(lit("\u{1}é"), "\"\\x01é\"");
    }

    #[test]
    fn test_package_code() {
        let pkg = OpcPackage::from_bytes(&test_support::wordprocessing()).unwrap();
        let code = emit(EmitTarget::Package(&pkg));
        assert!(code.starts_with("import base64\nimport io\nimport xml.etree.ElementTree as ET\nimport zipfile\n"));
        assert!(code.contains("def build_package():"));
        assert!(code.contains(r#"package.writestr("word/document.xml", document_part())"#));
        assert!(code.contains(r#"package.writestr("word/_rels/document.xml.rels", "#));
        assert!(code.contains("return base64.b64decode("));
        assert!(code.contains("def build_document():"));
        assert_eq!(code, emit(EmitTarget::Package(&pkg)));
    }

    #[test]
    fn test_part_code() {
        let pkg = OpcPackage::from_bytes(&test_support::spreadsheet()).unwrap();
        let id = pkg.part_id("/xl/workbook.xml").unwrap();
        let part = pkg.part(id).unwrap();
        let code = emit(EmitTarget::Part { package: &pkg, part });
        assert!(code.contains("def workbook_part():"));
        assert!(code.contains("def workbook_part_rels():"));
        assert!(code.contains("sheet = ET.SubElement(sheets, \"sheet\")"));
        assert!(!code.contains("import zipfile"));
    }
}
