//! In-scope namespace tracking while walking an element tree.

use crate::markup::element::XmlElement;

/// Stack of namespace bindings visible at the current element.
///
/// Bindings are pushed per element with [`enter`](Self::enter) and dropped
/// with [`leave`](Self::leave) using the returned mark.
#[derive(Debug, Default, Clone)]
pub struct NamespaceScope {
    bindings: Vec<(Option<String>, String)>,
}

impl NamespaceScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push the declarations made on `element`; returns the mark to leave with.
    pub fn enter(&mut self, element: &XmlElement) -> usize {
        let mark = self.bindings.len();
        for (prefix, uri) in element.namespace_declarations() {
            self.bindings
                .push((prefix.map(str::to_string), uri.to_string()));
        }
        mark
    }

    /// Drop every binding pushed since `mark`.
    pub fn leave(&mut self, mark: usize) {
        self.bindings.truncate(mark);
    }

    /// Resolve a prefix (`None` for the default namespace).
    pub fn resolve(&self, prefix: Option<&str>) -> Option<&str> {
        if prefix == Some("xml") {
            return Some("http://www.w3.org/XML/1998/namespace");
        }
        self.bindings
            .iter()
            .rev()
            .find(|(p, _)| p.as_deref() == prefix)
            .map(|(_, uri)| uri.as_str())
    }

    /// Namespace URI of `element`, which must already have been entered.
    pub fn namespace_of(&self, element: &XmlElement) -> Option<&str> {
        self.resolve(element.prefix())
    }

    /// Visible bindings as `xmlns` attributes, outermost first.
    ///
    /// A prefix that is re-declared further in keeps only its innermost
    /// binding, placed at the position of its first declaration.
    pub fn as_declarations(&self) -> Vec<(String, String)> {
        let mut out: Vec<(String, String)> = Vec::new();
        for (prefix, uri) in &self.bindings {
            let attr = match prefix {
                Some(p) => format!("xmlns:{p}"),
                None => "xmlns".to_string(),
            };
            match out.iter_mut().find(|(k, _)| *k == attr) {
                Some(slot) => slot.1 = uri.clone(),
                None => out.push((attr, uri.clone())),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_leave_and_shadowing() {
        let outer = XmlElement::new("a")
            .with_attribute("xmlns", "urn:one")
            .with_attribute("xmlns:r", "urn:rels");
        let inner = XmlElement::new("b").with_attribute("xmlns", "urn:two");

        let mut scope = NamespaceScope::new();
        let outer_mark = scope.enter(&outer);
        assert_eq!(scope.resolve(None), Some("urn:one"));

        let inner_mark = scope.enter(&inner);
        assert_eq!(scope.namespace_of(&inner), Some("urn:two"));
        assert_eq!(scope.resolve(Some("r")), Some("urn:rels"));
        assert_eq!(
            scope.as_declarations(),
            vec![
                ("xmlns".to_string(), "urn:two".to_string()),
                ("xmlns:r".to_string(), "urn:rels".to_string()),
            ]
        );

        scope.leave(inner_mark);
        assert_eq!(scope.resolve(None), Some("urn:one"));
        scope.leave(outer_mark);
        assert_eq!(scope.resolve(None), None);
        assert!(scope.resolve(Some("xml")).is_some());
    }
}
