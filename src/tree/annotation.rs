//! Header annotations for element nodes.
//!
//! Some element kinds carry a value worth showing next to their header: a
//! row's index, a cell's reference. The [`AnnotationPolicy`] maps an element
//! kind name to an extractor that reads that value from the element, so new
//! kinds can be annotated without touching the tree builder.

use crate::markup::XmlElement;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Scalar shown in brackets after an element header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    Index(u32),
    Text(String),
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Annotation::Index(i) => write!(f, "{i}"),
            Annotation::Text(s) => f.write_str(s),
        }
    }
}

/// Reads an annotation from an element of the registered kind.
pub type Extractor = Arc<dyn Fn(&XmlElement) -> Option<Annotation> + Send + Sync>;

/// Element kind name -> annotation extractor.
#[derive(Clone)]
pub struct AnnotationPolicy {
    extractors: HashMap<String, Extractor>,
}

impl AnnotationPolicy {
    /// A policy with no extractors; every header stays bare.
    pub fn empty() -> Self {
        Self {
            extractors: HashMap::new(),
        }
    }

    /// Add or replace the extractor for `kind`.
    pub fn register<F>(&mut self, kind: impl Into<String>, extractor: F) -> &mut Self
    where
        F: Fn(&XmlElement) -> Option<Annotation> + Send + Sync + 'static,
    {
        self.extractors.insert(kind.into(), Arc::new(extractor));
        self
    }

    /// Builder form of [`register`](Self::register).
    pub fn with<F>(mut self, kind: impl Into<String>, extractor: F) -> Self
    where
        F: Fn(&XmlElement) -> Option<Annotation> + Send + Sync + 'static,
    {
        self.register(kind, extractor);
        self
    }

    /// Remove the extractor for `kind`, if any.
    pub fn unregister(&mut self, kind: &str) -> bool {
        self.extractors.remove(kind).is_some()
    }

    pub fn is_registered(&self, kind: &str) -> bool {
        self.extractors.contains_key(kind)
    }

    /// Annotation for `element` of the given kind.
    ///
    /// Unregistered kinds and empty text values yield `None`.
    pub fn annotate(&self, kind: &str, element: &XmlElement) -> Option<Annotation> {
        let extractor = self.extractors.get(kind)?;
        match extractor(element)? {
            Annotation::Text(text) if text.is_empty() => None,
            annotation => Some(annotation),
        }
    }

    /// Registers the column span extractor (`min`-`max` of a `col`).
    pub fn with_columns(self) -> Self {
        self.with("Column", column_span)
    }
}

impl Default for AnnotationPolicy {
    /// `Row` shows its row index, `Cell` its cell reference.
    fn default() -> Self {
        Self::empty().with("Row", row_index).with("Cell", cell_reference)
    }
}

impl fmt::Debug for AnnotationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.extractors.keys().collect();
        kinds.sort();
        f.debug_struct("AnnotationPolicy")
            .field("kinds", &kinds)
            .finish()
    }
}

fn row_index(element: &XmlElement) -> Option<Annotation> {
    let r = element.attribute("r")?.trim();
    match r.parse::<u32>() {
        Ok(index) => Some(Annotation::Index(index)),
        Err(_) => Some(Annotation::Text(r.to_string())),
    }
}

fn cell_reference(element: &XmlElement) -> Option<Annotation> {
    element
        .attribute("r")
        .map(|r| Annotation::Text(r.to_string()))
}

fn column_span(element: &XmlElement) -> Option<Annotation> {
    let min = element.attribute("min").filter(|v| !v.is_empty())?;
    match element.attribute("max").filter(|v| !v.is_empty()) {
        Some(max) if max != min => Some(Annotation::Text(format!("{min}-{max}"))),
        _ => Some(Annotation::Text(min.to_string())),
    }
}
