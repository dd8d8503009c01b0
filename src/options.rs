//! Inspection options.

use crate::error::{Error, Result};
use crate::projection::emit::Language;
use crate::tree::AnnotationPolicy;
use serde::Deserialize;
use std::path::Path;

/// Options controlling how a document is opened and presented.
///
/// # Examples
///
/// ```rust
/// use ooxml_tree::{InspectOptions, Language};
///
/// let options = InspectOptions::new()
///     .with_default_language(Language::Python)
///     .with_max_part_size(Some(8 * 1024 * 1024))
///     .with_column_annotations(true);
///
/// let from_yaml = InspectOptions::from_yaml_str(
///     "default_language: python\nmax_part_size: 8388608\nannotate_columns: true\n",
/// )?;
/// assert_eq!(options, from_yaml);
/// # Ok::<(), ooxml_tree::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InspectOptions {
    /// Language used by [`Session::project_default_code`](crate::Session::project_default_code)
    pub default_language: Language,
    /// XML parts larger than this many bytes are listed without their elements
    pub max_part_size: Option<usize>,
    /// Whether `Column` elements show their `min`-`max` span
    pub annotate_columns: bool,
}

impl Default for InspectOptions {
    fn default() -> Self {
        Self {
            default_language: Language::Rust,
            max_part_size: None,
            annotate_columns: false,
        }
    }
}

impl InspectOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_default_language(mut self, language: Language) -> Self {
        self.default_language = language;
        self
    }

    /// Set the size above which XML parts are not expanded (`None` = no limit).
    #[inline]
    pub fn with_max_part_size(mut self, max: Option<usize>) -> Self {
        self.max_part_size = max;
        self
    }

    #[inline]
    pub fn with_column_annotations(mut self, enabled: bool) -> Self {
        self.annotate_columns = enabled;
        self
    }

    /// Parse options from YAML; missing keys keep their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_saphyr::from_str(yaml).map_err(|e| Error::Options(e.to_string()))
    }

    /// Read options from a YAML file.
    pub fn from_yaml_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Annotation policy implied by these options.
    pub fn annotation_policy(&self) -> AnnotationPolicy {
        let policy = AnnotationPolicy::default();
        if self.annotate_columns {
            policy.with_columns()
        } else {
            policy
        }
    }
}
