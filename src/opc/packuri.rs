/// Provides the PackURI value type used to name parts within an OPC package.
///
/// PackURIs always begin with a forward slash and use forward slashes as path
/// separators. Relationship targets are resolved against the source part's
/// directory to produce them.
use std::fmt;

/// The package pseudo-partname, representing the package itself
pub const PACKAGE_URI: &str = "/";

/// The URI for the [Content_Types].xml part
pub const CONTENT_TYPES_URI: &str = "/[Content_Types].xml";

/// A part name within an OPC package (e.g. `/xl/worksheets/sheet1.xml`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackURI {
    uri: String,
}

impl PackURI {
    /// Create a new PackURI; the string must begin with a forward slash.
    pub fn new<S: Into<String>>(uri: S) -> Result<Self, String> {
        let uri = uri.into();
        if !uri.starts_with('/') {
            return Err(format!("PackURI must begin with slash, got '{}'", uri));
        }
        Ok(PackURI { uri })
    }

    /// The package pseudo-partname `/`.
    pub fn package() -> Self {
        PackURI {
            uri: PACKAGE_URI.to_string(),
        }
    }

    /// Resolve a relationship target against the directory of its source.
    ///
    /// `("/word", "../customXml/item1.xml")` resolves to `/customXml/item1.xml`;
    /// a target that is already absolute is only normalized.
    pub fn from_rel_ref(base_uri: &str, relative_ref: &str) -> Result<Self, String> {
        let joined = if relative_ref.starts_with('/') {
            relative_ref.to_string()
        } else if base_uri.ends_with('/') {
            format!("{}{}", base_uri, relative_ref)
        } else {
            format!("{}/{}", base_uri, relative_ref)
        };
        Self::new(normalize_path(&joined))
    }

    /// Directory portion, e.g. `/ppt/slides` for `/ppt/slides/slide1.xml`.
    ///
    /// The package pseudo-partname and top-level parts report `/`.
    pub fn base_uri(&self) -> &str {
        match self.uri.rfind('/') {
            Some(0) | None => "/",
            Some(pos) => &self.uri[..pos],
        }
    }

    /// File name portion; empty for the package pseudo-partname.
    pub fn filename(&self) -> &str {
        match self.uri.rfind('/') {
            Some(pos) => &self.uri[pos + 1..],
            None => "",
        }
    }

    /// File name without its extension, e.g. `sheet1`.
    pub fn stem(&self) -> &str {
        let filename = self.filename();
        match filename.rfind('.') {
            Some(pos) if pos > 0 => &filename[..pos],
            _ => filename,
        }
    }

    /// Extension without the leading period, e.g. `xml`.
    pub fn ext(&self) -> &str {
        let filename = self.filename();
        match filename.rfind('.') {
            Some(pos) => &filename[pos + 1..],
            None => "",
        }
    }

    /// ZIP member name (leading slash stripped); empty for the package itself.
    pub fn membername(&self) -> &str {
        &self.uri[1..]
    }

    /// URI of the `.rels` part holding this part's relationships.
    ///
    /// `/word/_rels/document.xml.rels` for `/word/document.xml`, and
    /// `/_rels/.rels` for the package.
    pub fn rels_uri(&self) -> PackURI {
        let base_uri = self.base_uri();
        let uri = if base_uri == "/" {
            format!("/_rels/{}.rels", self.filename())
        } else {
            format!("{}/_rels/{}.rels", base_uri, self.filename())
        };
        PackURI { uri }
    }

    /// Case-insensitive lookup key (part names compare ignoring ASCII case).
    pub fn key(&self) -> String {
        self.uri.to_ascii_lowercase()
    }

    /// Get the full URI string.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.uri
    }
}

/// Resolve `.` and `..` segments and collapse repeated separators.
fn normalize_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {},
            ".." => {
                segments.pop();
            },
            other => segments.push(other),
        }
    }
    let mut out = String::with_capacity(path.len());
    for segment in segments {
        out.push('/');
        out.push_str(segment);
    }
    if out.is_empty() {
        out.push('/');
    }
    out
}

impl fmt::Display for PackURI {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

impl AsRef<str> for PackURI {
    fn as_ref(&self) -> &str {
        &self.uri
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packuri_new() {
        assert!(PackURI::new("/word/document.xml").is_ok());
        assert!(PackURI::new("word/document.xml").is_err());
    }

    #[test]
    fn test_components() {
        let uri = PackURI::new("/ppt/slides/slide1.xml").unwrap();
        assert_eq!(uri.base_uri(), "/ppt/slides");
        assert_eq!(uri.filename(), "slide1.xml");
        assert_eq!(uri.stem(), "slide1");
        assert_eq!(uri.ext(), "xml");
        assert_eq!(uri.membername(), "ppt/slides/slide1.xml");

        let top = PackURI::new("/[Content_Types].xml").unwrap();
        assert_eq!(top.base_uri(), "/");

        let root = PackURI::package();
        assert_eq!(root.base_uri(), "/");
        assert_eq!(root.filename(), "");
        assert_eq!(root.membername(), "");
    }

    #[test]
    fn test_from_rel_ref() {
        let uri = PackURI::from_rel_ref("/", "xl/workbook.xml").unwrap();
        assert_eq!(uri.as_str(), "/xl/workbook.xml");

        let uri = PackURI::from_rel_ref("/ppt/slides", "../slideLayouts/slideLayout1.xml").unwrap();
        assert_eq!(uri.as_str(), "/ppt/slideLayouts/slideLayout1.xml");

        let uri = PackURI::from_rel_ref("/xl", "/xl/./styles.xml").unwrap();
        assert_eq!(uri.as_str(), "/xl/styles.xml");
    }

    #[test]
    fn test_rels_uri() {
        let uri = PackURI::new("/word/document.xml").unwrap();
        assert_eq!(uri.rels_uri().as_str(), "/word/_rels/document.xml.rels");
        assert_eq!(PackURI::package().rels_uri().as_str(), "/_rels/.rels");
    }

    #[test]
    fn test_key_ignores_case() {
        let a = PackURI::new("/XL/Workbook.xml").unwrap();
        let b = PackURI::new("/xl/workbook.xml").unwrap();
        assert_eq!(a.key(), b.key());
    }
}
