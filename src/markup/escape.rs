use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;

// Static initialization: automatons are built only once, thread-safe
static TEXT_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::new(["&", "<", ">"]).expect("Failed to build XML text escaper")
});

static ATTRIBUTE_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::new(["&", "<", "\"", "\n", "\r", "\t"])
        .expect("Failed to build XML attribute escaper")
});

/// Escape character data for use between tags.
///
/// # Examples
///
/// ```
/// use ooxml_tree::markup::escape_text;
/// assert_eq!(escape_text("a & b < c"), "a &amp; b &lt; c");
/// assert_eq!(escape_text("\"quoted\""), "\"quoted\"");
/// ```
#[inline]
pub fn escape_text(s: &str) -> String {
    TEXT_ESCAPER.replace_all(s, &["&amp;", "&lt;", "&gt;"])
}

/// Escape an attribute value for use inside double quotes.
///
/// Line breaks and tabs are written as character references so that a
/// re-parse returns the exact same value.
///
/// # Examples
///
/// ```
/// use ooxml_tree::markup::escape_attribute;
/// assert_eq!(escape_attribute("say \"hi\""), "say &quot;hi&quot;");
/// assert_eq!(escape_attribute("a\nb"), "a&#10;b");
/// ```
#[inline]
pub fn escape_attribute(s: &str) -> String {
    ATTRIBUTE_ESCAPER.replace_all(s, &["&amp;", "&lt;", "&quot;", "&#10;", "&#13;", "&#9;"])
}
