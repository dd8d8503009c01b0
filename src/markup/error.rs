/// Error types for markup parsing
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarkupError {
    #[error("XML syntax error at byte {position}: {message}")]
    Syntax { position: u64, message: String },

    #[error("Document has no root element")]
    MissingRoot,

    #[error("Content found after the root element")]
    TrailingContent,

    #[error("Element <{0}> is never closed")]
    Unclosed(String),

    #[error("Elements nest deeper than {limit} levels")]
    TooDeep { limit: usize },

    #[error("Unknown entity reference: &{0};")]
    UnknownEntity(String),

    #[error("Attribute error: {0}")]
    Attr(String),

    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

pub type Result<T> = std::result::Result<T, MarkupError>;
