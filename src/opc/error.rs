/// Error types for OPC package operations
use crate::markup::MarkupError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OpcError {
    #[error("Invalid pack URI: {0}")]
    InvalidPackUri(String),

    #[error("Part not found: {0}")]
    PartNotFound(String),

    #[error("Invalid relationship: {0}")]
    InvalidRelationship(String),

    #[error("Content type not found for partname: {0}")]
    ContentTypeNotFound(String),

    #[error("XML parsing error: {0}")]
    XmlError(String),

    #[error("Malformed part markup in {partname}: {source}")]
    Markup {
        partname: String,
        #[source]
        source: MarkupError,
    },

    #[error("ZIP error: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Quick-XML error: {0}")]
    QuickXmlError(#[from] quick_xml::Error),

    #[error("Attribute error: {0}")]
    AttrError(String),
}

impl From<quick_xml::events::attributes::AttrError> for OpcError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        OpcError::AttrError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, OpcError>;
