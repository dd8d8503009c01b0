use crate::markup::MarkupError;
use crate::opc::OpcError;
use thiserror::Error;

/// Main error type for document inspection.
#[derive(Error, Debug)]
pub enum Error {
    /// None of the marker parts of a known document kind is present
    #[error("Unsupported document kind: no main document part found")]
    UnsupportedDocumentKind,

    /// The stream is unreadable or not a valid package
    #[error("Failed to open container: {0}")]
    ContainerOpenFailure(#[source] OpcError),

    /// Element markup could not be parsed
    #[error("Malformed markup: {0}")]
    MalformedMarkup(#[from] MarkupError),

    /// An emitter could not generate code
    #[error("Code generation failed for {language}: {reason}")]
    CodeGenerationFailure { language: String, reason: String },

    /// A node was projected after its session was closed
    #[error("Session is closed")]
    SessionClosed,

    /// A node does not belong to the open document
    #[error("Node does not resolve in the open document: {0}")]
    StaleNode(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Options could not be loaded
    #[error("Invalid options: {0}")]
    Options(String),
}

/// Result type for inspection operations.
pub type Result<T> = std::result::Result<T, Error>;
