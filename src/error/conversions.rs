//! Conversions from layer errors to the unified [`Error`].

use super::types::Error;
use crate::opc::OpcError;

impl From<OpcError> for Error {
    fn from(err: OpcError) -> Self {
        match err {
            // Part markup is reported as such, not as a container failure
            OpcError::Markup { source, .. } => Error::MalformedMarkup(source),
            other => Error::ContainerOpenFailure(other),
        }
    }
}
