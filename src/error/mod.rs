//! Unified error types.
//!
//! Each layer (container, markup, emitters) has its own error enum; this
//! module folds them into the single [`Error`] returned by the session and
//! projection APIs.

pub mod conversions;
pub mod types;

pub use types::{Error, Result};
