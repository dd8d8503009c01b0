//! Code emitters.
//!
//! An emitter turns the object behind a node (the whole package, one part,
//! or one element) into source code that rebuilds it. Output depends only
//! on the target, so emitting the same target twice gives the same text.

pub mod python;
pub mod rust;
pub mod writer;

use crate::markup::XmlElement;
use crate::opc::{OpcPackage, Part};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub use python::PythonEmitter;
pub use rust::RustEmitter;

/// Errors raised while generating code.
#[derive(Error, Debug)]
pub enum EmitError {
    #[error("Unsupported target: {0}")]
    Unsupported(String),

    #[error("Formatting error: {0}")]
    Fmt(#[from] fmt::Error),
}

/// Object handed to an emitter.
#[derive(Debug, Clone, Copy)]
pub enum EmitTarget<'a> {
    /// The whole package.
    Package(&'a OpcPackage),
    /// One part, with the package it belongs to.
    Part {
        package: &'a OpcPackage,
        part: &'a Part,
    },
    /// One element. Namespace declarations inherited from its ancestors
    /// are already present as attributes.
    Element(&'a XmlElement),
}

/// Source generator for one target language.
pub trait CodeEmitter {
    /// Language name used in error reports, e.g. `rust`.
    fn language(&self) -> &str;

    /// File extension of generated sources, without the period.
    fn file_extension(&self) -> &str;

    /// Generate source code that rebuilds `target`.
    fn emit(&self, target: &EmitTarget<'_>) -> Result<String, EmitError>;
}

/// Built-in target languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Rust,
    Python,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Rust, Language::Python];

    pub fn name(self) -> &'static str {
        match self {
            Language::Rust => "rust",
            Language::Python => "python",
        }
    }

    pub fn file_extension(self) -> &'static str {
        match self {
            Language::Rust => "rs",
            Language::Python => "py",
        }
    }

    /// The built-in emitter for this language.
    pub fn emitter(self) -> Box<dyn CodeEmitter + Send + Sync> {
        match self {
            Language::Rust => Box::new(RustEmitter::new()),
            Language::Python => Box::new(PythonEmitter::new()),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rust" | "rs" => Ok(Language::Rust),
            "python" | "py" => Ok(Language::Python),
            other => Err(format!("unknown language '{other}', expected rust or python")),
        }
    }
}

/// Part content as a single string literal payload, when it is text.
pub(crate) fn part_text(part: &Part) -> Option<&str> {
    if part.root().is_some() {
        return None;
    }
    std::str::from_utf8(part.blob()).ok()
}
