//! Shared helpers for source generation: an indenting line writer and a
//! deterministic identifier allocator.

use phf::phf_set;
use std::collections::HashMap;
use std::fmt::{self, Write};

static RUST_KEYWORDS: phf::Set<&'static str> = phf_set! {
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "match", "mod",
    "move", "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super",
    "trait", "true", "type", "unsafe", "use", "where", "while", "abstract", "become", "box",
    "do", "final", "macro", "override", "priv", "typeof", "unsized", "virtual", "yield", "try",
};

static PYTHON_KEYWORDS: phf::Set<&'static str> = phf_set! {
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise",
    "return", "try", "while", "with", "yield", "ET", "base64", "io", "zipfile",
};

/// Reserved-word set of a target language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keywords {
    Rust,
    Python,
}

impl Keywords {
    fn contains(self, ident: &str) -> bool {
        match self {
            Keywords::Rust => RUST_KEYWORDS.contains(ident),
            Keywords::Python => PYTHON_KEYWORDS.contains(ident),
        }
    }
}

/// Hands out unique snake_case identifiers.
///
/// The first request for a base name gets it verbatim, later ones get `_2`,
/// `_3`, ... appended, so the same request sequence always yields the same
/// names.
#[derive(Debug)]
pub struct IdentAllocator {
    keywords: Keywords,
    used: HashMap<String, usize>,
}

impl IdentAllocator {
    pub fn new(keywords: Keywords) -> Self {
        Self {
            keywords,
            used: HashMap::new(),
        }
    }

    /// Reserve an identifier without allocating it from a hint.
    pub fn reserve(&mut self, ident: &str) {
        self.used.entry(ident.to_string()).or_insert(1);
    }

    /// A fresh identifier derived from `hint`, e.g. `sheetData` -> `sheet_data`.
    pub fn allocate(&mut self, hint: &str) -> String {
        let mut base = snake_case(hint);
        if base.is_empty() {
            base.push_str("node");
        }
        if base.starts_with(|c: char| c.is_ascii_digit()) {
            base.insert(0, '_');
        }
        if self.keywords.contains(&base) {
            base.push('_');
        }

        let mut n = self.used.get(&base).copied().unwrap_or(0);
        loop {
            n += 1;
            if n == 1 {
                self.used.insert(base.clone(), 1);
                return base;
            }
            let ident = format!("{base}_{n}");
            if !self.used.contains_key(&ident) {
                self.used.insert(base, n);
                // Suffixed names must not collide with later plain hints
                self.used.insert(ident.clone(), 1);
                return ident;
            }
        }
    }
}

/// Convert a markup or file name to snake_case ASCII.
pub fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if ch.is_ascii_uppercase() {
                if prev_lower {
                    out.push('_');
                }
                out.push(ch.to_ascii_lowercase());
                prev_lower = false;
            } else {
                out.push(ch);
                prev_lower = true;
            }
        } else if !out.is_empty() && !out.ends_with('_') {
            out.push('_');
            prev_lower = false;
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}

/// Line-oriented source writer with a fixed indent unit.
#[derive(Debug)]
pub struct CodeWriter {
    out: String,
    unit: &'static str,
    depth: usize,
}

impl CodeWriter {
    pub fn new(unit: &'static str) -> Self {
        Self {
            out: String::new(),
            unit,
            depth: 0,
        }
    }

    /// Write one line at the current indentation.
    pub fn line(&mut self, args: fmt::Arguments<'_>) -> fmt::Result {
        for _ in 0..self.depth {
            self.out.push_str(self.unit);
        }
        self.out.write_fmt(args)?;
        self.out.push('\n');
        Ok(())
    }

    /// End the current block with an empty line; at most two in a row.
    pub fn blank(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with("\n\n\n") {
            self.out.push('\n');
        }
    }

    pub fn indent(&mut self) {
        self.depth += 1;
    }

    pub fn dedent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// The generated source, ending with exactly one newline.
    pub fn finish(mut self) -> String {
        while self.out.ends_with("\n\n") {
            self.out.pop();
        }
        self.out
    }
}

/// `writeln!`-style shorthand for [`CodeWriter::line`].
macro_rules! emit_line {
    ($w:expr) => {
        $w.line(format_args!(""))
    };
    ($w:expr, $($arg:tt)*) => {
        $w.line(format_args!($($arg)*))
    };
}

pub(crate) use emit_line;
