//! Extracted source facts consumed by rules.
//!
//! Rules never walk syntax trees themselves. A [`SourceParser`] turns file
//! text into a [`ParsedSource`]: the call expressions and import
//! declarations of the file, each with its position.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Position of a syntax node in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Byte offset from the start of the file.
    pub offset: usize,
    /// Length in bytes.
    pub length: usize,
}

impl Span {
    /// Creates a span.
    #[must_use]
    pub fn new(line: usize, column: usize, offset: usize, length: usize) -> Self {
        Self {
            line,
            column,
            offset,
            length,
        }
    }
}

/// The syntactic shape of a call's callee.
///
/// Only two shapes carry a name. For a member call the receiver is dropped
/// on purpose: `React.useState()` and `store.useState()` both resolve to
/// `useState`. Renamed imports are not followed either.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callee {
    /// `f()`
    Bare(String),
    /// `obj.f()`, holding the property name only.
    Member(String),
    /// Anything else: `obj["f"]()`, `f()()`, dynamic `import()`.
    Unresolved,
}

impl Callee {
    /// The name a denylist is compared against, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Bare(name) | Self::Member(name) => Some(name),
            Self::Unresolved => None,
        }
    }
}

/// A single call expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    /// Callee shape.
    pub callee: Callee,
    /// Position of the whole call expression.
    pub span: Span,
}

impl CallSite {
    /// Creates a call site.
    #[must_use]
    pub fn new(callee: Callee, span: Span) -> Self {
        Self { callee, span }
    }
}

/// A single `import ... from "source"` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSite {
    /// Module specifier without quotes (e.g. `../organisms/Header`).
    pub source: String,
    /// Position of the import declaration.
    pub span: Span,
}

impl ImportSite {
    /// Creates an import site.
    #[must_use]
    pub fn new(source: impl Into<String>, span: Span) -> Self {
        Self {
            source: source.into(),
            span,
        }
    }
}

/// Everything rules need to know about one file's syntax.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSource {
    /// Call expressions in source order.
    pub calls: Vec<CallSite>,
    /// Import declarations in source order.
    pub imports: Vec<ImportSite>,
    /// First top-level statement, if the file has one.
    pub first_statement: Option<Span>,
}

/// Error produced by a [`SourceParser`].
#[derive(Debug, Error)]
#[error("failed to parse {path}: {message}")]
pub struct ParseError {
    /// File that failed to parse.
    pub path: PathBuf,
    /// Parser message.
    pub message: String,
}

/// Turns source text into a [`ParsedSource`].
///
/// Implemented by language front-ends (see `atomic-lint-ts`).
pub trait SourceParser {
    /// File extensions this parser handles, without the dot (e.g. `"tsx"`).
    fn extensions(&self) -> &'static [&'static str];

    /// Extracts calls and imports from `source`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the text cannot be parsed at all.
    fn parse(&mut self, path: &Path, source: &str) -> Result<ParsedSource, ParseError>;
}
