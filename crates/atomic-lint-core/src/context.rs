//! Context types for rule execution.

use std::path::{Path, PathBuf};

use crate::source::{ParsedSource, Span};

/// Context provided to per-file rules.
///
/// `content` is the text the host currently has for the file. It may differ
/// from what is on disk (an unsaved editor buffer, for instance).
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    /// Absolute path to the file.
    pub path: &'a Path,
    /// Current file contents.
    pub content: &'a str,
    /// Calls and imports extracted from `content`.
    pub parsed: &'a ParsedSource,
    /// Path relative to the project root.
    pub relative_path: PathBuf,
}

impl<'a> FileContext<'a> {
    /// Creates a new file context.
    #[must_use]
    pub fn new(path: &'a Path, content: &'a str, parsed: &'a ParsedSource, root: &Path) -> Self {
        let relative_path = path
            .strip_prefix(root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf);

        Self {
            path,
            content,
            parsed,
            relative_path,
        }
    }

    /// Span used for file-level findings: the first top-level statement, or
    /// the start of the file when it has none.
    #[must_use]
    pub fn file_span(&self) -> Span {
        self.parsed
            .first_statement
            .unwrap_or_else(|| Span::new(1, 1, 0, 0))
    }
}

/// Context provided to rules before the per-file pass.
///
/// Must-use rules resolve their directory and file globs against `root`.
#[derive(Debug, Clone)]
pub struct ProjectContext<'a> {
    /// Root directory of the project.
    pub root: &'a Path,
}

impl<'a> ProjectContext<'a> {
    /// Creates a new project context.
    #[must_use]
    pub fn new(root: &'a Path) -> Self {
        Self { root }
    }
}
