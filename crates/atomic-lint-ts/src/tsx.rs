//! TypeScript / TSX extractor using Tree-sitter.

use std::path::Path;

use atomic_lint_core::{
    CallSite, Callee, ImportSite, ParseError, ParsedSource, SourceParser, Span,
};
use tracing::debug;
use tree_sitter::{Language, Node, Parser};

/// Grammar used for a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialect {
    /// Plain TypeScript, where `<T>x` is a type assertion.
    TypeScript,
    /// TSX, also used for `.js` and `.jsx`.
    Tsx,
}

impl Dialect {
    fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("ts" | "mts" | "cts") => Self::TypeScript,
            _ => Self::Tsx,
        }
    }

    fn language(self) -> Language {
        match self {
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

/// Extracts call expressions and import declarations from TS/TSX/JS source.
pub struct TsxExtractor {
    parser: Parser,
    dialect: Option<Dialect>,
}

impl TsxExtractor {
    /// Creates a new extractor.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parser: Parser::new(),
            dialect: None,
        }
    }

    fn text<'a>(node: &Node<'_>, src: &'a [u8]) -> &'a str {
        node.utf8_text(src).unwrap_or("")
    }

    fn span(node: &Node<'_>) -> Span {
        let start = node.start_position();
        Span::new(
            start.row + 1,
            start.column + 1,
            node.start_byte(),
            node.end_byte() - node.start_byte(),
        )
    }

    /// Callee shape of a `call_expression`.
    fn callee(node: &Node<'_>, src: &[u8]) -> Callee {
        let Some(function) = node.child_by_field_name("function") else {
            return Callee::Unresolved;
        };
        match function.kind() {
            "identifier" => Callee::Bare(Self::text(&function, src).to_owned()),
            "member_expression" => match function.child_by_field_name("property") {
                Some(p) if matches!(p.kind(), "property_identifier" | "private_property_identifier") => {
                    Callee::Member(Self::text(&p, src).to_owned())
                }
                _ => Callee::Unresolved,
            },
            _ => Callee::Unresolved,
        }
    }

    /// Tagged templates parse as calls but are not calls.
    fn is_tagged_template(node: &Node<'_>) -> bool {
        node.child_by_field_name("arguments")
            .is_some_and(|a| a.kind() == "template_string")
    }

    fn import_source(node: &Node<'_>, src: &[u8]) -> Option<String> {
        let source = node.child_by_field_name("source")?;
        let quoted = Self::text(&source, src);
        Some(quoted.trim_matches(|c| c == '"' || c == '\'').to_owned())
    }

    fn set_dialect(&mut self, path: &Path) -> Result<(), ParseError> {
        let dialect = Dialect::for_path(path);
        if self.dialect != Some(dialect) {
            self.parser
                .set_language(&dialect.language())
                .map_err(|e| ParseError {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
            self.dialect = Some(dialect);
        }
        Ok(())
    }
}

impl Default for TsxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceParser for TsxExtractor {
    fn extensions(&self) -> &'static [&'static str] {
        &["ts", "tsx", "js", "jsx"]
    }

    fn parse(&mut self, path: &Path, source: &str) -> Result<ParsedSource, ParseError> {
        self.set_dialect(path)?;

        let src = source.as_bytes();
        let tree = self.parser.parse(src, None).ok_or_else(|| ParseError {
            path: path.to_path_buf(),
            message: "parser returned no tree".to_string(),
        })?;
        let root = tree.root_node();
        if root.has_error() {
            debug!("{} has syntax errors, extracting what parsed", path.display());
        }

        let mut result = ParsedSource::default();

        let mut cursor = root.walk();
        result.first_statement = root
            .named_children(&mut cursor)
            .find(|n| !matches!(n.kind(), "comment" | "hash_bang_line"))
            .map(|n| Self::span(&n));

        // Pre-order walk keeps source order.
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            match node.kind() {
                "call_expression" if !Self::is_tagged_template(&node) => {
                    result
                        .calls
                        .push(CallSite::new(Self::callee(&node, src), Self::span(&node)));
                }
                "import_statement" => {
                    if let Some(source) = Self::import_source(&node, src) {
                        result.imports.push(ImportSite::new(source, Self::span(&node)));
                    }
                }
                _ => {}
            }

            let mut cursor = node.walk();
            let children: Vec<Node<'_>> = node.named_children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }

        Ok(result)
    }
}
