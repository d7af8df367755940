//! # atomic-lint-ts
//!
//! Tree-sitter front-end for atomic-lint.
//!
//! [`TsxExtractor`] implements [`atomic_lint_core::SourceParser`] for
//! TypeScript, TSX, JavaScript and JSX. It reports every call expression
//! with its callee shape, every `import ... from` declaration, and the
//! first top-level statement. Nothing else about the syntax tree reaches
//! the rules.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod tsx;

pub use tsx::TsxExtractor;
