//! # atomic-lint-core
//!
//! Core framework for atomic-design linting of component trees.
//!
//! This crate provides the building blocks the rules are made of:
//!
//! - [`KeywordIndex`] and [`MustUsePolicy`] for directory-wide "must use"
//!   checks
//! - [`CallSiteDenier`] for per-call denylists
//! - [`PatternMatcher`] for cached regex matching
//! - [`Rule`] trait, [`Analyzer`] and [`Violation`] for running rules
//!
//! Syntax extraction lives behind the [`SourceParser`] trait; rules only
//! see calls and imports.
//!
//! ## Example
//!
//! ```ignore
//! use atomic_lint_core::Analyzer;
//!
//! let mut analyzer = Analyzer::builder()
//!     .root(".")
//!     .parser(TsxExtractor::new())
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod context;
mod deny;
mod keyword_index;
mod layer;
mod locale;
mod options;
mod pattern;
mod policy;
mod rule;
mod source;
mod types;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig};
pub use context::{FileContext, ProjectContext};
pub use deny::{CallSiteDenier, DenyResult};
pub use keyword_index::{KeywordIndex, KeywordSet, ScanSummary};
pub use layer::{Layer, LayerPatternOverrides, LayerPatterns};
pub use locale::Locale;
pub use options::{
    DenyCallOptions, DenyCallOverrides, ImportDependencyOptions, ImportDependencyOverrides,
    MustUseOptions, MustUseOverrides, OptionsError,
};
pub use pattern::{PatternError, PatternMatcher};
pub use policy::{DirectoryPolicyEvaluator, MustUsePolicy, Verdict};
pub use rule::{Rule, RuleBox, RuleError};
pub use source::{CallSite, Callee, ImportSite, ParseError, ParsedSource, SourceParser, Span};
pub use types::{Location, LintResult, Severity, Violation, ViolationDiagnostic};
