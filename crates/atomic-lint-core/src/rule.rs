//! Rule trait for defining lint rules.

use thiserror::Error;

use crate::context::{FileContext, ProjectContext};
use crate::options::OptionsError;
use crate::pattern::PatternError;
use crate::types::{Severity, Violation};

/// Errors raised while building or preparing a rule.
#[derive(Debug, Error)]
pub enum RuleError {
    /// A regex could not be compiled.
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// A merged option is invalid.
    #[error(transparent)]
    Options(#[from] OptionsError),

    /// The rule's configuration table could not be read.
    #[error("invalid configuration for rule `{rule}`: {message}")]
    Config {
        /// Rule name.
        rule: String,
        /// Deserializer message.
        message: String,
    },
}

/// A per-file lint rule over extracted calls and imports.
///
/// Rules own their state (compiled patterns, keyword indexes) and are
/// checked sequentially, so `check` takes `&mut self`.
///
/// # Example
///
/// ```ignore
/// use atomic_lint_core::{FileContext, Location, Rule, Severity, Violation};
///
/// pub struct NoEval;
///
/// impl Rule for NoEval {
///     fn name(&self) -> &'static str { "no-eval" }
///     fn code(&self) -> &'static str { "X001" }
///
///     fn check(&mut self, ctx: &FileContext) -> Vec<Violation> {
///         ctx.parsed
///             .calls
///             .iter()
///             .filter(|c| c.callee.name() == Some("eval"))
///             .map(|c| Violation::new(
///                 self.code(),
///                 self.name(),
///                 self.default_severity(),
///                 Location::from_span(ctx.relative_path.clone(), c.span),
///                 "eval is not allowed",
///             ))
///             .collect()
///     }
/// }
/// ```
pub trait Rule: Send {
    /// Returns the kebab-case name of this rule (e.g., "deny-local-state").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "ATM002").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &str {
        ""
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Runs once before the first file is checked.
    ///
    /// Must-use rules build their keyword index here; the call blocks
    /// until every candidate file has been read.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] if preparation fails.
    fn prepare(&mut self, _project: &ProjectContext) -> Result<(), RuleError> {
        Ok(())
    }

    /// Checks a single file and returns any violations found.
    fn check(&mut self, ctx: &FileContext) -> Vec<Violation>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;
