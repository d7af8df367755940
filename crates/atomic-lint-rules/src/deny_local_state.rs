//! Rule forbidding local state in atoms.
//!
//! # Rationale
//!
//! Atoms are purely presentational. State belongs in molecules and above.
//!
//! # Detected Patterns
//!
//! - `useState()`, `useReducer()`, `this.setState()`
//! - Member calls match by property name: `React.useState()` is reported too.

use atomic_lint_core::{
    CallSiteDenier, DenyCallOptions, DenyCallOverrides, FileContext, Locale, Location, Rule,
    RuleError, Severity, Violation,
};
use tracing::warn;

/// Rule code for deny-local-state.
pub const CODE: &str = "ATM002";

/// Rule name for deny-local-state.
pub const NAME: &str = "deny-local-state";

/// Documentation for atoms.
pub const DOC_URL: &str = "https://zenn.dev/takepepe/articles/atomic-redesign#atoms";

/// Built-in options.
#[must_use]
pub fn default_options() -> DenyCallOptions {
    DenyCallOptions {
        include_source_file_patterns: vec![r".*\/atoms\/.*\.tsx".to_string()],
        exclude_source_file_patterns: vec![r".*\.test.*".to_string(), r".*\.stories.*".to_string()],
        deny_function_names: ["setState", "useState", "useReducer"]
            .map(String::from)
            .to_vec(),
    }
}

/// Forbids local state hooks in atoms.
#[derive(Debug)]
pub struct DenyLocalState {
    /// Severity level.
    pub severity: Severity,
    /// Message language.
    pub locale: Locale,
    denier: CallSiteDenier,
}

impl Default for DenyLocalState {
    fn default() -> Self {
        Self::new()
    }
}

impl DenyLocalState {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Error,
            locale: Locale::default(),
            denier: CallSiteDenier::new(default_options()),
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Sets the message language.
    #[must_use]
    pub fn locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Merges user overrides over the current options and compiles every
    /// pattern.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] if a merged pattern is invalid.
    pub fn configure(mut self, overrides: DenyCallOverrides) -> Result<Self, RuleError> {
        let options = self.denier.options().clone().merge(overrides);
        self.denier = CallSiteDenier::validated(options)?;
        Ok(self)
    }

    /// The merged options.
    #[must_use]
    pub fn options(&self) -> &DenyCallOptions {
        self.denier.options()
    }
}

impl Rule for DenyLocalState {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &str {
        self.locale.select(
            "Atoms components should not have Local States (setState, useState, useReducer, etc.).",
            "AtomsコンポーネントはLocal State（setState、useState、useReducerなど）を持つべきではありません。",
        )
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&mut self, ctx: &FileContext) -> Vec<Violation> {
        let (severity, locale) = (self.severity, self.locale);
        match self.denier.check_file(ctx) {
            Ok(hits) => hits
                .into_iter()
                .map(|hit| {
                    let message = match locale {
                        Locale::En => format!("Atoms cannot use {} (Local State).", hit.function_name),
                        Locale::Ja => format!("Atomsで{}（Local State）は使えません。", hit.function_name),
                    };
                    Violation::new(
                        CODE,
                        NAME,
                        severity,
                        Location::from_span(ctx.relative_path.clone(), hit.call.span),
                        message,
                    )
                    .with_doc_ref(DOC_URL)
                })
                .collect(),
            Err(e) => {
                warn!("{NAME}: skipping {}: {e}", ctx.path.display());
                Vec::new()
            }
        }
    }
}
