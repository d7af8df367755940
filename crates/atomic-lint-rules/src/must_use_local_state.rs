//! Rule requiring every molecule directory to use local state somewhere.
//!
//! # Rationale
//!
//! A molecule without any state is an atom in the wrong place.
//!
//! # How It Works
//!
//! Before the first file is checked, every file matching
//! `check_files_in_directory` is read and indexed by the directory (from
//! `check_directories`) that owns it. Checking a file then refreshes its
//! entry from the current text and fails when no file of the directory
//! mentions any keyword. Mentions in comments and strings count.

use atomic_lint_core::{
    FileContext, Locale, Location, MustUseOptions, MustUseOverrides, MustUsePolicy,
    ProjectContext, Rule, RuleError, Severity, Verdict, Violation,
};

/// Rule code for must-use-local-state.
pub const CODE: &str = "ATM004";

/// Rule name for must-use-local-state.
pub const NAME: &str = "must-use-local-state";

/// Documentation for molecules.
pub const DOC_URL: &str = "https://zenn.dev/takepepe/articles/atomic-redesign#molecules";

/// Built-in options.
#[must_use]
pub fn default_options() -> MustUseOptions {
    MustUseOptions {
        check_directories: vec!["./src/components/molecules/*/".to_string()],
        check_files_in_directory: vec!["./src/components/molecules/**/*.ts*".to_string()],
        exclude_file_patterns: vec![r".*\.test.*".to_string(), r".*\.stories.*".to_string()],
        keywords: ["setState", "useState", "useReducer"]
            .map(String::from)
            .to_vec(),
    }
}

/// Requires each molecule directory to hold local state.
#[derive(Debug)]
pub struct MustUseLocalState {
    /// Severity level.
    pub severity: Severity,
    /// Message language.
    pub locale: Locale,
    policy: MustUsePolicy,
}

impl Default for MustUseLocalState {
    fn default() -> Self {
        Self::new()
    }
}

impl MustUseLocalState {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Error,
            locale: Locale::default(),
            policy: MustUsePolicy::new(default_options()),
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

    /// Merges user overrides over the current options and validates them.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] if a merged regex or glob is invalid.
    pub fn configure(mut self, overrides: MustUseOverrides) -> Result<Self, RuleError> {
        let options = self.policy.options().clone().merge(overrides);
        self.policy = MustUsePolicy::validated(options)?;
        Ok(self)
    }

    /// The merged options.
    #[must_use]
    pub fn options(&self) -> &MustUseOptions {
        self.policy.options()
    }
}

impl Rule for MustUseLocalState {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &str {
        self.locale.select(
            "Molecules component must have Local States (setState, useState, useReducer, etc.).",
            "MoleculesコンポーネントはLocal State（setState、useState、useReducerなど）を持つ必要があります。",
        )
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn prepare(&mut self, project: &ProjectContext) -> Result<(), RuleError> {
        self.policy.ensure_initialized(project.root)?;
        Ok(())
    }

    fn check(&mut self, ctx: &FileContext) -> Vec<Violation> {
        if self.policy.evaluate(ctx.path, ctx.content) != Verdict::Fail {
            return Vec::new();
        }

        let message = self.locale.select(
            "Molecules must have Local States (setState, useState, useReducer, etc.).",
            "MoleculesはLocal State（setState、useState、useReducerなど）を持つ必要があります。",
        );
        vec![Violation::new(
            CODE,
            NAME,
            self.severity,
            Location::from_span(ctx.relative_path.clone(), ctx.file_span()),
            message,
        )
        .with_doc_ref(DOC_URL)]
    }
}
