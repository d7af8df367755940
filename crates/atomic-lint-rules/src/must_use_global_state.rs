//! Rule requiring every organism directory to use global state somewhere.
//!
//! Works like `must-use-local-state`, over `organisms` and a global-state
//! vocabulary.

use atomic_lint_core::{
    FileContext, Locale, Location, MustUseOptions, MustUseOverrides, MustUsePolicy,
    ProjectContext, Rule, RuleError, Severity, Verdict, Violation,
};

/// Rule code for must-use-global-state.
pub const CODE: &str = "ATM005";

/// Rule name for must-use-global-state.
pub const NAME: &str = "must-use-global-state";

/// Documentation for organisms.
pub const DOC_URL: &str = "https://zenn.dev/takepepe/articles/atomic-redesign#organisms";

/// Built-in options.
#[must_use]
pub fn default_options() -> MustUseOptions {
    MustUseOptions {
        check_directories: vec!["./src/components/organisms/*/".to_string()],
        check_files_in_directory: vec!["./src/components/organisms/**/*.ts*".to_string()],
        exclude_file_patterns: vec![r".*\.test.*".to_string(), r".*\.stories.*".to_string()],
        keywords: [
            "fetch",
            "XMLHttpRequest",
            "useSWR",
            "useContext",
            "createContext",
            "useSelector",
            "useStore",
            "ConfirmContainerWindowConsumer",
        ]
        .map(String::from)
        .to_vec(),
    }
}

/// Requires each organism directory to touch global state.
#[derive(Debug)]
pub struct MustUseGlobalState {
    /// Severity level.
    pub severity: Severity,
    /// Message language.
    pub locale: Locale,
    policy: MustUsePolicy,
}

impl Default for MustUseGlobalState {
    fn default() -> Self {
        Self::new()
    }
}

impl MustUseGlobalState {
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

impl Rule for MustUseGlobalState {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &str {
        self.locale.select(
            "Organisms component must have Global States (fetch, useContext, useSWR, useSelector, etc.).",
            "OrganismsコンポーネントはGlobal State（fetch、useContext、useSWR、useSelectorなど）を持つ必要があります。",
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
            "Organisms must have Global States (fetch, useContext, useSWR, useSelector, etc.).",
            "OrganismsはGlobal State（fetch、useContext、useSWR、useSelectorなど）を持つ必要があります。",
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
