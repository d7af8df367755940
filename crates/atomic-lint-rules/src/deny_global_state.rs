//! Rule forbidding global state in atoms and molecules.
//!
//! # Rationale
//!
//! Data fetching and shared stores belong in organisms. Atoms and molecules
//! receive what they need through props.
//!
//! # Detected Patterns
//!
//! - `fetch()`, `XMLHttpRequest()`, `useSWR()`
//! - `useContext()`, `createContext()`, `useSelector()`, `useStore()`

use atomic_lint_core::{
    CallSiteDenier, DenyCallOptions, DenyCallOverrides, FileContext, Locale, Location, Rule,
    RuleError, Severity, Violation,
};
use tracing::warn;

/// Rule code for deny-global-state.
pub const CODE: &str = "ATM003";

/// Rule name for deny-global-state.
pub const NAME: &str = "deny-global-state";

/// Documentation for the layer definitions.
pub const DOC_URL: &str =
    "https://zenn.dev/takepepe/articles/atomic-redesign#%E5%8E%9F%E5%AD%90%E3%81%AE%E5%86%8D%E5%AE%9A%E7%BE%A9";

/// Built-in options.
#[must_use]
pub fn default_options() -> DenyCallOptions {
    DenyCallOptions {
        include_source_file_patterns: vec![
            r"\/atoms\/.*\.tsx".to_string(),
            r"\/molecules\/.*\.tsx".to_string(),
        ],
        exclude_source_file_patterns: vec![r"\.test".to_string(), r"\.stories".to_string()],
        deny_function_names: [
            "fetch",
            "XMLHttpRequest",
            "useSWR",
            "useContext",
            "createContext",
            "useSelector",
            "useStore",
        ]
        .map(String::from)
        .to_vec(),
    }
}

/// Forbids global state access in atoms and molecules.
#[derive(Debug)]
pub struct DenyGlobalState {
    /// Severity level.
    pub severity: Severity,
    /// Message language.
    pub locale: Locale,
    denier: CallSiteDenier,
}

impl Default for DenyGlobalState {
    fn default() -> Self {
        Self::new()
    }
}

impl DenyGlobalState {
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

/// Names the file's layer after the include pattern that selected it.
fn file_type(included_pattern: &str, locale: Locale) -> &'static str {
    if included_pattern.contains("atoms") {
        "atoms"
    } else if included_pattern.contains("molecules") {
        "molecules"
    } else {
        locale.select("This file", "このファイル")
    }
}

impl Rule for DenyGlobalState {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &str {
        self.locale.select(
            "Atoms and Molecules components should not use Global States (fetch, useContext, useSWR, useSelector, etc.).",
            "AtomsおよびMoleculesコンポーネントはGlobal State（fetch、useContext、useSWR、useSelectorなど）を使用するべきではありません。",
        )
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&mut self, ctx: &FileContext) -> Vec<Violation> {
        let (severity, locale) = (self.severity, self.locale);
        let hits = match self.denier.check_file(ctx) {
            Ok(hits) => hits,
            Err(e) => {
                warn!("{NAME}: skipping {}: {e}", ctx.path.display());
                return Vec::new();
            }
        };

        hits.into_iter()
            .map(|hit| {
                let kind = file_type(hit.included_pattern, locale);
                let message = match locale {
                    Locale::En => format!("{kind} cannot use {} (Global State).", hit.function_name),
                    Locale::Ja => format!("{kind}で{}（Global State）は使えません。", hit.function_name),
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
            .collect()
    }
}
