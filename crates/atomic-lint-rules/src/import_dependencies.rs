//! Rule forbidding imports from higher atomic-design layers.
//!
//! # Rationale
//!
//! Each layer composes the ones below it. A molecule that imports an
//! organism, or a template that imports another template, inverts that
//! order.
//!
//! # Detected Patterns
//!
//! ```ignore
//! // src/components/molecules/SearchBox/index.tsx
//! import { Header } from "../../organisms/Header";
//! ```
//!
//! Source files are classified by `include_source_file_patterns`, import
//! specifiers by `import_patterns`. A file may match several layers; layers
//! are tried from atoms upward and the first forbidden import wins.

use atomic_lint_core::{
    FileContext, ImportDependencyOptions, ImportDependencyOverrides, ImportSite, Layer,
    LayerPatterns, Locale, Location, PatternError, PatternMatcher, Rule, RuleError, Severity,
    Violation,
};
use tracing::warn;

/// Rule code for import-dependencies.
pub const CODE: &str = "ATM001";

/// Rule name for import-dependencies.
pub const NAME: &str = "import-dependencies";

/// Documentation for the layer definitions.
pub const DOC_URL: &str =
    "https://zenn.dev/takepepe/articles/atomic-redesign#%E5%8E%9F%E5%AD%90%E3%81%AE%E5%86%8D%E5%AE%9A%E7%BE%A9";

/// Forbids importing components from a higher layer.
#[derive(Debug)]
pub struct ImportDependencies {
    /// Severity level.
    pub severity: Severity,
    /// Message language.
    pub locale: Locale,
    options: ImportDependencyOptions,
    matcher: PatternMatcher,
}

impl Default for ImportDependencies {
    fn default() -> Self {
        Self::new()
    }
}

/// Built-in options.
#[must_use]
pub fn default_options() -> ImportDependencyOptions {
    let per_layer = |suffix: &str| LayerPatterns {
        atoms: format!(r".*\/atoms\/.*{suffix}"),
        molecules: format!(r".*\/molecules\/.*{suffix}"),
        organisms: format!(r".*\/organisms\/.*{suffix}"),
        templates: format!(r".*\/templates\/.*{suffix}"),
    };
    ImportDependencyOptions {
        include_source_file_patterns: per_layer(r"\.tsx"),
        exclude_source_file_patterns: vec![r".*\.test.*".to_string(), r".*\.stories.*".to_string()],
        import_patterns: per_layer(""),
    }
}

impl ImportDependencies {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Error,
            locale: Locale::default(),
            options: default_options(),
            matcher: PatternMatcher::new(),
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
    pub fn configure(mut self, overrides: ImportDependencyOverrides) -> Result<Self, RuleError> {
        self.options = self.options.merge(overrides);
        self.options.validate(&mut self.matcher)?;
        Ok(self)
    }

    /// The merged options.
    #[must_use]
    pub fn options(&self) -> &ImportDependencyOptions {
        &self.options
    }

    /// Localized message for `source` importing `target`, or `None` when
    /// the import is allowed.
    fn forbidden_message(
        &mut self,
        path: &str,
        import: &ImportSite,
    ) -> Result<Option<String>, PatternError> {
        for source in Layer::ALL {
            if !self
                .matcher
                .test(path, self.options.include_source_file_patterns.get(source))?
            {
                continue;
            }
            for &target in source.forbidden_imports() {
                if self
                    .matcher
                    .test(&import.source, self.options.import_patterns.get(target))?
                {
                    return Ok(Some(self.message(source, target)));
                }
            }
        }
        Ok(None)
    }

    fn message(&self, source: Layer, target: Layer) -> String {
        if source == Layer::Templates && target == Layer::Templates {
            return self
                .locale
                .select(
                    "template cannot import other templates.",
                    "templateは他のtemplateをimportできません。",
                )
                .to_string();
        }
        match self.locale {
            Locale::En => format!("{source} cannot import {target}."),
            Locale::Ja => format!("{source}は{target}をimportできません。"),
        }
    }

    fn check_imports(&mut self, ctx: &FileContext) -> Result<Vec<Violation>, PatternError> {
        let path = ctx.path.to_string_lossy();
        if self
            .matcher
            .any_match(&path, &self.options.exclude_source_file_patterns)?
        {
            return Ok(Vec::new());
        }

        let mut violations = Vec::new();
        for import in &ctx.parsed.imports {
            if let Some(message) = self.forbidden_message(&path, import)? {
                violations.push(
                    Violation::new(
                        CODE,
                        NAME,
                        self.severity,
                        Location::from_span(ctx.relative_path.clone(), import.span),
                        message,
                    )
                    .with_doc_ref(DOC_URL),
                );
            }
        }
        Ok(violations)
    }
}

impl Rule for ImportDependencies {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &str {
        self.locale.select(
            "Detects each component importing a higher level component than itself.",
            "各コンポーネントは自身より上位のレベルのコンポーネントをimportできません。",
        )
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&mut self, ctx: &FileContext) -> Vec<Violation> {
        self.check_imports(ctx).unwrap_or_else(|e| {
            warn!("{NAME}: skipping {}: {e}", ctx.path.display());
            Vec::new()
        })
    }
}
