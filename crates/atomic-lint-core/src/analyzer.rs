//! Core analyzer for orchestrating lint execution.

use crate::config::Config;
use crate::context::{FileContext, ProjectContext};
use crate::rule::{Rule, RuleBox, RuleError};
use crate::source::{ParseError, SourceParser};
use crate::types::{LintResult, Violation};

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error reading files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error walking the project tree.
    #[error("Failed to walk project: {0}")]
    Walk(#[from] ignore::Error),

    /// Error parsing a source file.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// A rule failed to prepare.
    #[error("Rule `{rule}` failed to prepare: {source}")]
    Rule {
        /// Rule name.
        rule: String,
        /// Underlying error.
        #[source]
        source: RuleError,
    },

    /// No source parser was configured.
    #[error("No source parser configured")]
    MissingParser,

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    rules: Vec<RuleBox>,
    parser: Option<Box<dyn SourceParser>>,
    exclude_patterns: Vec<String>,
    extensions: Vec<String>,
    config: Option<Config>,
    fail_on_parse_error: bool,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds multiple boxed rules.
    #[must_use]
    pub fn rules(mut self, rules: impl IntoIterator<Item = RuleBox>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Sets the parser that extracts calls and imports.
    #[must_use]
    pub fn parser<P: SourceParser + 'static>(mut self, parser: P) -> Self {
        self.parser = Some(Box::new(parser));
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Restricts discovery to these extensions (without the dot).
    #[must_use]
    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions
            .extend(extensions.into_iter().map(Into::into));
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets whether to fail on parse errors (default: false).
    #[must_use]
    pub fn fail_on_parse_error(mut self, fail: bool) -> Self {
        self.fail_on_parse_error = fail;
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if no parser was set, the current directory cannot
    /// be read, or an exclude glob is invalid.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let parser = self.parser.ok_or(AnalyzerError::MissingParser)?;

        let root = self
            .root
            .or_else(|| self.config.as_ref().map(|c| c.analyzer.root.clone()))
            .unwrap_or_else(|| PathBuf::from("."));

        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };
        let root = normalize(root);

        let mut exclude_patterns = self.exclude_patterns;
        if let Some(ref config) = self.config {
            exclude_patterns.extend(config.analyzer.exclude.clone());
        }
        if exclude_patterns.is_empty() {
            exclude_patterns.extend(["**/node_modules/**".to_string(), "**/dist/**".to_string()]);
        }
        let exclude_patterns = exclude_patterns
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        let extensions = if !self.extensions.is_empty() {
            self.extensions
        } else if let Some(ref config) = self.config {
            config.analyzer.extensions.clone()
        } else {
            parser.extensions().iter().map(|e| (*e).to_string()).collect()
        };

        Ok(Analyzer {
            root,
            rules: self.rules,
            parser,
            exclude_patterns,
            extensions,
            config: self.config.unwrap_or_default(),
            fail_on_parse_error: self.fail_on_parse_error,
            prepared: false,
        })
    }
}

/// The main analyzer that orchestrates lint execution.
///
/// Use [`Analyzer::builder()`] to construct an instance. Rules are prepared
/// once, on the first call to [`Analyzer::analyze`] or
/// [`Analyzer::analyze_source`], and keep their state between calls.
pub struct Analyzer {
    root: PathBuf,
    rules: Vec<RuleBox>,
    parser: Box<dyn SourceParser>,
    exclude_patterns: Vec<glob::Pattern>,
    extensions: Vec<String>,
    config: Config,
    fail_on_parse_error: bool,
    prepared: bool,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root directory being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Analyzes all files and returns the results.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery or rule preparation fails, or a
    /// file fails to parse while `fail_on_parse_error` is set.
    pub fn analyze(&mut self) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis at {:?}", self.root);

        let files = self.discover_files()?;
        info!("Found {} files to analyze", files.len());

        self.prepare()?;

        let mut result = LintResult::new();
        for file_path in &files {
            let content = match std::fs::read(file_path) {
                Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Err(e) => {
                    warn!("Failed to read {}: {}", file_path.display(), e);
                    continue;
                }
            };

            match self.check_text(file_path, &content) {
                Ok(violations) => {
                    result.violations.extend(violations);
                    result.files_checked += 1;
                }
                Err(AnalyzerError::Parse(e)) if !self.fail_on_parse_error => {
                    warn!("{e}");
                }
                Err(e) => return Err(e),
            }
        }

        result.sort();

        info!(
            "Analysis complete: {} violations in {} files",
            result.violations.len(),
            result.files_checked
        );

        Ok(result)
    }

    /// Checks one file using `text` instead of its on-disk content.
    ///
    /// Relative paths resolve against the root. Must-use rules refresh the
    /// file's keyword entry from `text` before judging its directory.
    ///
    /// # Errors
    ///
    /// Returns an error if rule preparation fails or the text cannot be
    /// parsed.
    pub fn analyze_source(
        &mut self,
        path: &Path,
        text: &str,
    ) -> Result<LintResult, AnalyzerError> {
        let path = if path.is_absolute() {
            normalize(path.to_path_buf())
        } else {
            normalize(self.root.join(path))
        };

        self.prepare()?;

        let mut result = LintResult::new();
        result.violations = self.check_text(&path, text)?;
        result.files_checked = 1;
        result.sort();
        Ok(result)
    }

    /// Prepares every enabled rule, once.
    fn prepare(&mut self) -> Result<(), AnalyzerError> {
        if self.prepared {
            return Ok(());
        }

        let project_ctx = ProjectContext::new(&self.root);
        for rule in &mut self.rules {
            if !self.config.is_rule_enabled(rule.name()) {
                continue;
            }
            debug!("Preparing rule: {}", rule.name());
            rule.prepare(&project_ctx)
                .map_err(|source| AnalyzerError::Rule {
                    rule: rule.name().to_string(),
                    source,
                })?;
        }

        self.prepared = true;
        Ok(())
    }

    /// Parses `content` and runs every enabled rule over it.
    fn check_text(&mut self, path: &Path, content: &str) -> Result<Vec<Violation>, AnalyzerError> {
        debug!("Analyzing: {}", path.display());

        let parsed = self.parser.parse(path, content)?;
        let ctx = FileContext::new(path, content, &parsed, &self.root);
        let mut violations = Vec::new();

        for rule in &mut self.rules {
            if !self.config.is_rule_enabled(rule.name()) {
                debug!("Skipping disabled rule: {}", rule.name());
                continue;
            }

            let mut rule_violations = rule.check(&ctx);
            if let Some(severity) = self.config.rule_severity(rule.name()) {
                for v in &mut rule_violations {
                    v.severity = severity;
                }
            }
            violations.extend(rule_violations);
        }

        Ok(violations)
    }

    /// Discovers all source files to analyze.
    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        let mut builder = ignore::WalkBuilder::new(&self.root);
        builder
            .hidden(false)
            .git_ignore(self.config.analyzer.respect_gitignore)
            .require_git(false);

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = entry?;
            let path = entry.path();

            if !path.is_file() || !self.has_supported_extension(path) {
                continue;
            }

            if self.should_exclude(path) {
                debug!("Excluding: {}", path.display());
                continue;
            }

            files.push(path.to_path_buf());
        }

        files.sort();
        Ok(files)
    }

    fn has_supported_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }

    /// Checks if a path should be excluded, by absolute or root-relative path.
    fn should_exclude(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        self.exclude_patterns
            .iter()
            .any(|p| p.matches_path(path) || p.matches_path(relative))
    }
}

/// Resolves `..`, `.` and symlinks so the root and every file path share one
/// spelling. Paths that do not exist yet are kept as given.
fn normalize(path: PathBuf) -> PathBuf {
    std::fs::canonicalize(&path).unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{Callee, CallSite, ParsedSource, Span};
    use crate::types::{Location, Severity};
    use std::fs;
    use tempfile::TempDir;

    /// Treats every `name(` occurrence as a bare call, one per line.
    struct LineParser;

    impl SourceParser for LineParser {
        fn extensions(&self) -> &'static [&'static str] {
            &["tsx"]
        }

        fn parse(&mut self, path: &Path, source: &str) -> Result<ParsedSource, ParseError> {
            if source.contains("<<<") {
                return Err(ParseError {
                    path: path.to_path_buf(),
                    message: "conflict marker".into(),
                });
            }
            let calls = source
                .lines()
                .enumerate()
                .filter_map(|(i, line)| {
                    let name = line.trim().strip_suffix("()")?;
                    Some(CallSite::new(
                        Callee::Bare(name.to_string()),
                        Span::new(i + 1, 1, 0, 0),
                    ))
                })
                .collect();
            Ok(ParsedSource {
                calls,
                ..ParsedSource::default()
            })
        }
    }

    struct NoFetch {
        prepared: usize,
    }

    impl Rule for NoFetch {
        fn name(&self) -> &'static str {
            "no-fetch"
        }
        fn code(&self) -> &'static str {
            "T001"
        }
        fn prepare(&mut self, _project: &ProjectContext) -> Result<(), RuleError> {
            self.prepared += 1;
            Ok(())
        }
        fn check(&mut self, ctx: &FileContext) -> Vec<Violation> {
            ctx.parsed
                .calls
                .iter()
                .filter(|c| c.callee.name() == Some("fetch"))
                .map(|c| {
                    Violation::new(
                        self.code(),
                        self.name(),
                        self.default_severity(),
                        Location::from_span(ctx.relative_path.clone(), c.span),
                        "no fetch",
                    )
                })
                .collect()
        }
    }

    fn project() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let write = |rel: &str, content: &str| {
            let p = tmp.path().join(rel);
            fs::create_dir_all(p.parent().unwrap()).unwrap();
            fs::write(p, content).unwrap();
        };
        write("src/b.tsx", "fetch()\n");
        write("src/a.tsx", "render()\nfetch()\nfetch()\n");
        write("src/readme.md", "fetch()\n");
        write("node_modules/lib/index.tsx", "fetch()\n");
        tmp
    }

    #[test]
    fn test_builder_requires_parser() {
        assert!(matches!(
            Analyzer::builder().root(".").build(),
            Err(AnalyzerError::MissingParser)
        ));
    }

    #[test]
    fn test_exclude_patterns() {
        let analyzer = Analyzer::builder()
            .root("/foo")
            .parser(LineParser)
            .exclude("**/node_modules/**")
            .exclude("**/dist/**")
            .build()
            .expect("Failed to build analyzer");

        assert!(analyzer.should_exclude(Path::new("/foo/node_modules/react/index.tsx")));
        assert!(analyzer.should_exclude(Path::new("/foo/dist/main.tsx")));
        assert!(!analyzer.should_exclude(Path::new("/foo/src/App.tsx")));
    }

    #[test]
    fn analyze_discovers_checks_and_sorts() {
        let tmp = project();
        let mut analyzer = Analyzer::builder()
            .root(tmp.path())
            .parser(LineParser)
            .rule(NoFetch { prepared: 0 })
            .build()
            .unwrap();

        let result = analyzer.analyze().unwrap();
        assert_eq!(result.files_checked, 2);
        let positions: Vec<_> = result
            .violations
            .iter()
            .map(|v| (v.location.file.display().to_string(), v.location.line))
            .collect();
        assert_eq!(
            positions,
            vec![
                ("src/a.tsx".to_string(), 2),
                ("src/a.tsx".to_string(), 3),
                ("src/b.tsx".to_string(), 1)
            ]
        );
    }

    #[test]
    fn analyze_source_uses_live_text() {
        let tmp = project();
        let mut analyzer = Analyzer::builder()
            .root(tmp.path())
            .parser(LineParser)
            .rule(NoFetch { prepared: 0 })
            .build()
            .unwrap();

        let result = analyzer
            .analyze_source(Path::new("src/b.tsx"), "render()\n")
            .unwrap();
        assert!(result.violations.is_empty());
        assert_eq!(result.files_checked, 1);

        let result = analyzer
            .analyze_source(Path::new("src/new.tsx"), "x()\nfetch()\n")
            .unwrap();
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].location.line, 2);
    }

    #[test]
    fn config_disables_rules_and_overrides_severity() {
        let tmp = project();
        let config = Config::parse(
            r#"
[rules.no-fetch]
severity = "warning"
"#,
        )
        .unwrap();
        let mut analyzer = Analyzer::builder()
            .root(tmp.path())
            .parser(LineParser)
            .config(config)
            .rule(NoFetch { prepared: 0 })
            .build()
            .unwrap();
        let result = analyzer.analyze().unwrap();
        assert!(result
            .violations
            .iter()
            .all(|v| v.severity == Severity::Warning));

        let config = Config::parse("[rules.no-fetch]\nenabled = false\n").unwrap();
        let mut analyzer = Analyzer::builder()
            .root(tmp.path())
            .parser(LineParser)
            .config(config)
            .rule(NoFetch { prepared: 0 })
            .build()
            .unwrap();
        assert!(analyzer.analyze().unwrap().violations.is_empty());
    }

    #[test]
    fn parse_errors_are_skipped_unless_requested() {
        let tmp = project();
        fs::write(tmp.path().join("src/broken.tsx"), "<<<\n").unwrap();

        let mut lenient = Analyzer::builder()
            .root(tmp.path())
            .parser(LineParser)
            .rule(NoFetch { prepared: 0 })
            .build()
            .unwrap();
        assert_eq!(lenient.analyze().unwrap().files_checked, 2);

        let mut strict = Analyzer::builder()
            .root(tmp.path())
            .parser(LineParser)
            .fail_on_parse_error(true)
            .build()
            .unwrap();
        assert!(matches!(strict.analyze(), Err(AnalyzerError::Parse(_))));
    }
}
