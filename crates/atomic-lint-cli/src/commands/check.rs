//! Check command implementation.

use anyhow::{Context, Result};
use atomic_lint_core::{Analyzer, LintResult, RuleBox};
use atomic_lint_rules::rules_from_config;
use atomic_lint_ts::TsxExtractor;
use std::io::Read;
use std::path::PathBuf;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Arguments of `atomic-lint check`.
#[derive(Debug)]
pub struct CheckArgs {
    /// Project root.
    pub path: PathBuf,
    /// Output format.
    pub format: OutputFormat,
    /// Comma-separated rule names or codes.
    pub rules_filter: Option<String>,
    /// Extra exclude globs.
    pub exclude: Vec<String>,
    /// File to check from stdin text.
    pub stdin_filename: Option<PathBuf>,
}

/// Runs the check command.
pub fn run(args: &CheckArgs, source: &ConfigSource) -> Result<()> {
    let config = source.load()?;

    let rules = rules_from_config(&config).context("Invalid rule configuration")?;
    let rules = match &args.rules_filter {
        Some(filter) => filter_rules(rules, filter),
        None => rules,
    };

    let mut analyzer = Analyzer::builder()
        .root(&args.path)
        .config(config)
        .parser(TsxExtractor::new())
        .excludes(args.exclude.iter().cloned())
        .rules(rules)
        .build()
        .context("Failed to build analyzer")?;

    tracing::info!(
        "Analyzing {} with {} rules",
        analyzer.root().display(),
        analyzer.rule_count()
    );

    let (result, stdin_text) = match &args.stdin_filename {
        Some(file) => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            let result = analyzer
                .analyze_source(file, &text)
                .with_context(|| format!("Analysis of {} failed", file.display()))?;
            (result, Some(text))
        }
        None => (analyzer.analyze().context("Analysis failed")?, None),
    };

    super::output::print(&result, args.format, analyzer.root(), stdin_text.as_deref())?;

    exit_on_errors(&result);
    Ok(())
}

/// Keeps the rules named in `filter` by name or code.
fn filter_rules(rules: Vec<RuleBox>, filter: &str) -> Vec<RuleBox> {
    let wanted: Vec<&str> = filter
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    for name in &wanted {
        if !rules.iter().any(|r| r.name() == *name || r.code() == *name) {
            tracing::warn!("Unknown rule: {}", name);
        }
    }

    rules
        .into_iter()
        .filter(|r| wanted.iter().any(|w| r.name() == *w || r.code() == *w))
        .collect()
}

fn exit_on_errors(result: &LintResult) {
    if result.has_errors() {
        std::process::exit(1);
    }
}
