//! Output formatting for lint results.

use anyhow::Result;
use atomic_lint_core::{LintResult, Severity, Violation, ViolationDiagnostic};
use std::path::Path;

use crate::OutputFormat;

/// Prints lint results in the specified format.
///
/// `stdin_text` replaces the on-disk text in `pretty` snippets when the
/// single checked file came from stdin.
pub fn print(
    result: &LintResult,
    format: OutputFormat,
    root: &Path,
    stdin_text: Option<&str>,
) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print_compact(result),
        OutputFormat::Pretty => print_pretty(result, root, stdin_text),
    }
    Ok(())
}

fn print_text(result: &LintResult) {
    for violation in &result.violations {
        let severity_indicator = match violation.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warning => "\x1b[33mwarning\x1b[0m",
            Severity::Info => "\x1b[34minfo\x1b[0m",
        };

        println!(
            "{} {} at {}:{}:{}",
            violation.code,
            violation.rule,
            violation.location.file.display(),
            violation.location.line,
            violation.location.column,
        );
        println!("  {}: {}", severity_indicator, violation.message);
        if let Some(doc) = &violation.doc_ref {
            println!("  = see: {doc}");
        }
        println!();
    }
    print_summary(result);
}

fn print_summary(result: &LintResult) {
    let (errors, warnings, infos) = result.count_by_severity();
    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{}Found {} error(s), {} warning(s), {} info(s) in {} file(s)\x1b[0m",
        summary_color, errors, warnings, infos, result.files_checked
    );
}

fn print_json(result: &LintResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}

fn print_compact(result: &LintResult) {
    for violation in &result.violations {
        println!("{violation}");
    }
}

fn print_pretty(result: &LintResult, root: &Path, stdin_text: Option<&str>) {
    for violation in &result.violations {
        let source = source_text(violation, root, stdin_text);
        let report = miette::Report::new(ViolationDiagnostic::new(violation, source));
        println!("{report:?}");
    }
    print_summary(result);
}

fn source_text(violation: &Violation, root: &Path, stdin_text: Option<&str>) -> String {
    if let Some(text) = stdin_text {
        return text.to_owned();
    }
    let path = root.join(&violation.location.file);
    match std::fs::read(&path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            tracing::debug!("No snippet for {}: {}", path.display(), e);
            String::new()
        }
    }
}
