//! End-to-end checks of the five rules over a small component tree.

use atomic_lint_core::{Analyzer, Config, Locale, Severity};
use atomic_lint_rules::{all_rules, rules_from_config};
use atomic_lint_ts::TsxExtractor;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn component_tree() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();

    write(
        root,
        "src/components/atoms/Button/index.tsx",
        "import React from \"react\";\nexport const Button = () => { const [on, setOn] = useState(false); return <button />; };\n",
    );
    write(
        root,
        "src/components/atoms/Button/Button.test.tsx",
        "const [x] = useState(0);\nfetch(\"/api\");\n",
    );
    write(
        root,
        "src/components/molecules/Search/index.tsx",
        "import { Header } from \"../../organisms/Header\";\nexport const Search = () => { const [q, setQ] = useState(\"\"); return <Header />; };\n",
    );
    write(
        root,
        "src/components/molecules/Plain/index.tsx",
        "export const Plain = () => <span />;\n",
    );
    write(
        root,
        "src/components/organisms/Header/index.tsx",
        "export const Header = () => { const user = useContext(UserContext); return <h1 />; };\n",
    );
    write(
        root,
        "src/components/organisms/Footer/index.tsx",
        "export const Footer = () => <footer />;\n",
    );
    write(
        root,
        "node_modules/lib/atoms/index.tsx",
        "useState(0);\n",
    );

    tmp
}

fn summary(result: &atomic_lint_core::LintResult) -> Vec<String> {
    result
        .violations
        .iter()
        .map(|v| {
            format!(
                "{}:{}:{} {}",
                v.location.file.display(),
                v.location.line,
                v.location.column,
                v.code
            )
        })
        .collect()
}

#[test]
fn reports_each_layer_violation_once() {
    let tmp = component_tree();
    let mut analyzer = Analyzer::builder()
        .root(tmp.path())
        .parser(TsxExtractor::new())
        .rules(all_rules(Locale::En))
        .build()
        .unwrap();

    let result = analyzer.analyze().unwrap();

    assert_eq!(
        summary(&result),
        vec![
            "src/components/atoms/Button/index.tsx:2:51 ATM002",
            "src/components/molecules/Plain/index.tsx:1:1 ATM004",
            "src/components/molecules/Search/index.tsx:1:1 ATM001",
            "src/components/organisms/Footer/index.tsx:1:1 ATM005",
        ]
    );
    assert_eq!(result.violations[2].message, "molecules cannot import organisms.");
    assert_eq!(result.files_checked, 6);
    assert!(result.has_errors());
}

#[test]
fn editor_buffer_fixes_stateless_molecule() {
    let tmp = component_tree();
    let mut analyzer = Analyzer::builder()
        .root(tmp.path())
        .parser(TsxExtractor::new())
        .rules(all_rules(Locale::En))
        .build()
        .unwrap();

    let buffer = "export const Plain = () => { const [open] = useReducer(r, false); return <span />; };\n";
    let result = analyzer
        .analyze_source(Path::new("src/components/molecules/Plain/index.tsx"), buffer)
        .unwrap();
    assert!(result.violations.is_empty());

    let result = analyzer
        .analyze_source(
            Path::new("src/components/atoms/Button/index.tsx"),
            "export const Button = () => { const c = useContext(Theme); return <b />; };\n",
        )
        .unwrap();
    assert_eq!(summary(&result), vec!["src/components/atoms/Button/index.tsx:1:41 ATM003"]);
}

#[test]
fn configuration_shapes_the_run() {
    let tmp = component_tree();
    let config = Config::parse(
        r#"
locale = "ja"

[rules.must-use-global-state]
enabled = false

[rules.must-use-local-state]
severity = "warning"

[rules.import-dependencies]
exclude_source_file_patterns = [".*Search.*"]
"#,
    )
    .unwrap();

    let rules = rules_from_config(&config).unwrap();
    let mut analyzer = Analyzer::builder()
        .root(tmp.path())
        .config(config)
        .parser(TsxExtractor::new())
        .rules(rules)
        .build()
        .unwrap();

    let result = analyzer.analyze().unwrap();
    assert_eq!(
        summary(&result),
        vec![
            "src/components/atoms/Button/index.tsx:2:51 ATM002",
            "src/components/molecules/Plain/index.tsx:1:1 ATM004",
        ]
    );
    assert_eq!(result.violations[1].severity, Severity::Warning);
    assert_eq!(
        result.violations[0].message,
        "AtomsでuseState（Local State）は使えません。"
    );
}

#[test]
fn root_spelling_does_not_hide_must_use_findings() {
    let tmp = component_tree();
    fs::create_dir_all(tmp.path().join("sub")).unwrap();
    let mut analyzer = Analyzer::builder()
        .root(tmp.path().join("sub").join(".."))
        .parser(TsxExtractor::new())
        .rules(all_rules(Locale::En))
        .build()
        .unwrap();

    let plain = fs::canonicalize(tmp.path())
        .unwrap()
        .join("src/components/molecules/Plain/index.tsx");
    let text = fs::read_to_string(&plain).unwrap();
    let result = analyzer.analyze_source(&plain, &text).unwrap();

    assert_eq!(
        summary(&result),
        vec!["src/components/molecules/Plain/index.tsx:1:1 ATM004"]
    );
    assert_eq!(analyzer.root(), fs::canonicalize(tmp.path()).unwrap());
}
