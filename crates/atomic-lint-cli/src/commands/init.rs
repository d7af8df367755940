//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# atomic-lint configuration

# Only "all" exists: every rule at error severity.
preset = "all"

# Message language ("en" or "ja"). Detected from LANG when unset.
# locale = "ja"

[analyzer]
# Project root; rule globs such as ./src/components/... resolve against it
# root = "."

# Glob patterns to exclude from analysis
exclude = [
    "**/node_modules/**",
    "**/dist/**",
]

extensions = ["ts", "tsx", "js", "jsx"]

# Respect .gitignore files
respect_gitignore = true

# Each rule can be disabled, have its severity overridden, or replace any
# of its option lists.

[rules.import-dependencies]
# exclude_source_file_patterns = [".*\\.test.*", ".*\\.stories.*"]
# [rules.import-dependencies.import_patterns]
# organisms = ["^.*/templates/.*$", "^.*/pages/.*$"]

[rules.deny-local-state]
# severity = "warning"
# include_source_file_patterns = ["^.*/components/atoms/.*$"]
# deny_function_names = ["useState", "useReducer"]

[rules.deny-global-state]
# include_source_file_patterns = ["^.*/components/atoms/.*$", "^.*/components/molecules/.*$"]

[rules.must-use-local-state]
# check_directories = ["./src/components/molecules/*/"]
# check_files_in_directory = ["./src/components/molecules/**/*.ts*"]
# keywords = ["setState", "useState", "useReducer"]

[rules.must-use-global-state]
# enabled = false
# keywords = ["fetch", "useContext", "useSWR", "useSelector"]
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new("atomic-lint.toml"), force)?;

    println!("Created atomic-lint.toml");
    println!("\nNext steps:");
    println!("  1. Edit atomic-lint.toml to configure rules");
    println!("  2. Run: atomic-lint check");

    Ok(())
}

fn write_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))
}
