//! List rules command implementation.

use atomic_lint_core::Locale;
use atomic_lint_rules::all_rules;

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!("{:<10} {:<25} Description", "Code", "Name");
    println!("{}", "-".repeat(80));

    for rule in all_rules(Locale::detect()) {
        println!(
            "{:<10} {:<25} {}",
            rule.code(),
            rule.name(),
            rule.description()
        );
    }

    println!("\nPresets:");
    println!("  all  - ATM001 to ATM005 at error severity (default)");

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  atomic-lint check --rules deny-local-state,deny-global-state");
    println!("  atomic-lint check --rules ATM004,ATM005");
}
