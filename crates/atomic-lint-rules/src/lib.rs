//! # atomic-lint-rules
//!
//! Built-in atomic-design rules for atomic-lint.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | ATM001 | `import-dependencies` | Forbids importing a higher layer |
//! | ATM002 | `deny-local-state` | Forbids local state calls in atoms |
//! | ATM003 | `deny-global-state` | Forbids global state calls in atoms and molecules |
//! | ATM004 | `must-use-local-state` | Requires each molecule directory to use local state |
//! | ATM005 | `must-use-global-state` | Requires each organism directory to use global state |
//!
//! ## Usage
//!
//! ```ignore
//! use atomic_lint_core::Analyzer;
//! use atomic_lint_rules::{DenyLocalState, MustUseLocalState};
//! use atomic_lint_ts::TsxExtractor;
//!
//! let mut analyzer = Analyzer::builder()
//!     .root(".")
//!     .parser(TsxExtractor::new())
//!     .rule(DenyLocalState::new())
//!     .rule(MustUseLocalState::new())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod deny_global_state;
pub mod deny_local_state;
pub mod import_dependencies;
pub mod must_use_global_state;
pub mod must_use_local_state;
mod presets;

pub use deny_global_state::DenyGlobalState;
pub use deny_local_state::DenyLocalState;
pub use import_dependencies::ImportDependencies;
pub use must_use_global_state::MustUseGlobalState;
pub use must_use_local_state::MustUseLocalState;
pub use presets::{all_rules, rules_from_config, Preset};

/// Names of every built-in rule, in code order.
pub const RULE_NAMES: [&str; 5] = [
    import_dependencies::NAME,
    deny_local_state::NAME,
    deny_global_state::NAME,
    must_use_local_state::NAME,
    must_use_global_state::NAME,
];

/// Re-export core types for convenience.
pub use atomic_lint_core::{Rule, Severity, Violation};
