//! Rule presets and construction from configuration.

use crate::{
    import_dependencies, DenyGlobalState, DenyLocalState, ImportDependencies, MustUseGlobalState,
    MustUseLocalState,
};
use atomic_lint_core::{Config, Locale, RuleBox, RuleError};
use tracing::warn;

/// Preset configurations for atomic-lint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// Every rule at error severity.
    #[default]
    All,
}

impl Preset {
    /// Parses a preset name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "all" => Some(Self::All),
            _ => None,
        }
    }

    /// Returns the rules for this preset.
    #[must_use]
    pub fn rules(self, locale: Locale) -> Vec<RuleBox> {
        match self {
            Self::All => all_rules(locale),
        }
    }
}

/// Returns all available rules with default options.
#[must_use]
pub fn all_rules(locale: Locale) -> Vec<RuleBox> {
    vec![
        Box::new(ImportDependencies::new().locale(locale)),
        Box::new(DenyLocalState::new().locale(locale)),
        Box::new(DenyGlobalState::new().locale(locale)),
        Box::new(MustUseLocalState::new().locale(locale)),
        Box::new(MustUseGlobalState::new().locale(locale)),
    ]
}

/// Builds the preset's rules with each rule's option table from `config`
/// merged over its defaults.
///
/// Unknown preset names fall back to `all`.
///
/// # Errors
///
/// Returns [`RuleError`] if an option table has unknown keys or a merged
/// pattern is invalid.
pub fn rules_from_config(config: &Config) -> Result<Vec<RuleBox>, RuleError> {
    let preset = match config.preset.as_deref() {
        None => Preset::All,
        Some(name) => Preset::from_name(name).unwrap_or_else(|| {
            warn!("Unknown preset `{name}`, using `all`");
            Preset::All
        }),
    };

    for name in config.rules.keys() {
        if !crate::RULE_NAMES.contains(&name.as_str()) {
            warn!("Unknown rule in configuration: {name}");
        }
    }

    let locale = config.effective_locale();
    let rules: Vec<RuleBox> = match preset {
        Preset::All => vec![
            Box::new(
                ImportDependencies::new()
                    .locale(locale)
                    .configure(config.rule_overrides(import_dependencies::NAME)?)?,
            ),
            Box::new(
                DenyLocalState::new()
                    .locale(locale)
                    .configure(config.rule_overrides(crate::deny_local_state::NAME)?)?,
            ),
            Box::new(
                DenyGlobalState::new()
                    .locale(locale)
                    .configure(config.rule_overrides(crate::deny_global_state::NAME)?)?,
            ),
            Box::new(
                MustUseLocalState::new()
                    .locale(locale)
                    .configure(config.rule_overrides(crate::must_use_local_state::NAME)?)?,
            ),
            Box::new(
                MustUseGlobalState::new()
                    .locale(locale)
                    .configure(config.rule_overrides(crate::must_use_global_state::NAME)?)?,
            ),
        ],
    };
    Ok(rules)
}
