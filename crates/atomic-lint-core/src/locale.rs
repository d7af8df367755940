//! Message language selection.

use serde::{Deserialize, Serialize};

/// Language used for human-readable messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English (fallback).
    #[default]
    En,
    /// Japanese.
    Ja,
}

/// Environment variables consulted, in priority order.
const LOCALE_VARS: &[&str] = &["LC_ALL", "LC_MESSAGES", "LANG"];

impl Locale {
    /// Detects the locale from `LC_ALL`, `LC_MESSAGES` or `LANG`.
    #[must_use]
    pub fn detect() -> Self {
        let value = LOCALE_VARS
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|v| !v.is_empty());
        value.as_deref().map_or(Self::En, Self::from_tag)
    }

    /// Parses a locale tag such as `ja_JP.UTF-8`, `ja-JP` or `en`.
    ///
    /// Unknown languages fall back to English.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        let lang = tag
            .split(['_', '.', '-', '@'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match lang.as_str() {
            "ja" => Self::Ja,
            _ => Self::En,
        }
    }

    /// Picks the variant for this locale.
    #[must_use]
    pub fn select<T>(self, en: T, ja: T) -> T {
        match self {
            Self::En => en,
            Self::Ja => ja,
        }
    }
}
