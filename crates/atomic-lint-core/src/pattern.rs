//! Regular-expression pattern cache.
//!
//! Rules test every file path (and every import source) against a handful
//! of configured patterns. [`PatternMatcher`] compiles each distinct pattern
//! string once and hands out the cached [`Regex`] afterwards.

use regex::Regex;
use std::collections::HashMap;
use thiserror::Error;

/// A pattern string that failed to compile.
#[derive(Debug, Error)]
#[error("invalid pattern `{pattern}`: {source}")]
pub struct PatternError {
    /// The offending pattern source.
    pub pattern: String,
    /// Underlying regex error.
    #[source]
    pub source: regex::Error,
}

/// Lazily compiled, never evicted regex cache.
///
/// Matching is unanchored: `test("src/atoms/a.tsx", "atoms")` is `true`.
#[derive(Debug, Default)]
pub struct PatternMatcher {
    cache: HashMap<String, Regex>,
}

impl PatternMatcher {
    /// Creates an empty matcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the compiled regex for `pattern`, compiling it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if `pattern` is not a valid regex.
    pub fn compile_or_get(&mut self, pattern: &str) -> Result<&Regex, PatternError> {
        if !self.cache.contains_key(pattern) {
            let regex = Regex::new(pattern).map_err(|source| PatternError {
                pattern: pattern.to_string(),
                source,
            })?;
            self.cache.insert(pattern.to_string(), regex);
        }
        Ok(&self.cache[pattern])
    }

    /// Tests `text` against `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if `pattern` is not a valid regex.
    pub fn test(&mut self, text: &str, pattern: &str) -> Result<bool, PatternError> {
        Ok(self.compile_or_get(pattern)?.is_match(text))
    }

    /// Returns the first pattern in `patterns` that matches `text`.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] on the first pattern that fails to compile.
    pub fn first_match<'p, I>(&mut self, text: &str, patterns: I) -> Result<Option<&'p str>, PatternError>
    where
        I: IntoIterator<Item = &'p String>,
    {
        for pattern in patterns {
            if self.test(text, pattern)? {
                return Ok(Some(pattern.as_str()));
            }
        }
        Ok(None)
    }

    /// Returns `true` if any pattern in `patterns` matches `text`.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] on the first pattern that fails to compile.
    pub fn any_match<'p, I>(&mut self, text: &str, patterns: I) -> Result<bool, PatternError>
    where
        I: IntoIterator<Item = &'p String>,
    {
        Ok(self.first_match(text, patterns)?.is_some())
    }

    /// Compiles every pattern up front so configuration errors surface early.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] for the first invalid pattern.
    pub fn prime<'p, I>(&mut self, patterns: I) -> Result<(), PatternError>
    where
        I: IntoIterator<Item = &'p String>,
    {
        for pattern in patterns {
            self.compile_or_get(pattern)?;
        }
        Ok(())
    }

    /// Number of distinct compiled patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Returns `true` if nothing has been compiled yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
