//! Typed rule options and their merge with user overrides.
//!
//! Each rule owns a fully populated options value (its defaults). User
//! configuration arrives as an `*Overrides` value in which every field is
//! optional; `merge` replaces exactly the fields that were given. Keys are
//! snake_case; the camelCase spellings used by ESLint configs are
//! accepted as aliases.

use serde::Deserialize;
use thiserror::Error;

use crate::layer::{LayerPatternOverrides, LayerPatterns};
use crate::pattern::{PatternError, PatternMatcher};

/// Invalid option value.
#[derive(Debug, Error)]
pub enum OptionsError {
    /// A regex option failed to compile.
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// A glob option failed to parse.
    #[error("invalid glob `{pattern}`: {source}")]
    Glob {
        /// The offending glob.
        pattern: String,
        /// Underlying glob error.
        #[source]
        source: glob::PatternError,
    },
}

// ── Call denylist ──

/// Options for rules that deny calls by callee name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenyCallOptions {
    /// Regexes selecting the files the rule applies to.
    pub include_source_file_patterns: Vec<String>,
    /// Regexes removing files from the rule.
    pub exclude_source_file_patterns: Vec<String>,
    /// Callee names that are reported.
    pub deny_function_names: Vec<String>,
}

/// User overrides for [`DenyCallOptions`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DenyCallOverrides {
    /// Replaces the include patterns.
    #[serde(default, alias = "includeSourceFilePatterns")]
    pub include_source_file_patterns: Option<Vec<String>>,
    /// Replaces the exclude patterns.
    #[serde(default, alias = "excludeSourceFilePatterns")]
    pub exclude_source_file_patterns: Option<Vec<String>>,
    /// Replaces the denied names.
    #[serde(default, alias = "denyFunctionNames")]
    pub deny_function_names: Option<Vec<String>>,
}

impl DenyCallOptions {
    /// Applies `overrides` over these options.
    #[must_use]
    pub fn merge(self, overrides: DenyCallOverrides) -> Self {
        Self {
            include_source_file_patterns: overrides
                .include_source_file_patterns
                .unwrap_or(self.include_source_file_patterns),
            exclude_source_file_patterns: overrides
                .exclude_source_file_patterns
                .unwrap_or(self.exclude_source_file_patterns),
            deny_function_names: overrides
                .deny_function_names
                .unwrap_or(self.deny_function_names),
        }
    }

    /// Compiles every pattern into `matcher`.
    ///
    /// # Errors
    ///
    /// Returns the first pattern that fails to compile.
    pub fn validate(&self, matcher: &mut PatternMatcher) -> Result<(), OptionsError> {
        matcher.prime(&self.include_source_file_patterns)?;
        matcher.prime(&self.exclude_source_file_patterns)?;
        Ok(())
    }
}

// ── Must-use keywords ──

/// Options for directory-wide must-use rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MustUseOptions {
    /// Globs (relative to the project root) naming component directories.
    pub check_directories: Vec<String>,
    /// Globs (relative to the project root) naming files to index.
    pub check_files_in_directory: Vec<String>,
    /// Regexes removing files from the index.
    pub exclude_file_patterns: Vec<String>,
    /// Substrings that count as evidence of the required state kind.
    pub keywords: Vec<String>,
}

/// User overrides for [`MustUseOptions`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MustUseOverrides {
    /// Replaces the directory globs.
    #[serde(default, alias = "checkDirectorys", alias = "checkDirectories")]
    pub check_directories: Option<Vec<String>>,
    /// Replaces the file globs.
    #[serde(default, alias = "checkFilesInDirectory")]
    pub check_files_in_directory: Option<Vec<String>>,
    /// Replaces the exclude patterns.
    #[serde(default, alias = "excludeFilePatterns")]
    pub exclude_file_patterns: Option<Vec<String>>,
    /// Replaces the keyword vocabulary.
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
}

impl MustUseOptions {
    /// Applies `overrides` over these options.
    #[must_use]
    pub fn merge(self, overrides: MustUseOverrides) -> Self {
        Self {
            check_directories: overrides.check_directories.unwrap_or(self.check_directories),
            check_files_in_directory: overrides
                .check_files_in_directory
                .unwrap_or(self.check_files_in_directory),
            exclude_file_patterns: overrides
                .exclude_file_patterns
                .unwrap_or(self.exclude_file_patterns),
            keywords: overrides.keywords.unwrap_or(self.keywords),
        }
    }

    /// Compiles exclude regexes into `matcher` and parses every glob.
    ///
    /// # Errors
    ///
    /// Returns the first regex or glob that is invalid.
    pub fn validate(&self, matcher: &mut PatternMatcher) -> Result<(), OptionsError> {
        matcher.prime(&self.exclude_file_patterns)?;
        for pattern in self
            .check_directories
            .iter()
            .chain(&self.check_files_in_directory)
        {
            glob::Pattern::new(pattern).map_err(|source| OptionsError::Glob {
                pattern: pattern.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

// ── Import dependencies ──

/// Options for the layer import rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDependencyOptions {
    /// Regex per layer selecting source files of that layer.
    pub include_source_file_patterns: LayerPatterns,
    /// Regexes removing files from the rule.
    pub exclude_source_file_patterns: Vec<String>,
    /// Regex per layer matched against import specifiers.
    pub import_patterns: LayerPatterns,
}

/// User overrides for [`ImportDependencyOptions`].
///
/// Layer tables merge per key; the exclude list is replaced as a whole.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImportDependencyOverrides {
    /// Per-layer source patterns.
    #[serde(default, alias = "includeSourceFilePatterns")]
    pub include_source_file_patterns: LayerPatternOverrides,
    /// Replaces the exclude patterns.
    #[serde(default, alias = "excludeSourceFilePatterns")]
    pub exclude_source_file_patterns: Option<Vec<String>>,
    /// Per-layer import patterns.
    #[serde(default, alias = "importPatterns")]
    pub import_patterns: LayerPatternOverrides,
}

impl ImportDependencyOptions {
    /// Applies `overrides` over these options.
    #[must_use]
    pub fn merge(self, overrides: ImportDependencyOverrides) -> Self {
        Self {
            include_source_file_patterns: self
                .include_source_file_patterns
                .merge(overrides.include_source_file_patterns),
            exclude_source_file_patterns: overrides
                .exclude_source_file_patterns
                .unwrap_or(self.exclude_source_file_patterns),
            import_patterns: self.import_patterns.merge(overrides.import_patterns),
        }
    }

    /// Compiles every pattern into `matcher`.
    ///
    /// # Errors
    ///
    /// Returns the first pattern that fails to compile.
    pub fn validate(&self, matcher: &mut PatternMatcher) -> Result<(), OptionsError> {
        matcher.prime(self.include_source_file_patterns.iter().map(|(_, p)| p))?;
        matcher.prime(self.import_patterns.iter().map(|(_, p)| p))?;
        matcher.prime(&self.exclude_source_file_patterns)?;
        Ok(())
    }
}
