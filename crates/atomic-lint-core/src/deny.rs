//! Call-name denylist checking.
//!
//! [`CallSiteDenier`] scopes a denylist by path: a file is checked only when
//! an include pattern selects it and no exclude pattern does. Each denied
//! call reports the include pattern that selected the file.

use crate::context::FileContext;
use crate::options::DenyCallOptions;
use crate::pattern::{PatternError, PatternMatcher};
use crate::source::CallSite;

/// A denied call found in a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenyResult<'a> {
    /// The offending call.
    pub call: &'a CallSite,
    /// Denylist entry the callee matched.
    pub function_name: &'a str,
    /// Include pattern that brought the file under the rule.
    pub included_pattern: &'a str,
}

/// Checks call sites against a denylist, scoped by path patterns.
#[derive(Debug)]
pub struct CallSiteDenier {
    options: DenyCallOptions,
    matcher: PatternMatcher,
}

impl CallSiteDenier {
    /// Creates a denier whose patterns compile on first use.
    #[must_use]
    pub fn new(options: DenyCallOptions) -> Self {
        Self {
            options,
            matcher: PatternMatcher::new(),
        }
    }

    /// Creates a denier and compiles all of its patterns up front.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if any include or exclude pattern is invalid.
    pub fn validated(options: DenyCallOptions) -> Result<Self, PatternError> {
        let mut denier = Self::new(options);
        denier.matcher.prime(&denier.options.include_source_file_patterns)?;
        denier.matcher.prime(&denier.options.exclude_source_file_patterns)?;
        Ok(denier)
    }

    /// The merged options.
    #[must_use]
    pub fn options(&self) -> &DenyCallOptions {
        &self.options
    }

    /// Checks a single call site of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if a pattern is invalid.
    pub fn check<'a>(
        &'a mut self,
        path: &str,
        call: &'a CallSite,
    ) -> Result<Option<DenyResult<'a>>, PatternError> {
        let options = &self.options;
        let Some(included) = included_pattern(&mut self.matcher, options, path)? else {
            return Ok(None);
        };
        Ok(
            deny_entry(&options.deny_function_names, call).map(|function_name| DenyResult {
                call,
                function_name,
                included_pattern: included,
            }),
        )
    }

    /// Checks every call site of a file.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if a pattern is invalid.
    pub fn check_file<'a>(
        &'a mut self,
        ctx: &'a FileContext<'_>,
    ) -> Result<Vec<DenyResult<'a>>, PatternError> {
        let options = &self.options;
        let path = ctx.path.to_string_lossy();
        let Some(included) = included_pattern(&mut self.matcher, options, &path)? else {
            return Ok(Vec::new());
        };
        Ok(ctx
            .parsed
            .calls
            .iter()
            .filter_map(|call| {
                deny_entry(&options.deny_function_names, call).map(|function_name| DenyResult {
                    call,
                    function_name,
                    included_pattern: included,
                })
            })
            .collect())
    }
}

/// First include pattern matching `path`, or `None` when nothing includes
/// the path or an exclude pattern matches it.
fn included_pattern<'o>(
    matcher: &mut PatternMatcher,
    options: &'o DenyCallOptions,
    path: &str,
) -> Result<Option<&'o str>, PatternError> {
    let Some(included) = matcher.first_match(path, &options.include_source_file_patterns)? else {
        return Ok(None);
    };
    if matcher.any_match(path, &options.exclude_source_file_patterns)? {
        return Ok(None);
    }
    Ok(Some(included))
}

/// Returns the denylist entry equal to the call's callee name.
fn deny_entry<'a>(denied: &'a [String], call: &CallSite) -> Option<&'a str> {
    let name = call.callee.name()?;
    denied.iter().find(|d| *d == name).map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{Callee, ParsedSource, Span};
    use std::path::Path;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    fn denier() -> CallSiteDenier {
        CallSiteDenier::validated(DenyCallOptions {
            include_source_file_patterns: strings(&[r"\/atoms\/.*\.tsx", r"\/molecules\/.*\.tsx"]),
            exclude_source_file_patterns: strings(&[r"\.test", r"\.stories"]),
            deny_function_names: strings(&["useState", "useContext"]),
        })
        .unwrap()
    }

    fn call(callee: Callee) -> CallSite {
        CallSite::new(callee, Span::new(1, 1, 0, 0))
    }

    #[test]
    fn bare_call_is_denied() {
        let mut d = denier();
        let c = call(Callee::Bare("useState".into()));
        let hit = d.check("/p/atoms/Button/index.tsx", &c).unwrap().unwrap();
        assert_eq!(hit.function_name, "useState");
        assert_eq!(hit.included_pattern, r"\/atoms\/.*\.tsx");
    }

    #[test]
    fn member_and_bare_calls_match_the_same_entry() {
        let mut d = denier();
        let member = call(Callee::Member("useState".into()));
        let bare = call(Callee::Bare("useState".into()));
        let a = d
            .check("/p/atoms/A/index.tsx", &member)
            .unwrap()
            .map(|r| r.function_name.to_string());
        let b = d
            .check("/p/atoms/A/index.tsx", &bare)
            .unwrap()
            .map(|r| r.function_name.to_string());
        assert_eq!(a, Some("useState".to_string()));
        assert_eq!(a, b);
    }

    #[test]
    fn excluded_file_is_skipped() {
        let mut d = denier();
        let c = call(Callee::Bare("useState".into()));
        assert!(d.check("/p/atoms/A/index.test.tsx", &c).unwrap().is_none());
        assert!(d.check("/p/atoms/A/A.stories.tsx", &c).unwrap().is_none());
    }

    #[test]
    fn non_included_file_is_skipped() {
        let mut d = denier();
        let c = call(Callee::Bare("useState".into()));
        assert!(d.check("/p/organisms/A/index.tsx", &c).unwrap().is_none());
    }

    #[test]
    fn unresolved_and_partial_names_never_match() {
        let mut d = denier();
        let dynamic = call(Callee::Unresolved);
        let partial = call(Callee::Bare("useStateful".into()));
        assert!(d.check("/p/atoms/A/index.tsx", &dynamic).unwrap().is_none());
        assert!(d.check("/p/atoms/A/index.tsx", &partial).unwrap().is_none());
    }

    #[test]
    fn check_file_reports_each_match_with_category_pattern() {
        let mut d = denier();
        let parsed = ParsedSource {
            calls: vec![
                call(Callee::Bare("useState".into())),
                call(Callee::Member("map".into())),
                call(Callee::Member("useContext".into())),
            ],
            ..ParsedSource::default()
        };
        let path = Path::new("/p/src/molecules/Form/index.tsx");
        let ctx = FileContext::new(path, "", &parsed, Path::new("/p"));
        let hits = d.check_file(&ctx).unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits
            .iter()
            .all(|h| h.included_pattern == r"\/molecules\/.*\.tsx"));
    }

    #[test]
    fn invalid_pattern_fails_construction() {
        let result = CallSiteDenier::validated(DenyCallOptions {
            include_source_file_patterns: strings(&["("]),
            exclude_source_file_patterns: Vec::new(),
            deny_function_names: Vec::new(),
        });
        assert!(result.is_err());
    }

    #[test]
    fn invalid_pattern_surfaces_at_first_use_when_deferred() {
        let mut d = CallSiteDenier::new(DenyCallOptions {
            include_source_file_patterns: strings(&["("]),
            exclude_source_file_patterns: Vec::new(),
            deny_function_names: strings(&["useState"]),
        });
        let c = call(Callee::Bare("useState".into()));
        assert!(d.check("/p/atoms/A/index.tsx", &c).is_err());
    }
}
