//! Directory-wide must-use policy.
//!
//! A must-use rule does not ask whether one file uses some kind of state. It
//! asks whether the component directory that file lives in uses it anywhere.
//! [`MustUsePolicy`] owns the [`KeywordIndex`] for one such rule and builds
//! it exactly once; [`DirectoryPolicyEvaluator`] turns the index into a
//! per-file [`Verdict`].

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::keyword_index::KeywordIndex;
use crate::options::{MustUseOptions, OptionsError};
use crate::pattern::PatternMatcher;
use crate::rule::RuleError;

/// Outcome of evaluating a file against a must-use policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The file was not part of the initial scan; the policy does not apply.
    Skip,
    /// The file's directory uses at least one keyword.
    Pass,
    /// No indexed file in the directory uses any keyword.
    Fail,
}

/// Evaluates the directory aggregate for a file.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryPolicyEvaluator;

impl DirectoryPolicyEvaluator {
    /// Refreshes `file` from `live_text` and judges its directory.
    ///
    /// Files the index has never seen are skipped without being recorded.
    pub fn evaluate(index: &mut KeywordIndex, file: &Path, live_text: &str) -> Verdict {
        if index.lookup_file(file).is_none() {
            return Verdict::Skip;
        }

        index.record_file(file, live_text);

        let Some(dir) = index.resolve_directory(file) else {
            return Verdict::Skip;
        };
        let aggregate = index.aggregate_directory(dir);
        debug!(
            "{}: directory {} uses {:?}",
            file.display(),
            dir.display(),
            aggregate
        );

        if aggregate.is_empty() {
            Verdict::Fail
        } else {
            Verdict::Pass
        }
    }
}

/// A must-use rule's options plus its lazily built keyword index.
#[derive(Debug)]
pub struct MustUsePolicy {
    options: MustUseOptions,
    matcher: PatternMatcher,
    index: Option<KeywordIndex>,
}

impl MustUsePolicy {
    /// Creates an uninitialized policy. Patterns are checked when the
    /// index is built.
    #[must_use]
    pub fn new(options: MustUseOptions) -> Self {
        Self {
            options,
            matcher: PatternMatcher::new(),
            index: None,
        }
    }

    /// Validates `options` and creates an uninitialized policy.
    ///
    /// # Errors
    ///
    /// Returns [`OptionsError`] if an exclude regex or a glob is invalid.
    pub fn validated(options: MustUseOptions) -> Result<Self, OptionsError> {
        let mut policy = Self::new(options);
        policy.options.validate(&mut policy.matcher)?;
        Ok(policy)
    }

    /// The merged options.
    #[must_use]
    pub fn options(&self) -> &MustUseOptions {
        &self.options
    }

    /// Whether the initial scan has run.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.index.is_some()
    }

    /// The index, once built.
    #[must_use]
    pub fn index(&self) -> Option<&KeywordIndex> {
        self.index.as_ref()
    }

    /// Builds the index on first call by expanding the configured globs
    /// against `root` and reading every matching file. Later calls return
    /// the existing index untouched.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] if a glob or exclude pattern is invalid.
    pub fn ensure_initialized(&mut self, root: &Path) -> Result<&mut KeywordIndex, RuleError> {
        if self.index.is_none() {
            let directories = expand_globs(root, &self.options.check_directories, true)?;
            let files = expand_globs(root, &self.options.check_files_in_directory, false)?;
            info!(
                "Building keyword index: {} directories, {} candidate files",
                directories.len(),
                files.len()
            );
            let index = KeywordIndex::initialize(
                directories,
                &files,
                root,
                &self.options.exclude_file_patterns,
                self.options.keywords.clone(),
                &mut self.matcher,
            )?;
            self.index = Some(index);
        }
        Ok(self.index.get_or_insert_with(KeywordIndex::default))
    }

    /// Evaluates `file` with the host's current text.
    ///
    /// Returns [`Verdict::Skip`] until [`MustUsePolicy::ensure_initialized`]
    /// has run.
    pub fn evaluate(&mut self, file: &Path, live_text: &str) -> Verdict {
        match self.index.as_mut() {
            Some(index) => DirectoryPolicyEvaluator::evaluate(index, file, live_text),
            None => {
                debug!("Keyword index not built, skipping {}", file.display());
                Verdict::Skip
            }
        }
    }
}

/// Expands root-relative globs into absolute paths.
///
/// Unreadable entries are logged and skipped.
fn expand_globs(root: &Path, patterns: &[String], dirs_only: bool) -> Result<Vec<PathBuf>, OptionsError> {
    let escaped_root = glob::Pattern::escape(&root.to_string_lossy());
    let mut paths = Vec::new();

    for pattern in patterns {
        let relative = pattern.trim_start_matches("./");
        let absolute = if Path::new(relative).is_absolute() {
            relative.to_string()
        } else {
            format!("{}/{}", escaped_root.trim_end_matches('/'), relative)
        };

        let entries = glob::glob(&absolute).map_err(|source| OptionsError::Glob {
            pattern: pattern.clone(),
            source,
        })?;

        for entry in entries {
            match entry {
                Ok(path) if !dirs_only || path.is_dir() => paths.push(path),
                Ok(_) => {}
                Err(e) => warn!("Skipping unreadable path while expanding `{pattern}`: {e}"),
            }
        }
    }

    paths.sort();
    paths.dedup();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn local_state_options() -> MustUseOptions {
        MustUseOptions {
            check_directories: vec!["./src/components/molecules/*/".into()],
            check_files_in_directory: vec!["./src/components/molecules/**/*.ts*".into()],
            exclude_file_patterns: vec![r".*\.test.*".into(), r".*\.stories.*".into()],
            keywords: vec!["setState".into(), "useState".into(), "useReducer".into()],
        }
    }

    fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn directory_with_state_in_sibling_passes() {
        let tmp = TempDir::new().unwrap();
        let index_tsx = write(
            tmp.path(),
            "src/components/molecules/Foo/index.tsx",
            "export const Foo = () => <div />;",
        );
        write(
            tmp.path(),
            "src/components/molecules/Foo/hooks.tsx",
            "export const useFoo = () => { const [x] = useState(); return x; };",
        );

        let mut policy = MustUsePolicy::validated(local_state_options()).unwrap();
        policy.ensure_initialized(tmp.path()).unwrap();

        assert_eq!(
            policy.evaluate(&index_tsx, "export const Foo = () => <div />;"),
            Verdict::Pass
        );
    }

    #[test]
    fn directory_without_state_fails() {
        let tmp = TempDir::new().unwrap();
        let text = "export const Bar = () => <span />;";
        let index_tsx = write(tmp.path(), "src/components/molecules/Bar/index.tsx", text);

        let mut policy = MustUsePolicy::validated(local_state_options()).unwrap();
        policy.ensure_initialized(tmp.path()).unwrap();

        assert_eq!(policy.evaluate(&index_tsx, text), Verdict::Fail);
    }

    #[test]
    fn live_text_overrides_disk_content() {
        let tmp = TempDir::new().unwrap();
        let index_tsx = write(
            tmp.path(),
            "src/components/molecules/Baz/index.tsx",
            "export const Baz = () => null;",
        );

        let mut policy = MustUsePolicy::validated(local_state_options()).unwrap();
        policy.ensure_initialized(tmp.path()).unwrap();

        let edited = "const [open, setOpen] = useState(false);";
        assert_eq!(policy.evaluate(&index_tsx, edited), Verdict::Pass);
        assert_eq!(
            policy.evaluate(&index_tsx, "export const Baz = () => null;"),
            Verdict::Fail
        );
    }

    #[test]
    fn unknown_and_excluded_files_are_skipped() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "src/components/molecules/Foo/index.tsx",
            "useState()",
        );
        let story = write(
            tmp.path(),
            "src/components/molecules/Foo/Foo.stories.tsx",
            "export default {};",
        );

        let mut policy = MustUsePolicy::validated(local_state_options()).unwrap();
        policy.ensure_initialized(tmp.path()).unwrap();

        assert_eq!(policy.evaluate(&story, ""), Verdict::Skip);
        let created_later = tmp.path().join("src/components/molecules/Foo/new.tsx");
        assert_eq!(policy.evaluate(&created_later, ""), Verdict::Skip);
        let organism = tmp.path().join("src/components/organisms/Header/index.tsx");
        assert_eq!(policy.evaluate(&organism, ""), Verdict::Skip);
    }

    #[test]
    fn evaluate_before_initialization_skips() {
        let mut policy = MustUsePolicy::validated(local_state_options()).unwrap();
        assert!(!policy.is_initialized());
        assert_eq!(
            policy.evaluate(Path::new("/p/src/components/molecules/Foo/index.tsx"), ""),
            Verdict::Skip
        );
    }

    #[test]
    fn initialization_happens_once() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "src/components/molecules/Foo/index.tsx", "useState()");

        let mut policy = MustUsePolicy::validated(local_state_options()).unwrap();
        policy.ensure_initialized(tmp.path()).unwrap();
        assert_eq!(policy.index().map(KeywordIndex::file_count), Some(1));

        write(tmp.path(), "src/components/molecules/Foo/extra.tsx", "useReducer()");
        policy.ensure_initialized(tmp.path()).unwrap();
        assert_eq!(policy.index().map(KeywordIndex::file_count), Some(1));
    }

    #[test]
    fn evaluator_works_on_a_bare_index() {
        let mut index = KeywordIndex::new(["/p/m/Foo"], vec!["useState".into()]);
        let a = Path::new("/p/m/Foo/index.tsx");
        let b = Path::new("/p/m/Foo/hooks.ts");
        index.record_file(a, "");
        index.record_file(b, "useState()");

        assert_eq!(DirectoryPolicyEvaluator::evaluate(&mut index, a, ""), Verdict::Pass);
        index.record_file(b, "");
        assert_eq!(DirectoryPolicyEvaluator::evaluate(&mut index, a, ""), Verdict::Fail);
    }
}
