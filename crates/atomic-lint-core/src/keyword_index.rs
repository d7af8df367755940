//! Directory-level keyword aggregation.
//!
//! [`KeywordIndex`] maps every registered component directory to the files
//! indexed under it, and every file to the set of vocabulary keywords found
//! in its text. Must-use rules ask a directory-wide question ("does anything
//! in `molecules/Form/` use local state?"), so the index keeps per-file sets
//! and unions them on demand.
//!
//! Keyword detection is plain, case-sensitive substring search over the whole
//! text. Occurrences inside comments and string literals count.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::pattern::{PatternError, PatternMatcher};

/// Keywords found in one file.
pub type KeywordSet = BTreeSet<String>;

/// Outcome counters for a batch scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Files read and recorded.
    pub recorded: usize,
    /// Files skipped because an exclude pattern matched.
    pub excluded: usize,
    /// Files outside every registered directory.
    pub unregistered: usize,
    /// Files that could not be read (recorded with no keywords).
    pub unreadable: usize,
}

/// Directory → file → keyword set.
///
/// The set of directories is fixed at construction. File entries are added
/// by the initial scan and refreshed by [`KeywordIndex::record_file`].
#[derive(Debug, Clone, Default)]
pub struct KeywordIndex {
    keywords: Vec<String>,
    directories: BTreeMap<PathBuf, BTreeMap<PathBuf, KeywordSet>>,
}

impl KeywordIndex {
    /// Registers `directories` (each with an empty file map) for `keywords`.
    #[must_use]
    pub fn new<I, P>(directories: I, keywords: Vec<String>) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let directories = directories
            .into_iter()
            .map(|dir| (dir.into(), BTreeMap::new()))
            .collect();
        Self {
            keywords,
            directories,
        }
    }

    /// Builds an index and populates it from disk in one blocking pass.
    ///
    /// Files whose path relative to `root` matches any of `exclude_patterns`
    /// are skipped. Every other file under a registered directory is read and
    /// recorded before this returns.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if an exclude pattern is not a valid regex.
    pub fn initialize<I, P>(
        directories: I,
        files: &[PathBuf],
        root: &Path,
        exclude_patterns: &[String],
        keywords: Vec<String>,
        matcher: &mut PatternMatcher,
    ) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut index = Self::new(directories, keywords);
        let summary = index.scan_files(files, root, exclude_patterns, matcher)?;
        info!(
            "Keyword index ready: {} directories, {} files ({} excluded, {} outside, {} unreadable)",
            index.directory_count(),
            summary.recorded,
            summary.excluded,
            summary.unregistered,
            summary.unreadable,
        );
        Ok(index)
    }

    /// Reads and records each file, best effort.
    ///
    /// Exclude patterns see the path relative to `root`, so directories
    /// above the project never trigger them. A file that cannot be read is
    /// logged and recorded with an empty keyword set.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if an exclude pattern is not a valid regex.
    pub fn scan_files(
        &mut self,
        files: &[PathBuf],
        root: &Path,
        exclude_patterns: &[String],
        matcher: &mut PatternMatcher,
    ) -> Result<ScanSummary, PatternError> {
        let mut summary = ScanSummary::default();

        for file in files {
            let relative = file.strip_prefix(root).unwrap_or(file);
            if matcher.any_match(&relative.to_string_lossy(), exclude_patterns)? {
                debug!("Keyword scan excluding: {}", file.display());
                summary.excluded += 1;
                continue;
            }

            if self.resolve_directory(file).is_none() {
                summary.unregistered += 1;
                continue;
            }

            match std::fs::read(file) {
                Ok(bytes) => {
                    self.record_file(file, &String::from_utf8_lossy(&bytes));
                    summary.recorded += 1;
                }
                Err(e) => {
                    warn!("Failed to read {}: {}", file.display(), e);
                    self.record_file(file, "");
                    summary.unreadable += 1;
                }
            }
        }

        Ok(summary)
    }

    /// Number of registered directories.
    #[must_use]
    pub fn directory_count(&self) -> usize {
        self.directories.len()
    }

    /// Number of indexed files across all directories.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.directories.values().map(BTreeMap::len).sum()
    }

    /// Returns the registered directory that owns `file`.
    ///
    /// When several registered directories contain the file, the one with the
    /// longest path string wins.
    #[must_use]
    pub fn resolve_directory(&self, file: &Path) -> Option<&Path> {
        self.directories
            .keys()
            .filter(|dir| file.starts_with(dir))
            .max_by_key(|dir| dir.as_os_str().len())
            .map(PathBuf::as_path)
    }

    /// Recomputes the keyword set of `file` from `text`.
    ///
    /// Returns `false` (and stores nothing) if `file` is outside every
    /// registered directory.
    pub fn record_file(&mut self, file: &Path, text: &str) -> bool {
        let Some(dir) = self.resolve_directory(file).map(Path::to_path_buf) else {
            return false;
        };
        let found = self.keywords_in(text);
        debug!(
            "Recorded {} keyword(s) for {}",
            found.len(),
            file.display()
        );
        if let Some(files) = self.directories.get_mut(&dir) {
            files.insert(file.to_path_buf(), found);
        }
        true
    }

    /// The stored keyword set of `file`, or `None` if it was never indexed.
    #[must_use]
    pub fn lookup_file(&self, file: &Path) -> Option<&KeywordSet> {
        let dir = self.resolve_directory(file)?;
        self.directories.get(dir)?.get(file)
    }

    /// Union of the keyword sets of every file indexed under `dir`.
    #[must_use]
    pub fn aggregate_directory(&self, dir: &Path) -> BTreeSet<&str> {
        self.directories
            .get(dir)
            .into_iter()
            .flat_map(BTreeMap::values)
            .flatten()
            .map(String::as_str)
            .collect()
    }

    fn keywords_in(&self, text: &str) -> KeywordSet {
        self.keywords
            .iter()
            .filter(|word| text.contains(word.as_str()))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn vocab() -> Vec<String> {
        ["setState", "useState", "useReducer"]
            .iter()
            .map(|s| (*s).to_string())
            .collect()
    }

    #[test]
    fn longest_prefix_wins() {
        let index = KeywordIndex::new(
            ["/p/src/components/atoms", "/p/src/components/atoms/button"],
            vocab(),
        );
        assert_eq!(
            index.resolve_directory(Path::new("/p/src/components/atoms/button/index.tsx")),
            Some(Path::new("/p/src/components/atoms/button"))
        );
        assert_eq!(
            index.resolve_directory(Path::new("/p/src/components/atoms/icon.tsx")),
            Some(Path::new("/p/src/components/atoms"))
        );
    }

    #[test]
    fn sibling_with_shared_name_prefix_is_not_owned() {
        let index = KeywordIndex::new(["/p/molecules/Form"], vocab());
        assert_eq!(
            index.resolve_directory(Path::new("/p/molecules/FormField/index.tsx")),
            None
        );
    }

    #[test]
    fn record_outside_registered_directories_is_noop() {
        let mut index = KeywordIndex::new(["/p/molecules/Form"], vocab());
        assert!(!index.record_file(Path::new("/p/organisms/Header/index.tsx"), "useState()"));
        assert_eq!(index.file_count(), 0);
        assert!(index
            .lookup_file(Path::new("/p/organisms/Header/index.tsx"))
            .is_none());
    }

    #[test]
    fn lookup_distinguishes_missing_from_empty() {
        let mut index = KeywordIndex::new(["/p/molecules/Form"], vocab());
        let file = Path::new("/p/molecules/Form/index.tsx");
        assert!(index.lookup_file(file).is_none());

        index.record_file(file, "export const Form = () => null;");
        assert_eq!(index.lookup_file(file), Some(&KeywordSet::new()));
    }

    #[test]
    fn record_is_idempotent() {
        let mut index = KeywordIndex::new(["/p/molecules/Form"], vocab());
        let file = Path::new("/p/molecules/Form/index.tsx");
        let text = "const [v, setV] = useState(0); const r = useReducer(f, 0);";

        index.record_file(file, text);
        let first = index.lookup_file(file).cloned();
        index.record_file(file, text);
        assert_eq!(index.lookup_file(file).cloned(), first);
        assert_eq!(
            first.unwrap().into_iter().collect::<Vec<_>>(),
            vec!["useReducer".to_string(), "useState".to_string()]
        );
    }

    #[test]
    fn substring_match_counts_comments_and_is_case_sensitive() {
        let mut index = KeywordIndex::new(["/p/m/A"], vocab());
        let file = Path::new("/p/m/A/index.tsx");
        index.record_file(file, "// could call useState here\nconst usestate = 1;");
        let set = index.lookup_file(file).unwrap();
        assert!(set.contains("useState"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn aggregate_survives_while_any_sibling_has_keyword() {
        let mut index = KeywordIndex::new(["/p/m/Form"], vocab());
        let dir = Path::new("/p/m/Form");
        let a = Path::new("/p/m/Form/index.tsx");
        let b = Path::new("/p/m/Form/hooks.ts");

        index.record_file(a, "useState()");
        index.record_file(b, "useReducer()");
        assert_eq!(index.aggregate_directory(dir).len(), 2);

        index.record_file(a, "nothing here");
        let agg = index.aggregate_directory(dir);
        assert!(!agg.is_empty());
        assert!(agg.contains("useReducer"));
    }

    #[test]
    fn aggregate_of_unknown_or_empty_directory_is_empty() {
        let index = KeywordIndex::new(["/p/m/Form"], vocab());
        assert!(index.aggregate_directory(Path::new("/p/m/Form")).is_empty());
        assert!(index.aggregate_directory(Path::new("/nowhere")).is_empty());
    }

    #[test]
    fn empty_configuration_degrades_to_empty_index() {
        let mut matcher = PatternMatcher::new();
        let index = KeywordIndex::initialize(
            Vec::<PathBuf>::new(),
            &[PathBuf::from("/p/a.tsx")],
            Path::new("/p"),
            &[],
            Vec::new(),
            &mut matcher,
        )
        .unwrap();
        assert_eq!(index.directory_count(), 0);
        assert_eq!(index.file_count(), 0);
    }

    #[test]
    fn initialize_reads_files_and_skips_excluded() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("molecules/Form");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("index.tsx"), "export const Form = () => null;").unwrap();
        fs::write(dir.join("hooks.ts"), "const [a] = useState();").unwrap();
        fs::write(dir.join("Form.test.tsx"), "useReducer()").unwrap();

        let files = vec![
            dir.join("index.tsx"),
            dir.join("hooks.ts"),
            dir.join("Form.test.tsx"),
            tmp.path().join("elsewhere.tsx"),
        ];
        let mut matcher = PatternMatcher::new();
        let mut index = KeywordIndex::new([dir.clone()], vocab());
        let summary = index
            .scan_files(&files, tmp.path(), &[r".*\.test.*".to_string()], &mut matcher)
            .unwrap();

        assert_eq!(summary.recorded, 2);
        assert_eq!(summary.excluded, 1);
        assert_eq!(summary.unregistered, 1);
        assert!(index.lookup_file(&dir.join("Form.test.tsx")).is_none());
        assert_eq!(
            index.aggregate_directory(&dir).into_iter().collect::<Vec<_>>(),
            vec!["useState"]
        );
    }

    #[test]
    fn unreadable_file_contributes_nothing_but_stays_known() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("molecules/Gone");
        fs::create_dir_all(&dir).unwrap();
        let missing = dir.join("index.tsx");

        let mut matcher = PatternMatcher::new();
        let index =
            KeywordIndex::initialize(
                [dir.clone()],
                &[missing.clone()],
                tmp.path(),
                &[],
                vocab(),
                &mut matcher,
            )
            .unwrap();

        assert_eq!(index.lookup_file(&missing), Some(&KeywordSet::new()));
        assert!(index.aggregate_directory(&dir).is_empty());
    }

    #[test]
    fn invalid_exclude_pattern_is_an_error() {
        let mut matcher = PatternMatcher::new();
        let result = KeywordIndex::initialize(
            ["/p/m"],
            &[PathBuf::from("/p/m/a.tsx")],
            Path::new("/p"),
            &["(".to_string()],
            vocab(),
            &mut matcher,
        );
        assert!(result.is_err());
    }

    #[test]
    fn exclude_patterns_ignore_directories_above_root() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("app.test");
        let dir = root.join("molecules/Form");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("index.tsx"), "useState()").unwrap();
        fs::write(dir.join("Form.stories.tsx"), "useReducer()").unwrap();

        let files = vec![dir.join("index.tsx"), dir.join("Form.stories.tsx")];
        let excludes = [r".*\.test.*".to_string(), r".*\.stories.*".to_string()];
        let mut matcher = PatternMatcher::new();
        let index =
            KeywordIndex::initialize([dir.clone()], &files, &root, &excludes, vocab(), &mut matcher)
                .unwrap();

        assert!(index.lookup_file(&dir.join("index.tsx")).is_some());
        assert!(index.lookup_file(&dir.join("Form.stories.tsx")).is_none());
        assert_eq!(
            index.aggregate_directory(&dir).into_iter().collect::<Vec<_>>(),
            vec!["useState"]
        );
    }
}
