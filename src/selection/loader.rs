//! Rebuild a selection from an exported file list
//!
//! Each non-empty line not starting with `#` is one pattern; a leading
//! `./` is ignored. Supported forms:
//! - `path/to/file.go` exact path
//! - `dir/**` every file beneath `dir`
//! - `*.go` file-name glob, matched in any directory
//! - `dir/*` (or any other glob containing `/`) matched against the whole
//!   path, one directory level per `*`

use std::fs;
use std::path::Path;

use glob::{MatchOptions, Pattern as GlobPattern};
use tracing::debug;

use super::{Selection, SelectionError};
use crate::index::Index;

const COMMENT_PREFIX: char = '#';
const RECURSIVE_SUFFIX: &str = "/**";

const PATH_MATCH: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// One line of a selection list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListPattern {
    Exact(String),
    Recursive(String),
    FileName(GlobPattern),
    Path(GlobPattern),
}

impl ListPattern {
    /// Parse one line; `Ok(None)` for blank and comment lines
    ///
    /// # Errors
    /// Returns `SelectionError::InvalidPattern` if a glob fails to compile.
    pub fn parse(line_no: usize, line: &str) -> Result<Option<Self>, SelectionError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
            return Ok(None);
        }
        let entry = line.strip_prefix("./").unwrap_or(line);

        if let Some(dir) = entry.strip_suffix(RECURSIVE_SUFFIX) {
            return Ok(Some(Self::Recursive(dir.trim_end_matches('/').to_string())));
        }
        if !entry.contains(['*', '?', '[']) {
            return Ok(Some(Self::Exact(entry.to_string())));
        }

        let compiled = GlobPattern::new(entry)
            .map_err(|e| SelectionError::invalid_pattern(line_no, entry, &e.to_string()))?;
        Ok(Some(if entry.contains('/') {
            Self::Path(compiled)
        } else {
            Self::FileName(compiled)
        }))
    }

    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Exact(exact) => exact == path,
            Self::Recursive(dir) if dir.is_empty() || dir == "." => true,
            Self::Recursive(dir) => path
                .strip_prefix(dir.as_str())
                .is_some_and(|rest| rest.starts_with('/')),
            Self::FileName(pattern) => {
                let name = path.rsplit('/').next().unwrap_or(path);
                pattern.matches(name)
            }
            Self::Path(pattern) => pattern.matches_with(path, PATH_MATCH),
        }
    }
}

/// Add every indexed path matched by `text` to `selection`
///
/// Unknown exact paths are skipped. Returns the number of paths added.
///
/// # Errors
/// Returns `SelectionError::InvalidPattern` for the first malformed glob;
/// nothing is selected in that case.
pub fn load_selection(
    text: &str,
    index: &Index,
    selection: &mut Selection,
) -> Result<usize, SelectionError> {
    let patterns = text
        .lines()
        .enumerate()
        .filter_map(|(i, line)| ListPattern::parse(i + 1, line).transpose())
        .collect::<Result<Vec<_>, _>>()?;

    let mut added = 0;
    for pattern in &patterns {
        if let ListPattern::Exact(path) = pattern {
            if selection.select_path(index, path) {
                added += 1;
            } else if !index.contains(path) {
                debug!("Skipping unknown path in selection list: {path}");
            }
            continue;
        }
        for file in index.files() {
            if pattern.matches(&file.path) && selection.select_path(index, &file.path) {
                added += 1;
            }
        }
    }
    Ok(added)
}

/// Read a selection list from disk and apply it
///
/// # Errors
/// Returns `SelectionError::Io` if the file cannot be read, or any error
/// from [`load_selection`].
pub fn read_selection_file(
    path: &Path,
    index: &Index,
    selection: &mut Selection,
) -> Result<usize, SelectionError> {
    let text = fs::read_to_string(path).map_err(|source| SelectionError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_selection(&text, index, selection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::FileInfo;
    use crate::testing::index_of;

    fn sample_index() -> Index {
        index_of([
            FileInfo::new("main.go"),
            FileInfo::new("cmd/tool/main.go"),
            FileInfo::new("cmd/tool/flags.go"),
            FileInfo::new("cmd/run.go"),
            FileInfo::new("lib/util.go"),
            FileInfo::new("lib/util_test.go"),
        ])
    }

    fn load(text: &str) -> (usize, Vec<String>) {
        let index = sample_index();
        let mut selection = Selection::new();
        let added = load_selection(text, &index, &mut selection).unwrap();
        (added, selection.iter().map(str::to_string).collect())
    }

    #[test]
    fn test_exact_paths_and_comments() {
        let (added, selected) = load("# exported list\n./main.go\n\nlib/util.go\nmissing.go\n");
        assert_eq!(added, 2);
        assert_eq!(selected, vec!["lib/util.go", "main.go"]);
    }

    #[test]
    fn test_recursive_directory() {
        let (_, selected) = load("./cmd/**\n");
        assert_eq!(selected, vec!["cmd/run.go", "cmd/tool/flags.go", "cmd/tool/main.go"]);
    }

    #[test]
    fn test_suffix_glob_matches_any_directory() {
        let (_, selected) = load("*_test.go\n");
        assert_eq!(selected, vec!["lib/util_test.go"]);
    }

    #[test]
    fn test_single_level_glob() {
        let (_, selected) = load("cmd/*\n");
        assert_eq!(selected, vec!["cmd/run.go"]);
    }

    #[test]
    fn test_duplicates_count_once() {
        let (added, selected) = load("main.go\n./main.go\n*.go\n");
        assert_eq!(added, 6);
        assert_eq!(selected.len(), 6);
    }

    #[test]
    fn test_invalid_glob_is_reported_with_line() {
        let index = sample_index();
        let mut selection = Selection::new();
        let err = load_selection("main.go\nlib/[*.go\n", &index, &mut selection).unwrap_err();
        assert!(matches!(err, SelectionError::InvalidPattern { line: 2, .. }));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_read_missing_file() {
        let index = sample_index();
        let mut selection = Selection::new();
        let result = read_selection_file(Path::new("/definitely/missing.txt"), &index, &mut selection);
        assert!(matches!(result, Err(SelectionError::Io { .. })));
    }
}
