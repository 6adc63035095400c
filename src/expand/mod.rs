//! Bounded breadth-first expansion along symbol-usage edges
//!
//! Starting from the selection, each file is analyzed (once, memoized in an
//! [`AnalysisCache`]) and every file defining a symbol it uses from a local
//! package is pulled in one hop further. Blank imports pull in the
//! package's first file that defines an initializer. The walk stops at
//! [`ExpansionDepth`] hops from the selection.
//!
//! Nothing here aborts: unknown imports, unresolved symbols and analysis
//! failures simply contribute no edges.

pub mod error;

pub use error::DepthError;

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::index::{DependencyAnalysis, DependencyAnalyzer, Index};
use crate::selection::Selection;

/// Maximum number of file-to-file hops from the selection (1..=5)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExpansionDepth(u8);

impl ExpansionDepth {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// # Errors
    /// Returns `DepthError::OutOfRange` unless `depth` is within `1..=5`.
    pub fn new(depth: u8) -> Result<Self, DepthError> {
        if depth < Self::MIN || depth > Self::MAX {
            return Err(DepthError::OutOfRange {
                depth,
                min: Self::MIN,
                max: Self::MAX,
            });
        }
        Ok(Self(depth))
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl Default for ExpansionDepth {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl TryFrom<u8> for ExpansionDepth {
    type Error = DepthError;

    fn try_from(depth: u8) -> Result<Self, Self::Error> {
        Self::new(depth)
    }
}

impl FromStr for ExpansionDepth {
    type Err = DepthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let depth = s
            .trim()
            .parse::<u8>()
            .map_err(|_| DepthError::NotANumber(s.to_string()))?;
        Self::new(depth)
    }
}

impl fmt::Display for ExpansionDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-file analysis results, keyed by path
///
/// Successful analyses are kept for the lifetime of the cache; failures
/// are not stored, so a later call retries them.
#[derive(Debug, Default)]
pub struct AnalysisCache {
    entries: HashMap<String, DependencyAnalysis>,
}

impl AnalysisCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&DependencyAnalysis> {
        self.entries.get(path)
    }

    /// Return the cached analysis of `path`, computing it on a miss
    ///
    /// Returns `None` when the analyzer fails.
    pub fn get_or_analyze<A>(
        &mut self,
        index: &Index,
        analyzer: &A,
        path: &str,
    ) -> Option<&DependencyAnalysis>
    where
        A: DependencyAnalyzer + ?Sized,
    {
        if !self.entries.contains_key(path) {
            match analyzer.analyze(index, path) {
                Ok(analysis) => {
                    self.entries.insert(path.to_string(), analysis);
                }
                Err(e) => {
                    debug!("Dependency analysis failed for {path}: {e}");
                    return None;
                }
            }
        }
        self.entries.get(path)
    }

    /// Drop every entry; required after a reindex
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Files reachable from `selection` within `depth` hops, excluding the selection
pub fn expand<A>(
    selection: &Selection,
    index: &Index,
    analyzer: &A,
    cache: &mut AnalysisCache,
    depth: ExpansionDepth,
) -> BTreeSet<String>
where
    A: DependencyAnalyzer + ?Sized,
{
    let mut visited: HashSet<String> = selection.iter().map(str::to_string).collect();
    let mut frontier: VecDeque<(String, u8)> =
        selection.iter().map(|path| (path.to_string(), 0)).collect();
    let mut implied = BTreeSet::new();

    while let Some((path, hops)) = frontier.pop_front() {
        if hops >= depth.get() {
            continue;
        }

        let Some(analysis) = cache.get_or_analyze(index, analyzer, &path) else {
            continue;
        };
        let mut reached = used_symbol_files(index, analysis);
        reached.extend(initializer_files(index, &path));

        for file in reached {
            if visited.insert(file.clone()) {
                implied.insert(file.clone());
                frontier.push_back((file, hops + 1));
            }
        }
    }

    debug!(
        "Expanded {} selected files by {} implied (depth {depth})",
        selection.len(),
        implied.len()
    );
    implied
}

/// Defining files of every resolvable symbol in `analysis`
fn used_symbol_files(index: &Index, analysis: &DependencyAnalysis) -> Vec<String> {
    let mut files = Vec::new();
    for (import, symbols) in analysis {
        let Some(package) = index.resolve_package(import) else {
            continue;
        };
        files.extend(
            symbols
                .iter()
                .filter_map(|symbol| package.symbols.get(symbol))
                .cloned(),
        );
    }
    files
}

/// First initializer-bearing file of each blank-imported local package
fn initializer_files(index: &Index, path: &str) -> Vec<String> {
    let Some(info) = index.file(path) else {
        return Vec::new();
    };
    info.blank_imports
        .iter()
        .filter_map(|import| index.resolve_package(import))
        .filter_map(|package| {
            package
                .files
                .iter()
                .find(|file| index.file(file).is_some_and(|f| f.has_init))
                .cloned()
        })
        .collect()
}
