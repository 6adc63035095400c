//! File/package index consumed by selection, expansion and editing
//!
//! The index is an immutable snapshot: it is built once by an [`Indexer`]
//! and rebuilt from scratch after every commit. It exposes:
//! - per-file [`FileInfo`] (tags, size, symbols, imports)
//! - per-package [`PackageInfo`] (sorted file list, symbol → defining file)
//! - the module path and a reverse-dependency table (package → importers)
//!
//! Per-file symbol usage comes from a separate [`DependencyAnalyzer`], since
//! it is expensive and only needed on demand during expansion.

pub mod analyzer;
pub mod error;
pub mod scan;
pub mod syntax;
pub mod types;

pub use analyzer::SourceAnalyzer;
pub use error::{AnalysisError, IndexError};
pub use scan::SourceIndexer;
pub use types::{FileInfo, PackageInfo, ROOT_PACKAGE, package_dir};

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Import path → symbols referenced through it
pub type DependencyAnalysis = BTreeMap<String, BTreeSet<String>>;

/// Builds a complete index from some source of truth
pub trait Indexer {
    /// # Errors
    /// Returns `IndexError` if the index cannot be built at all.
    fn build_index(&self) -> Result<Index, IndexError>;
}

/// Produces symbol-usage data for one file on demand
pub trait DependencyAnalyzer {
    /// # Errors
    /// Returns `AnalysisError` if the file cannot be analyzed.
    fn analyze(&self, index: &Index, path: &str) -> Result<DependencyAnalysis, AnalysisError>;
}

/// Immutable snapshot of an indexed codebase
#[derive(Debug, Clone, Default)]
pub struct Index {
    root: PathBuf,
    module_path: String,
    files: BTreeMap<String, FileInfo>,
    packages: BTreeMap<String, PackageInfo>,
    importers: BTreeMap<String, Vec<String>>,
}

impl Index {
    /// Directory the relative paths are anchored at
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn module_path(&self) -> &str {
        &self.module_path
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    #[must_use]
    pub fn file(&self, path: &str) -> Option<&FileInfo> {
        self.files.get(path)
    }

    /// All files, sorted by path
    pub fn files(&self) -> impl Iterator<Item = &FileInfo> {
        self.files.values()
    }

    #[must_use]
    pub fn package(&self, dir: &str) -> Option<&PackageInfo> {
        self.packages.get(dir)
    }

    /// Files importing the package at `dir` (sorted, deduplicated)
    #[must_use]
    pub fn importers_of(&self, dir: &str) -> &[String] {
        self.importers.get(dir).map_or(&[], Vec::as_slice)
    }

    /// Map an import path onto a local package directory
    ///
    /// The module path itself maps to [`ROOT_PACKAGE`]; `module/sub/pkg` maps
    /// to `sub/pkg`; anything else is external.
    #[must_use]
    pub fn local_package_dir(&self, import_path: &str) -> Option<String> {
        if self.module_path.is_empty() {
            return None;
        }
        if import_path == self.module_path {
            return Some(ROOT_PACKAGE.to_string());
        }
        import_path
            .strip_prefix(self.module_path.as_str())?
            .strip_prefix('/')
            .filter(|suffix| !suffix.is_empty())
            .map(str::to_string)
    }

    /// Resolve an import path to a local package present in the index
    #[must_use]
    pub fn resolve_package(&self, import_path: &str) -> Option<&PackageInfo> {
        self.local_package_dir(import_path)
            .and_then(|dir| self.packages.get(&dir))
    }
}

/// Assembles an [`Index`] from individual files
///
/// Derived tables (package file lists, symbol tables, importers, the
/// always-include flag) are computed in [`IndexBuilder::build`].
#[derive(Debug, Default)]
pub struct IndexBuilder {
    root: PathBuf,
    module_path: String,
    files: BTreeMap<String, FileInfo>,
}

impl IndexBuilder {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, module_path: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            module_path: module_path.into(),
            files: BTreeMap::new(),
        }
    }

    /// Add a file, replacing any previous entry with the same path
    pub fn add_file(&mut self, file: FileInfo) -> &mut Self {
        self.files.insert(file.path.clone(), file);
        self
    }

    #[must_use]
    pub fn build(self) -> Index {
        let mut index = Index {
            root: self.root,
            module_path: self.module_path,
            files: self.files,
            packages: BTreeMap::new(),
            importers: BTreeMap::new(),
        };

        for file in index.files.values_mut() {
            file.always_include |= file.tags.is_always_include();
        }

        // BTreeMap iteration keeps every package's file list sorted
        for file in index.files.values() {
            let package = index
                .packages
                .entry(file.package.clone())
                .or_insert_with(|| PackageInfo {
                    dir: file.package.clone(),
                    ..PackageInfo::default()
                });
            package.files.push(file.path.clone());
            for symbol in &file.symbols {
                package
                    .symbols
                    .entry(symbol.clone())
                    .or_insert_with(|| file.path.clone());
            }
        }

        let mut importers: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for file in index.files.values() {
            for import in file.imports.iter().chain(&file.blank_imports) {
                if let Some(dir) = index.local_package_dir(import) {
                    importers.entry(dir).or_default().insert(file.path.clone());
                }
            }
        }
        index.importers = importers
            .into_iter()
            .map(|(dir, files)| (dir, files.into_iter().collect()))
            .collect();

        index
    }
}
