//! Testing utilities for taglens
//!
//! This module provides in-memory index fixtures, a scripted
//! [`DependencyAnalyzer`], and a `TestTree` wrapper for tests that need
//! real files on disk.
//!
//! Only available when compiled with `cfg(test)`.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::index::{
    AnalysisError, DependencyAnalysis, DependencyAnalyzer, FileInfo, Index, IndexBuilder, Indexer,
    SourceIndexer,
};
use crate::tags::{AnnotationFormat, DEFAULT_MARKER, DEFAULT_MODULE_DECL, parse_annotation};

/// Module path used by every fixture
pub const MODULE: &str = "example.com/app";

/// Build a file entry carrying the tags of `annotation`
///
/// # Panics
/// Panics if `annotation` does not parse.
#[must_use]
pub fn tagged(path: &str, annotation: &str) -> FileInfo {
    FileInfo::new(path).with_tags(parse_annotation(annotation).expect("fixture annotation"))
}

/// Build an index from `files` under [`MODULE`]
#[must_use]
pub fn index_of(files: impl IntoIterator<Item = FileInfo>) -> Index {
    let mut builder = IndexBuilder::new("/fixture", MODULE);
    for file in files {
        builder.add_file(file);
    }
    builder.build()
}

/// Full import path of a local package directory
#[must_use]
pub fn import(dir: &str) -> String {
    format!("{MODULE}/{dir}")
}

/// A small dependency graph
///
/// - `main.go` uses `shield.Foo` and blank-imports `plugins`
/// - `shield/foo.go` defines `Foo` and uses `core.Color`
/// - `core/color.go` defines `Color` and uses `shield.Foo` (a cycle)
/// - `plugins/` has two initializer files; `plugins/b.go` sorts first
/// - `docs/all.go` is always-include
#[must_use]
pub fn graph_index() -> Index {
    index_of([
        tagged("main.go", "#app(entry)")
            .with_imports([import("shield"), "fmt".to_string()])
            .with_blank_imports([import("plugins")])
            .with_size(100),
        tagged("shield/foo.go", "#dev{feature[shield(render)]}")
            .with_symbols(["Foo"])
            .with_imports([import("core")])
            .with_size(40),
        FileInfo::new("shield/bar.go").with_symbols(["Bar"]).with_size(10),
        FileInfo::new("core/color.go")
            .with_symbols(["Color"])
            .with_imports([import("shield")])
            .with_size(20),
        FileInfo::new("plugins/a.go").with_symbols(["Registry"]),
        FileInfo::new("plugins/b.go").with_init(true),
        FileInfo::new("plugins/c.go").with_init(true),
        tagged("docs/all.go", "#all(*)").with_size(5),
    ])
}

/// Analyzer answers matching [`graph_index`]
#[must_use]
pub fn graph_analyzer() -> StaticAnalyzer {
    StaticAnalyzer::new()
        .with("main.go", &import("shield"), &["Foo", "Missing"])
        .with("main.go", "fmt", &["Println"])
        .with("shield/foo.go", &import("core"), &["Color"])
        .with("core/color.go", &import("shield"), &["Foo"])
}

/// Scripted [`DependencyAnalyzer`] that records every call
///
/// Files without a script analyze to an empty result; files marked with
/// [`StaticAnalyzer::failing`] return an error.
#[derive(Debug, Default)]
pub struct StaticAnalyzer {
    analyses: HashMap<String, DependencyAnalysis>,
    failing: HashSet<String>,
    calls: RefCell<Vec<String>>,
}

impl StaticAnalyzer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, path: &str, import: &str, symbols: &[&str]) -> Self {
        self.analyses
            .entry(path.to_string())
            .or_default()
            .entry(import.to_string())
            .or_default()
            .extend(symbols.iter().map(|s| (*s).to_string()));
        self
    }

    #[must_use]
    pub fn failing(mut self, path: &str) -> Self {
        self.failing.insert(path.to_string());
        self
    }

    /// Paths analyzed so far, in call order
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl DependencyAnalyzer for StaticAnalyzer {
    fn analyze(&self, _index: &Index, path: &str) -> Result<DependencyAnalysis, AnalysisError> {
        self.calls.borrow_mut().push(path.to_string());
        if self.failing.contains(path) {
            return Err(AnalysisError::Io {
                path: PathBuf::from(path),
                source: io::Error::other("scripted failure"),
            });
        }
        Ok(self.analyses.get(path).cloned().unwrap_or_default())
    }
}

/// Collect string literals into a sorted set
#[must_use]
pub fn paths(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Default annotation format
///
/// # Panics
/// Panics if the built-in module-declaration pattern fails to compile.
#[must_use]
pub fn default_format() -> AnnotationFormat {
    AnnotationFormat::new(DEFAULT_MARKER, DEFAULT_MODULE_DECL).expect("default format")
}

/// Temporary Go module on disk, removed on drop
///
/// # Examples
/// ```ignore
/// let tree = TestTree::new();
/// tree.write("main.go", "package main\n");
/// let index = tree.index();
/// assert!(index.contains("main.go"));
/// ```
pub struct TestTree {
    dir: TempDir,
}

impl TestTree {
    /// Create an empty module with a `go.mod` declaring [`MODULE`]
    ///
    /// # Panics
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let tree = Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        };
        tree.write("go.mod", &format!("module {MODULE}\n\ngo 1.22\n"));
        tree
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write `content` to `path`, creating parent directories
    ///
    /// # Panics
    /// Panics if the file cannot be written.
    pub fn write(&self, path: &str, content: &str) {
        let full = self.root().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(full, content).expect("Failed to write test file");
    }

    /// # Panics
    /// Panics if the file cannot be read.
    #[must_use]
    pub fn read(&self, path: &str) -> String {
        fs::read_to_string(self.root().join(path)).expect("Failed to read test file")
    }

    /// Scan the tree with the default format
    ///
    /// # Panics
    /// Panics if scanning fails.
    #[must_use]
    pub fn index(&self) -> Index {
        SourceIndexer::new(self.root(), "go", default_format())
            .and_then(|indexer| indexer.build_index())
            .expect("Failed to index test tree")
    }
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}
