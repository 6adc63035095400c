use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::tags::TagSet;

/// Package directory used for files at the module root
pub const ROOT_PACKAGE: &str = ".";

/// Everything the index knows about one source file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileInfo {
    /// Path relative to the index root, `/`-separated
    pub path: String,
    /// Directory of the file, [`ROOT_PACKAGE`] at the root
    pub package: String,
    /// Size in bytes
    pub size: u64,
    /// Merged tags from every annotation line
    pub tags: TagSet,
    /// Forced into every export
    pub always_include: bool,
    /// Top-level symbols defined by the file
    pub symbols: BTreeSet<String>,
    /// Regular imports, as written
    pub imports: Vec<String>,
    /// Side-effect-only imports, as written
    pub blank_imports: Vec<String>,
    /// Defines a package initializer
    pub has_init: bool,
}

impl FileInfo {
    /// Create an untagged, empty entry for `path`
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let package = package_dir(&path);
        Self {
            path,
            package,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_tags(mut self, tags: TagSet) -> Self {
        self.tags = tags;
        self
    }

    #[must_use]
    pub const fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn with_symbols<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.symbols = symbols.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_imports<I, S>(mut self, imports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.imports = imports.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_blank_imports<I, S>(mut self, imports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.blank_imports = imports.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub const fn with_init(mut self, has_init: bool) -> Self {
        self.has_init = has_init;
        self
    }
}

/// One local package (directory)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageInfo {
    /// Package directory relative to the index root
    pub dir: String,
    /// Member files, sorted by path
    pub files: Vec<String>,
    /// Symbol → defining file; the first definer in file order wins
    pub symbols: BTreeMap<String, String>,
}

/// Directory component of a relative path, [`ROOT_PACKAGE`] when there is none
#[must_use]
pub fn package_dir(path: &str) -> String {
    match Path::new(path).parent().and_then(Path::to_str) {
        Some(parent) if !parent.is_empty() => parent.to_string(),
        _ => ROOT_PACKAGE.to_string(),
    }
}
