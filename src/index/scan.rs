//! Reference [`Indexer`] that scans a Go module on disk

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};

use super::syntax::GoSyntax;
use super::{FileInfo, Index, IndexBuilder, IndexError, Indexer};
use crate::tags::AnnotationFormat;

/// Name of the module manifest read for the module path
pub const MODULE_FILE: &str = "go.mod";

/// Scans `root/**/*.{extension}` and builds a full index
#[derive(Debug, Clone)]
pub struct SourceIndexer {
    root: PathBuf,
    extension: String,
    format: AnnotationFormat,
    syntax: GoSyntax,
}

impl SourceIndexer {
    /// # Errors
    /// Returns `IndexError::Regex` if the built-in syntax patterns fail to compile.
    pub fn new(
        root: impl Into<PathBuf>,
        extension: impl Into<String>,
        format: AnnotationFormat,
    ) -> Result<Self, IndexError> {
        Ok(Self {
            root: root.into(),
            extension: extension.into(),
            format,
            syntax: GoSyntax::new()?,
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read_module_path(&self) -> Result<String, IndexError> {
        let path = self.root.join(MODULE_FILE);
        if !path.exists() {
            warn!("No {MODULE_FILE} under {}; imports will not resolve locally", self.root.display());
            return Ok(String::new());
        }
        let content = fs::read_to_string(&path).map_err(|source| IndexError::Io {
            path: path.clone(),
            source,
        })?;
        self.syntax
            .module_path(&content)
            .ok_or(IndexError::ModuleFile(path))
    }

    fn scan_file(&self, path: &Path, relative: String) -> Option<FileInfo> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Skipping unreadable file {}: {e}", path.display());
                return None;
            }
        };

        let (tags, errors) = self.format.parse_source(&content);
        for (line, e) in errors {
            warn!("Ignoring malformed tag annotation at {relative}:{line}: {e}");
        }
        let outline = self.syntax.outline(&content);
        let (blank, regular): (Vec<_>, Vec<_>) =
            outline.imports.into_iter().partition(|spec| spec.is_blank());

        Some(
            FileInfo::new(relative)
                .with_size(content.len() as u64)
                .with_tags(tags)
                .with_symbols(outline.symbols)
                .with_imports(regular.into_iter().map(|spec| spec.path))
                .with_blank_imports(blank.into_iter().map(|spec| spec.path))
                .with_init(outline.has_init),
        )
    }
}

impl Indexer for SourceIndexer {
    fn build_index(&self) -> Result<Index, IndexError> {
        let module_path = self.read_module_path()?;
        let pattern = format!(
            "{}/**/*.{}",
            glob::Pattern::escape(&self.root.to_string_lossy()),
            self.extension
        );

        let mut builder = IndexBuilder::new(self.root.clone(), module_path);
        for entry in glob::glob(&pattern)? {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    warn!("Skipping unreadable path: {e}");
                    continue;
                }
            };
            let Some(relative) = relative_path(&self.root, &path) else {
                continue;
            };
            if let Some(file) = self.scan_file(&path, relative) {
                builder.add_file(file);
            }
        }

        let index = builder.build();
        debug!("Indexed {} files under {}", index.len(), self.root.display());
        Ok(index)
    }
}

/// `/`-separated path of `path` below `root`, skipping hidden components
fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let mut parts = Vec::new();
    for component in relative.components() {
        let Component::Normal(part) = component else {
            return None;
        };
        let part = part.to_str()?;
        if part.starts_with('.') {
            return None;
        }
        parts.push(part);
    }
    Some(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::{DEFAULT_MARKER, DEFAULT_MODULE_DECL, Level, TagRef};
    use tempfile::TempDir;

    fn indexer(root: &Path) -> SourceIndexer {
        let format = AnnotationFormat::new(DEFAULT_MARKER, DEFAULT_MODULE_DECL).unwrap();
        SourceIndexer::new(root, "go", format).unwrap()
    }

    fn write(root: &Path, path: &str, content: &str) {
        let full = root.join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, content).unwrap();
    }

    #[test]
    fn test_build_index_from_disk() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "go.mod", "module example.com/app\n\ngo 1.22\n");
        write(
            root,
            "main.go",
            "package main\n// @tags: #focus(x)\n\nimport \"example.com/app/shield\"\n\nfunc main() { shield.Foo() }\n",
        );
        write(root, "shield/shield.go", "package shield\n\nfunc Foo() {}\n");
        write(root, ".hidden/skip.go", "package hidden\n");
        write(root, "notes.txt", "not go");

        let index = indexer(root).build_index().unwrap();
        assert_eq!(index.module_path(), "example.com/app");
        assert_eq!(index.len(), 2);

        let main = index.file("main.go").unwrap();
        assert_eq!(main.package, ".");
        assert!(main.tags.contains(&TagRef::label("focus", Level::Direct, Level::Direct, "x")));
        assert_eq!(main.imports, vec!["example.com/app/shield"]);

        let shield = index.package("shield").unwrap();
        assert_eq!(shield.symbols.get("Foo").map(String::as_str), Some("shield/shield.go"));
        assert_eq!(index.importers_of("shield"), ["main.go".to_string()]);
    }

    #[test]
    fn test_malformed_annotation_keeps_file() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "go.mod", "module example.com/app\n");
        write(root, "bad.go", "package main\n// @tags: #focus(x\n");

        let index = indexer(root).build_index().unwrap();
        let bad = index.file("bad.go").unwrap();
        assert!(bad.tags.is_empty());
    }

    #[test]
    fn test_valid_lines_survive_a_malformed_neighbour() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "go.mod", "module example.com/app\n");
        write(root, "mixed.go", "package main\n// @tags: #focus(x)\n// @tags: #dev(oops\n");

        let index = indexer(root).build_index().unwrap();
        let tags = &index.file("mixed.go").unwrap().tags;
        assert!(tags.contains(&TagRef::category("focus")));
        assert!(!tags.contains(&TagRef::category("dev")));
    }

    #[test]
    fn test_missing_module_file_is_tolerated() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "a.go", "package a\n");
        let index = indexer(temp.path()).build_index().unwrap();
        assert_eq!(index.module_path(), "");
        assert!(index.contains("a.go"));
    }

    #[test]
    fn test_module_file_without_declaration_is_error() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "go.mod", "go 1.22\n");
        assert!(matches!(
            indexer(temp.path()).build_index(),
            Err(IndexError::ModuleFile(_))
        ));
    }
}
