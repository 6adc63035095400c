//! Line-oriented extraction of Go declarations and imports
//!
//! This is a lightweight stand-in for a real parser: it recognises
//! top-level declarations, import specs (single and grouped), `func init()`
//! and `pkg.Symbol` selector expressions. Good enough to drive indexing and
//! expansion on conventionally formatted (`gofmt`) sources.

use regex::Regex;
use std::collections::BTreeSet;

/// One import spec
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    /// Explicit alias (`_`, `.`, or a name), if any
    pub alias: Option<String>,
    pub path: String,
}

impl ImportSpec {
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.alias.as_deref() == Some("_")
    }

    /// Name the importing file uses to refer to the package
    ///
    /// `None` for blank and dot imports, which introduce no qualifier.
    #[must_use]
    pub fn local_name(&self) -> Option<&str> {
        match self.alias.as_deref() {
            Some("_" | ".") => None,
            Some(alias) => Some(alias),
            None => self.path.rsplit('/').next(),
        }
    }
}

/// Declarations extracted from one file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceOutline {
    pub symbols: BTreeSet<String>,
    pub imports: Vec<ImportSpec>,
    pub has_init: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    None,
    Import,
    Decl,
}

/// Compiled patterns for Go source
#[derive(Debug, Clone)]
pub struct GoSyntax {
    func: Regex,
    decl: Regex,
    block_open: Regex,
    block_item: Regex,
    import_spec: Regex,
    selector: Regex,
    module: Regex,
}

impl GoSyntax {
    /// # Errors
    /// Returns `regex::Error` if a pattern fails to compile.
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            func: Regex::new(r"^func\s+([A-Za-z_]\w*)\s*[\[(]")?,
            decl: Regex::new(r"^(?:type|var|const)\s+([A-Za-z_]\w*)")?,
            block_open: Regex::new(r"^(import|type|var|const)\s*\(\s*$")?,
            block_item: Regex::new(r"^\s+([A-Za-z_]\w*)")?,
            import_spec: Regex::new(r#"^\s*(?:import\s+)?(?:([A-Za-z_]\w*|\.)\s+)?"([^"]+)""#)?,
            selector: Regex::new(r"\b([A-Za-z_]\w*)\.([A-Za-z_]\w*)")?,
            module: Regex::new(r"^\s*module\s+(\S+)")?,
        })
    }

    /// Extract the module path from a `go.mod` file
    #[must_use]
    pub fn module_path(&self, go_mod: &str) -> Option<String> {
        go_mod
            .lines()
            .find_map(|line| self.module.captures(line))
            .map(|caps| caps[1].trim_matches('"').to_string())
    }

    /// Collect top-level symbols, imports and the init flag
    #[must_use]
    pub fn outline(&self, source: &str) -> SourceOutline {
        let mut outline = SourceOutline::default();
        let mut block = Block::None;

        for line in source.lines() {
            let trimmed = line.trim();
            if trimmed.starts_with("//") {
                continue;
            }

            match block {
                Block::Import => {
                    if trimmed.starts_with(')') {
                        block = Block::None;
                    } else if let Some(spec) = self.import(line) {
                        outline.imports.push(spec);
                    }
                    continue;
                }
                Block::Decl => {
                    if trimmed.starts_with(')') {
                        block = Block::None;
                    } else if let Some(caps) = self.block_item.captures(line) {
                        outline.symbols.insert(caps[1].to_string());
                    }
                    continue;
                }
                Block::None => {}
            }

            if let Some(caps) = self.block_open.captures(line) {
                block = if &caps[1] == "import" { Block::Import } else { Block::Decl };
            } else if line.starts_with("import") {
                if let Some(spec) = self.import(line) {
                    outline.imports.push(spec);
                }
            } else if let Some(caps) = self.func.captures(line) {
                if &caps[1] == "init" {
                    outline.has_init = true;
                } else {
                    outline.symbols.insert(caps[1].to_string());
                }
            } else if let Some(caps) = self.decl.captures(line) {
                outline.symbols.insert(caps[1].to_string());
            }
        }
        outline
    }

    fn import(&self, line: &str) -> Option<ImportSpec> {
        self.import_spec.captures(line).map(|caps| ImportSpec {
            alias: caps.get(1).map(|m| m.as_str().to_string()),
            path: caps[2].to_string(),
        })
    }

    /// Iterate `(qualifier, symbol)` pairs of selector expressions in `line`
    pub fn selectors<'a>(&'a self, line: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.selector.captures_iter(line).filter_map(|caps| {
            let qualifier = caps.get(1)?.as_str();
            let symbol = caps.get(2)?.as_str();
            Some((qualifier, symbol))
        })
    }
}
