//! Reference [`DependencyAnalyzer`] based on selector expressions

use std::collections::HashMap;
use std::fs;

use tracing::trace;

use super::syntax::GoSyntax;
use super::{AnalysisError, DependencyAnalysis, DependencyAnalyzer, Index, IndexError};

/// Re-reads a file and collects `pkg.Symbol` references per import
///
/// Only qualifiers bound by an import in the same file count, so local
/// method calls like `s.Render()` are ignored.
#[derive(Debug, Clone)]
pub struct SourceAnalyzer {
    syntax: GoSyntax,
}

impl SourceAnalyzer {
    /// # Errors
    /// Returns `IndexError::Regex` if the built-in syntax patterns fail to compile.
    pub fn new() -> Result<Self, IndexError> {
        Ok(Self {
            syntax: GoSyntax::new()?,
        })
    }

    /// Analyze source text directly
    #[must_use]
    pub fn analyze_source(&self, source: &str) -> DependencyAnalysis {
        let outline = self.syntax.outline(source);
        let qualifiers: HashMap<&str, &str> = outline
            .imports
            .iter()
            .filter_map(|spec| Some((spec.local_name()?, spec.path.as_str())))
            .collect();

        let mut analysis = DependencyAnalysis::new();
        for line in source.lines() {
            let trimmed = line.trim_start();
            if trimmed.starts_with("//") || trimmed.starts_with("import") {
                continue;
            }
            for (qualifier, symbol) in self.syntax.selectors(line) {
                if let Some(path) = qualifiers.get(qualifier) {
                    analysis
                        .entry((*path).to_string())
                        .or_default()
                        .insert(symbol.to_string());
                }
            }
        }
        analysis
    }
}

impl DependencyAnalyzer for SourceAnalyzer {
    fn analyze(&self, index: &Index, path: &str) -> Result<DependencyAnalysis, AnalysisError> {
        if !index.contains(path) {
            return Err(AnalysisError::UnknownFile(path.to_string()));
        }
        let full = index.root().join(path);
        let source = fs::read_to_string(&full).map_err(|source| AnalysisError::Io {
            path: full.clone(),
            source,
        })?;
        let analysis = self.analyze_source(&source);
        trace!("Analyzed {path}: {} imports used", analysis.len());
        Ok(analysis)
    }
}
