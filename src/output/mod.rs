//! Output resolution and formatting
//!
//! This module turns a selection into the canonical export list (selection,
//! expansion and always-include files, sorted and deduplicated) and
//! provides the CLI formatting helpers for that list and its statistics.

use std::collections::BTreeSet;
use std::fmt;

use byte_unit::{Byte, UnitType};
use colored::Colorize;
use serde::Serialize;

use crate::expand::{AnalysisCache, ExpansionDepth, expand};
use crate::index::{DependencyAnalyzer, Index};
use crate::selection::Selection;

/// Prefix used when rendering relative paths for export
pub const PATH_PREFIX: &str = "./";

/// Whether and how far to expand the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpansionSettings {
    pub enabled: bool,
    pub depth: ExpansionDepth,
}

impl Default for ExpansionSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            depth: ExpansionDepth::default(),
        }
    }
}

/// Compute the sorted, deduplicated export list
///
/// Selected paths still in the index, the expansion of the selection (when
/// enabled and the selection is non-empty) and every always-include file.
pub fn compute_output_files<A>(
    selection: &Selection,
    index: &Index,
    analyzer: &A,
    cache: &mut AnalysisCache,
    settings: ExpansionSettings,
) -> Vec<String>
where
    A: DependencyAnalyzer + ?Sized,
{
    let mut files: BTreeSet<String> = selection
        .iter()
        .filter(|path| index.contains(path))
        .map(str::to_string)
        .collect();

    if settings.enabled && !selection.is_empty() {
        files.extend(expand(selection, index, analyzer, cache, settings.depth));
    }

    files.extend(
        index
            .files()
            .filter(|file| file.always_include)
            .map(|file| file.path.clone()),
    );

    files.into_iter().collect()
}

/// File counts and sizes of an export, split into direct and implied files
///
/// Direct files are selected or always-include; implied files come from
/// expansion only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutputStats {
    pub direct_files: usize,
    pub direct_bytes: u64,
    pub implied_files: usize,
    pub implied_bytes: u64,
}

impl OutputStats {
    #[must_use]
    pub const fn total_files(&self) -> usize {
        self.direct_files + self.implied_files
    }

    #[must_use]
    pub const fn total_bytes(&self) -> u64 {
        self.direct_bytes + self.implied_bytes
    }
}

impl fmt::Display for OutputStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Direct:  {} file(s), {}",
            self.direct_files,
            format_bytes(self.direct_bytes)
        )?;
        writeln!(
            f,
            "Implied: {} file(s), {}",
            self.implied_files,
            format_bytes(self.implied_bytes)
        )?;
        write!(
            f,
            "Total:   {} file(s), {}",
            self.total_files(),
            format_bytes(self.total_bytes())
        )
    }
}

/// Re-resolve the export list and partition it into direct and implied files
pub fn compute_stats<A>(
    selection: &Selection,
    index: &Index,
    analyzer: &A,
    cache: &mut AnalysisCache,
    settings: ExpansionSettings,
) -> OutputStats
where
    A: DependencyAnalyzer + ?Sized,
{
    let mut stats = OutputStats::default();
    for path in compute_output_files(selection, index, analyzer, cache, settings) {
        let Some(file) = index.file(&path) else {
            continue;
        };
        if !is_implied(selection, index, &path) {
            stats.direct_files += 1;
            stats.direct_bytes += file.size;
        } else {
            stats.implied_files += 1;
            stats.implied_bytes += file.size;
        }
    }
    stats
}

/// An exported file present only through expansion: neither selected nor always-include
#[must_use]
pub fn is_implied(selection: &Selection, index: &Index, path: &str) -> bool {
    !selection.contains(path) && !index.file(path).is_some_and(|file| file.always_include)
}

/// Render the export list, one `./`-prefixed path per line
#[must_use]
pub fn render_file_list(files: &[String]) -> String {
    files
        .iter()
        .map(|path| format!("{PATH_PREFIX}{path}\n"))
        .collect()
}

/// Human-readable size, e.g. `1.5 KiB`
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    Byte::from_u64(bytes)
        .get_appropriate_unit(UnitType::Binary)
        .to_string()
}

/// Format a file line for terminal display, marking implied files
#[must_use]
pub fn file_line(path: &str, implied: bool, quiet: bool) -> String {
    let rendered = format!("{PATH_PREFIX}{path}");
    if quiet {
        rendered
    } else if implied {
        format!("  {} {}", rendered.cyan(), "(implied)".dimmed())
    } else {
        format!("  {}", rendered.green())
    }
}
