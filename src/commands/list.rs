//! List command implementation
//!
//! Resolves the export list for a selection: selected files, the files they
//! depend on within the configured number of hops, and always-include files.

use std::fs;
use std::path::Path;

use colored::Colorize;
use serde::Serialize;

use super::Workspace;
use crate::cli::{OutputFormat, SelectionArgs};
use crate::expand::{AnalysisCache, ExpansionDepth};
use crate::index::SourceAnalyzer;
use crate::output::{
    ExpansionSettings, OutputStats, compute_output_files, compute_stats, file_line, is_implied,
    render_file_list,
};
use crate::LensError;

type Result<T> = std::result::Result<T, LensError>;

/// Options of the list command beyond the selection
#[derive(Debug, Clone, Default)]
pub struct ListOptions<'a> {
    pub no_expand: bool,
    pub depth: Option<ExpansionDepth>,
    pub stats: bool,
    pub format: OutputFormat,
    pub output: Option<&'a Path>,
}

#[derive(Debug, Serialize)]
struct ListReport<'a> {
    files: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<OutputStats>,
}

/// Execute the list command
///
/// # Errors
/// Returns `LensError` if the selection cannot be built, the analyzer cannot
/// be created, or the output cannot be written.
pub fn execute(
    ws: &Workspace,
    selection_args: &SelectionArgs,
    options: &ListOptions<'_>,
    quiet: bool,
) -> Result<()> {
    let selection = ws.selection(selection_args)?;
    let settings = resolve_settings(ws, options)?;
    let analyzer = SourceAnalyzer::new()?;
    let mut cache = AnalysisCache::new();

    let files = compute_output_files(&selection, ws.index(), &analyzer, &mut cache, settings);
    let stats = options
        .stats
        .then(|| compute_stats(&selection, ws.index(), &analyzer, &mut cache, settings));

    let rendered = match options.format {
        OutputFormat::Text => render_file_list(&files),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&ListReport {
                files: &files,
                stats,
            })?;
            json.push('\n');
            json
        }
    };

    if let Some(path) = options.output {
        fs::write(path, &rendered)?;
        if !quiet {
            println!("Wrote {} file(s) to {}", files.len(), path.display());
        }
    } else if options.format == OutputFormat::Json || quiet {
        print!("{rendered}");
    } else {
        if files.is_empty() {
            println!("No files selected");
        }
        for path in &files {
            println!("{}", file_line(path, is_implied(&selection, ws.index(), path), quiet));
        }
    }

    if options.format == OutputFormat::Text
        && let Some(stats) = stats
    {
        // Keep stdout a clean path list when it carries the list itself
        if options.output.is_some() && !quiet {
            println!("\n{}\n{stats}", "Statistics:".bold());
        } else {
            eprintln!("\n{}\n{stats}", "Statistics:".bold());
        }
    }

    Ok(())
}

/// Expansion settings from config, overridden by command-line flags
fn resolve_settings(ws: &Workspace, options: &ListOptions<'_>) -> Result<ExpansionSettings> {
    let mut settings = ws.config().expansion_settings()?;
    if options.no_expand {
        settings.enabled = false;
    }
    if let Some(depth) = options.depth {
        settings.depth = depth;
    }
    Ok(settings)
}
