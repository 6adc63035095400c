//! Tags command implementation
//!
//! Prints the aggregated tag tree of a selection with per-node coverage.

use colored::Colorize;

use super::Workspace;
use crate::cli::SelectionArgs;
use crate::editor::{Coverage, ExpandState, TagTree, VisibleRow};
use crate::LensError;

type Result<T> = std::result::Result<T, LensError>;

/// Execute the tags command
///
/// Without any selection arguments every indexed file is used.
///
/// # Errors
/// Returns `LensError` if the selection cannot be built.
pub fn execute(ws: &Workspace, selection_args: &SelectionArgs, quiet: bool) -> Result<()> {
    let files: Vec<String> = if selection_args.is_empty() {
        ws.index().files().map(|file| file.path.clone()).collect()
    } else {
        ws.selection(selection_args)?
            .iter()
            .map(str::to_string)
            .collect()
    };

    let tree = TagTree::build(ws.index(), &files, &ExpandState::new());
    if tree.is_empty() {
        if !quiet {
            println!("No tags found in {} file(s)", files.len());
        }
        return Ok(());
    }

    if !quiet {
        println!("{}", format!("Tags across {} file(s):", tree.file_count()).bold());
    }
    for row in tree.visible_rows() {
        println!("{}", render_row(&row, tree.file_count(), quiet));
    }
    Ok(())
}

/// One tree line: indentation, coverage marker, name and file count
pub(crate) fn render_row(row: &VisibleRow<'_>, total: usize, quiet: bool) -> String {
    let node = row.node;
    let indent = "  ".repeat(row.depth);
    let marker = node.coverage.marker();
    let count = format!("({}/{total})", node.count);
    if quiet {
        return format!("{indent}{marker} {} {count}", node.name);
    }
    let name = match node.coverage {
        Coverage::Full => node.name.green(),
        Coverage::Partial => node.name.yellow(),
        Coverage::None => node.name.normal(),
    };
    format!("{indent}{marker} {name} {}", count.dimmed())
}
