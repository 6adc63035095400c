//! Edit command implementation
//!
//! Opens an edit session over the selected files, queues tag additions and
//! level deletions, previews the per-file result and commits it to disk.

use std::io;

use colored::Colorize;
use dialoguer::Confirm;
use dialoguer::theme::ColorfulTheme;

use super::Workspace;
use super::tags::render_row;
use crate::cli::SelectionArgs;
use crate::commit::{CommitSummary, commit, edited_tags};
use crate::editor::{DeletionState, DeletionToggle, ExpandState, PendingEdit, TagTree};
use crate::selection::Selection;
use crate::tags::{TagRef, serialize_tag_set};
use crate::LensError;

type Result<T> = std::result::Result<T, LensError>;

/// Tag changes requested on the command line
#[derive(Debug, Clone, Default)]
pub struct EditRequest<'a> {
    /// Annotation-syntax texts to add
    pub add: &'a [String],
    /// Level specs to delete
    pub delete: &'a [String],
    pub dry_run: bool,
    /// Skip the confirmation prompt
    pub yes: bool,
}

/// Execute the edit command
///
/// # Errors
/// Returns `LensError` if the selection is empty or cannot be built, an
/// addition or level spec does not parse, the prompt fails, or the index
/// cannot be rebuilt after writing.
pub fn execute(
    ws: &mut Workspace,
    selection_args: &SelectionArgs,
    request: &EditRequest<'_>,
    quiet: bool,
) -> Result<()> {
    let selection = ws.selection(selection_args)?;
    if selection.is_empty() {
        return Err(LensError::InvalidInput(
            "No files selected; use --from or --tag".to_string(),
        ));
    }

    let edit = build_edit(ws, &selection, request, quiet)?;
    if edit.is_empty() {
        if !quiet {
            println!("Nothing to change.");
        }
        return Ok(());
    }

    let changes = preview(ws, &edit);
    if !quiet || request.dry_run {
        print_preview(ws, &edit, &changes, request.dry_run);
    }
    if request.dry_run {
        return Ok(());
    }
    if changes.is_empty() {
        if !quiet {
            println!("No file would change.");
        }
        return Ok(());
    }

    if !request.yes && !confirm(changes.len())? {
        println!("Operation cancelled.");
        return Ok(());
    }

    let summary = commit(&edit, ws.index(), ws.format());
    ws.reindex()?;
    if !quiet {
        print_summary(&summary);
    }
    if summary.is_clean() {
        Ok(())
    } else {
        Err(LensError::InvalidInput(format!(
            "{} file(s) could not be rewritten",
            summary.failed.len()
        )))
    }
}

/// Queue every requested addition and deletion on a session over `selection`
fn build_edit(
    ws: &Workspace,
    selection: &Selection,
    request: &EditRequest<'_>,
    quiet: bool,
) -> Result<PendingEdit> {
    let mut edit = PendingEdit::open(selection);

    for text in request.add {
        edit.queue_additions(text)?;
    }

    for spec in request.delete {
        let tag = TagRef::parse_spec(spec)?;
        if edit.deletion_state(&tag) == DeletionState::Marked {
            continue;
        }
        match edit.toggle_deletion(ws.index(), &tag) {
            DeletionToggle::NoMatch if !quiet => {
                println!("{} no selected file carries {}", "⊘".yellow(), tag.to_string().cyan());
            }
            DeletionToggle::Covered if !quiet => {
                println!("{} {} is already deleted with a parent level", "⊘".yellow(), tag.to_string().cyan());
            }
            _ => {}
        }
    }

    Ok(edit)
}

/// Files whose annotation would change, with old and new annotation bodies
fn preview(ws: &Workspace, edit: &PendingEdit) -> Vec<(String, Option<String>, Option<String>)> {
    edit.files()
        .iter()
        .filter_map(|path| {
            let file = ws.index().file(path)?;
            let updated = edited_tags(edit, path, &file.tags);
            (updated != file.tags).then(|| {
                (
                    path.clone(),
                    serialize_tag_set(&file.tags),
                    serialize_tag_set(&updated),
                )
            })
        })
        .collect()
}

fn print_preview(
    ws: &Workspace,
    edit: &PendingEdit,
    changes: &[(String, Option<String>, Option<String>)],
    dry_run: bool,
) {
    if dry_run {
        println!("{}", "=== Dry Run Mode ===".yellow().bold());
    }

    if !edit.deletions().is_empty() {
        let mut tree = TagTree::build(ws.index(), edit.files(), &ExpandState::new());
        tree.apply_deletions(edit);
        println!("\n{}", "Tags (deleted levels struck):".bold());
        for row in tree.visible_rows() {
            let line = render_row(&row, tree.file_count(), true);
            if row.node.deletion.is_deleted() {
                println!("{}", line.red().strikethrough());
            } else {
                println!("{line}");
            }
        }
    }

    let additions: Vec<String> = edit.additions().map(ToString::to_string).collect();
    if !additions.is_empty() {
        println!("\n{} [{}]", "Adding:".bold(), additions.join(", ").cyan());
    }

    println!(
        "\n{}",
        format!(
            "{} of {} file(s) would change:",
            changes.len(),
            edit.files().len()
        )
        .bold()
    );
    for (path, before, after) in changes {
        println!(
            "  {}: {} → {}",
            path,
            before.as_deref().unwrap_or("(none)").dimmed(),
            after.as_deref().unwrap_or("(none)").green()
        );
    }
}

fn confirm(count: usize) -> Result<bool> {
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("Rewrite tags in {count} file(s)?"))
        .default(false)
        .interact()
        .map_err(|e| LensError::Io(io::Error::other(e)))
}

fn print_summary(summary: &CommitSummary) {
    println!("\n{}", "=== Edit Summary ===".bold());
    println!("  {} {}", "✓ Modified:".green(), summary.modified.len());
    if !summary.unchanged.is_empty() {
        println!("  {} {}", "⊘ Unchanged:".yellow(), summary.unchanged.len());
    }
    if !summary.failed.is_empty() {
        println!("  {} {}", "✗ Errors:".red(), summary.failed.len());
        println!("\n{}", "Error details:".red().bold());
        for error in &summary.failed {
            println!("  - {error}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LensConfig;
    use crate::testing::TestTree;

    fn fixture() -> (TestTree, Workspace) {
        let tree = TestTree::new();
        tree.write("a.go", "package main\n// @tags: #dev{feature[shield(render)]} #focus(x)\n");
        tree.write("b.go", "package main\n// @tags: #focus(x)\n");
        let ws = Workspace::open(tree.root(), LensConfig::default()).unwrap();
        (tree, ws)
    }

    fn focus() -> SelectionArgs {
        SelectionArgs {
            from: None,
            tags: vec!["focus".to_string()],
        }
    }

    #[test]
    fn test_edit_writes_and_reindexes() {
        let (tree, mut ws) = fixture();
        let add = vec!["dev(y)".to_string()];
        let delete = vec!["dev:feature".to_string()];
        let request = EditRequest {
            add: &add,
            delete: &delete,
            dry_run: false,
            yes: true,
        };

        execute(&mut ws, &focus(), &request, true).unwrap();
        assert_eq!(tree.read("a.go"), "package main\n// @tags: #dev(y) #focus(x)\n");
        assert_eq!(tree.read("b.go"), "package main\n// @tags: #dev(y) #focus(x)\n");

        let dev_y = TagRef::parse_spec("dev:_:_:y").unwrap();
        assert!(ws.index().file("b.go").unwrap().tags.contains(&dev_y));
    }

    #[test]
    fn test_dry_run_leaves_files_untouched() {
        let (tree, mut ws) = fixture();
        let delete = vec!["focus".to_string()];
        let request = EditRequest {
            delete: &delete,
            dry_run: true,
            ..EditRequest::default()
        };

        execute(&mut ws, &focus(), &request, true).unwrap();
        assert_eq!(tree.read("b.go"), "package main\n// @tags: #focus(x)\n");
    }

    #[test]
    fn test_empty_selection_is_rejected() {
        let (_tree, mut ws) = fixture();
        let args = SelectionArgs {
            from: None,
            tags: vec!["missing".to_string()],
        };
        let add = vec!["#focus(z)".to_string()];
        let request = EditRequest {
            add: &add,
            yes: true,
            ..EditRequest::default()
        };
        assert!(matches!(
            execute(&mut ws, &args, &request, true),
            Err(LensError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_repeated_delete_spec_stays_marked() {
        let (_tree, ws) = fixture();
        let selection = ws.selection(&focus()).unwrap();
        let delete = vec!["focus".to_string(), "focus".to_string()];
        let request = EditRequest {
            delete: &delete,
            ..EditRequest::default()
        };

        let edit = build_edit(&ws, &selection, &request, true).unwrap();
        assert_eq!(edit.deletions().len(), 1);
    }

    #[test]
    fn test_preview_lists_only_changed_files() {
        let (_tree, ws) = fixture();
        let selection = ws.selection(&focus()).unwrap();
        let delete = vec!["dev".to_string()];
        let request = EditRequest {
            delete: &delete,
            ..EditRequest::default()
        };

        let edit = build_edit(&ws, &selection, &request, true).unwrap();
        let changes = preview(&ws, &edit);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].0, "a.go");
        assert_eq!(changes[0].2.as_deref(), Some("#focus(x)"));
    }
}
