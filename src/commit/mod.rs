//! Writing queued tag edits back into source files
//!
//! Each file in the edit session is handled on its own:
//! 1. copy its tag set from the index
//! 2. apply the deletions whose snapshot includes it, then the additions
//! 3. serialize canonically and splice the annotation line into the text
//! 4. write through a temporary file renamed over the original
//!
//! A failing file is logged and reported in [`CommitSummary::failed`]; the
//! rest still go through. The index is stale afterwards and must be rebuilt.

pub mod error;

pub use error::CommitError;

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::editor::PendingEdit;
use crate::index::Index;
use crate::tags::{AnnotationFormat, TagSet, serialize_tag_set};

/// Result of a commit across all session files
#[derive(Debug, Default)]
pub struct CommitSummary {
    /// Files rewritten on disk
    pub modified: Vec<String>,
    /// Files whose tags were not affected
    pub unchanged: Vec<String>,
    /// Files that could not be rewritten
    pub failed: Vec<CommitError>,
}

impl CommitSummary {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Apply `edit` to every file in its session
pub fn commit(edit: &PendingEdit, index: &Index, format: &AnnotationFormat) -> CommitSummary {
    let mut summary = CommitSummary::default();

    for path in edit.files() {
        let Some(file) = index.file(path) else {
            debug!("Skipping {path}: no longer indexed");
            continue;
        };

        let tags = edited_tags(edit, path, &file.tags);
        if tags == file.tags {
            summary.unchanged.push(path.clone());
            continue;
        }

        match rewrite_file(&index.root().join(path), &tags, format) {
            Ok(()) => summary.modified.push(path.clone()),
            Err(e) => {
                warn!("Skipping {path}: {e}");
                summary.failed.push(e);
            }
        }
    }

    info!(
        "Committed tag edits: {} modified, {} unchanged, {} failed",
        summary.modified.len(),
        summary.unchanged.len(),
        summary.failed.len()
    );
    summary
}

/// Tags of `path` after applying the session's edits to a copy of `current`
#[must_use]
pub fn edited_tags(edit: &PendingEdit, path: &str, current: &TagSet) -> TagSet {
    let mut tags = current.clone();
    for deletion in edit.deletions() {
        if deletion.files.iter().any(|f| f == path) {
            tags.remove(&deletion.tag);
        }
    }
    for addition in edit.additions() {
        tags.insert(addition);
    }
    tags
}

fn rewrite_file(path: &Path, tags: &TagSet, format: &AnnotationFormat) -> Result<(), CommitError> {
    let text = fs::read_to_string(path).map_err(|source| CommitError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let line = serialize_tag_set(tags).map(|body| format.render_line(&body));
    let updated = splice_annotation(&text, line.as_deref(), format);
    write_atomic(path, &updated).map_err(|source| CommitError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Replace, insert or remove the annotation line in `text`
///
/// With `Some(line)`: the first well-formed annotation line is replaced
/// (keeping its indentation), or the line is inserted right after the first
/// module-declaration line, or at the top when there is none. With `None`
/// the annotation is removed. Further well-formed annotation lines are always
/// removed; annotation lines that do not parse are left as they are.
/// Every kept line keeps its own line ending, and the presence of a final
/// newline is preserved.
#[must_use]
pub fn splice_annotation(text: &str, line: Option<&str>, format: &AnnotationFormat) -> String {
    let fallback = if text.contains("\r\n") { "\r\n" } else { "\n" };

    let mut segments: Vec<String> = Vec::new();
    let mut placed = false;
    for segment in text.split_inclusive('\n') {
        let (content, ending) = split_ending(segment);
        if !format.is_well_formed(content) {
            segments.push(segment.to_string());
            continue;
        }
        if !placed && let Some(line) = line {
            let indent_len = content.len() - content.trim_start().len();
            segments.push(format!("{}{line}{ending}", &content[..indent_len]));
        }
        placed = true;
    }

    if !placed && let Some(line) = line {
        let decl = segments
            .iter()
            .position(|segment| format.is_module_decl(split_ending(segment).0));
        match decl {
            Some(at) => {
                let mut ending = split_ending(&segments[at]).1;
                if ending.is_empty() {
                    segments[at].push_str(fallback);
                    ending = fallback;
                }
                segments.insert(at + 1, format!("{line}{ending}"));
            }
            None => {
                let ending = segments
                    .first()
                    .map(|first| split_ending(first).1)
                    .filter(|ending| !ending.is_empty())
                    .unwrap_or(fallback);
                segments.insert(0, format!("{line}{ending}"));
            }
        }
    }

    let mut out = segments.concat();
    if !text.ends_with('\n') && out.ends_with('\n') {
        let cut = if out.ends_with("\r\n") { 2 } else { 1 };
        out.truncate(out.len() - cut);
    }
    out
}

/// Split a segment from `split_inclusive('\n')` into content and line ending
fn split_ending(segment: &str) -> (&str, &'static str) {
    if let Some(content) = segment.strip_suffix("\r\n") {
        (content, "\r\n")
    } else if let Some(content) = segment.strip_suffix('\n') {
        (content, "\n")
    } else {
        (segment, "")
    }
}

/// Replace `path` with `contents` via a temporary file in the same directory
///
/// The original permissions are kept. The temporary file is removed on
/// every error path.
///
/// # Errors
/// Returns any I/O error from creating, writing or renaming the temporary file.
pub fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let permissions = fs::metadata(path).ok().map(|m| m.permissions());

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(contents.as_bytes())?;
    temp.as_file().sync_all()?;
    if let Some(permissions) = permissions {
        temp.as_file().set_permissions(permissions)?;
    }
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
