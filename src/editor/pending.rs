//! Queued tag additions and deletions for one edit session

use std::collections::BTreeSet;

use tracing::debug;

use crate::index::Index;
use crate::selection::Selection;
use crate::tags::{Level, ParseError, TagRef, parse_tag_refs};

/// A deletion mark and the files that carried the tag when it was marked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deletion {
    pub tag: TagRef,
    pub files: Vec<String>,
}

/// Outcome of [`PendingEdit::toggle_deletion`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionToggle {
    /// Queued for deletion across this many files
    Marked(usize),
    /// Unqueued along with this many descendant marks
    Unmarked(usize),
    /// No file in the session carries the tag; nothing queued
    NoMatch,
    /// An ancestor is already marked; nothing changed
    Covered,
}

/// How a tag address is affected by the queued deletions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletionState {
    #[default]
    Kept,
    /// Explicitly marked
    Marked,
    /// Every child is deleted, so the container goes too
    Implied,
    /// An ancestor is marked
    Inherited,
}

impl DeletionState {
    #[must_use]
    pub const fn is_deleted(self) -> bool {
        !matches!(self, Self::Kept)
    }
}

/// Edits queued against a fixed set of files
///
/// The file set is captured when the session opens and does not follow
/// later selection changes.
#[derive(Debug, Clone, Default)]
pub struct PendingEdit {
    files: Vec<String>,
    additions: BTreeSet<TagRef>,
    deletions: Vec<Deletion>,
    implied: BTreeSet<TagRef>,
}

impl PendingEdit {
    /// Open a session over the current selection
    #[must_use]
    pub fn open(selection: &Selection) -> Self {
        Self::for_files(selection.iter().map(str::to_string))
    }

    /// Open a session over an explicit file list
    #[must_use]
    pub fn for_files(files: impl IntoIterator<Item = String>) -> Self {
        let files: BTreeSet<String> = files.into_iter().collect();
        Self {
            files: files.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Files the session edits, sorted
    #[must_use]
    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn additions(&self) -> impl Iterator<Item = &TagRef> {
        self.additions.iter()
    }

    #[must_use]
    pub fn deletions(&self) -> &[Deletion] {
        &self.deletions
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.deletions.is_empty()
    }

    /// Parse `text` with the annotation grammar and queue every tag it names
    ///
    /// A leading `#` is optional. Returns the number of newly queued refs.
    ///
    /// # Errors
    /// Returns `ParseError` if the text does not parse; nothing is queued.
    pub fn queue_additions(&mut self, text: &str) -> Result<usize, ParseError> {
        let trimmed = text.trim();
        let refs = if trimmed.starts_with('#') {
            parse_tag_refs(trimmed)?
        } else {
            parse_tag_refs(&format!("#{trimmed}"))?
        };
        Ok(refs
            .into_iter()
            .filter(|tag| self.additions.insert(tag.clone()))
            .count())
    }

    /// Returns `true` if the addition was queued.
    pub fn remove_addition(&mut self, tag: &TagRef) -> bool {
        self.additions.remove(tag)
    }

    /// Mark `tag` for deletion, or unmark it along with its descendants
    pub fn toggle_deletion(&mut self, index: &Index, tag: &TagRef) -> DeletionToggle {
        let toggle = if self.deletions.iter().any(|d| d.tag == *tag) {
            let before = self.deletions.len();
            self.deletions.retain(|d| !tag.covers(&d.tag));
            DeletionToggle::Unmarked(before - self.deletions.len() - 1)
        } else if self.deletions.iter().any(|d| d.tag.is_ancestor_of(tag)) {
            DeletionToggle::Covered
        } else {
            let files: Vec<String> = self
                .files
                .iter()
                .filter(|path| index.file(path).is_some_and(|f| f.tags.contains(tag)))
                .cloned()
                .collect();
            if files.is_empty() {
                DeletionToggle::NoMatch
            } else {
                let count = files.len();
                self.deletions.push(Deletion {
                    tag: tag.clone(),
                    files,
                });
                DeletionToggle::Marked(count)
            }
        };

        self.recompute_cascade(index);
        debug!("Deletion toggle on {tag}: {toggle:?}");
        toggle
    }

    #[must_use]
    pub fn deletion_state(&self, tag: &TagRef) -> DeletionState {
        if self.deletions.iter().any(|d| d.tag == *tag) {
            DeletionState::Marked
        } else if self.deletions.iter().any(|d| d.tag.is_ancestor_of(tag)) {
            DeletionState::Inherited
        } else if self.implied.contains(tag) {
            DeletionState::Implied
        } else {
            DeletionState::Kept
        }
    }

    fn is_covered(&self, tag: &TagRef) -> bool {
        self.deletions.iter().any(|d| d.tag.covers(tag))
    }

    /// Rebuild the implied set bottom-up: modules first, then groups
    fn recompute_cascade(&mut self, index: &Index) {
        let mut nodes = BTreeSet::new();
        for path in &self.files {
            if let Some(file) = index.file(path) {
                nodes.extend(file.tags.nodes());
            }
        }

        let mut implied = BTreeSet::new();
        for module in nodes.iter().filter(|n| is_named_module(n)) {
            let labels: Vec<&TagRef> = nodes
                .iter()
                .filter(|n| n.depth() == 4 && module.is_ancestor_of(n))
                .collect();
            if !labels.is_empty()
                && labels.iter().all(|label| self.is_covered(label))
                && !self.is_covered(module)
            {
                implied.insert(module.clone());
            }
        }

        for group in nodes.iter().filter(|n| is_named_group(n)) {
            let children: Vec<&TagRef> = nodes
                .iter()
                .filter(|n| group.is_ancestor_of(n) && (is_named_module(n) || is_group_label(n)))
                .collect();
            if !children.is_empty()
                && children
                    .iter()
                    .all(|child| self.is_covered(child) || implied.contains(*child))
                && !self.is_covered(group)
            {
                implied.insert(group.clone());
            }
        }

        self.implied = implied;
    }
}

fn is_named_group(tag: &TagRef) -> bool {
    tag.depth() == 2 && matches!(tag.group, Some(Level::Named(_)))
}

fn is_named_module(tag: &TagRef) -> bool {
    tag.depth() == 3 && matches!(tag.module, Some(Level::Named(_)))
}

/// Label attached directly to a named group
fn is_group_label(tag: &TagRef) -> bool {
    tag.depth() == 4
        && matches!(tag.group, Some(Level::Named(_)))
        && tag.module == Some(Level::Direct)
}

#[cfg(test)]
#[path = "pending_tests.rs"]
mod pending_tests;
