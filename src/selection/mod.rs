//! The set of directly chosen files and the level-based bulk operations on it
//!
//! A level spec is a [`TagRef`] whose unset trailing fields widen the match
//! to everything beneath that level. A file matches when its tag set
//! contains the address (see [`TagSet::contains`](crate::tags::TagSet::contains)).

pub mod error;
pub mod loader;

pub use error::SelectionError;
pub use loader::{ListPattern, load_selection, read_selection_file};

use std::collections::BTreeSet;

use crate::index::{FileInfo, Index};
use crate::tags::TagRef;

/// Outcome of [`Selection::toggle_at_level`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelToggle {
    /// Matching files were added; holds the number newly selected
    Selected(usize),
    /// Matching files were removed; holds the number deselected
    Deselected(usize),
}

impl LevelToggle {
    #[must_use]
    pub const fn changed(self) -> usize {
        match self {
            Self::Selected(n) | Self::Deselected(n) => n,
        }
    }
}

/// Directly selected file paths
///
/// Every member is a path present in the index it was selected from; call
/// [`Selection::retain_indexed`] after a rebuild to restore that.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    paths: BTreeSet<String>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    /// Selected paths in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.paths.clear();
    }

    /// Select one file; unknown paths are ignored
    ///
    /// Returns `true` if the selection changed.
    pub fn select_path(&mut self, index: &Index, path: &str) -> bool {
        index.contains(path) && self.paths.insert(path.to_string())
    }

    /// Returns `true` if the selection changed.
    pub fn deselect_path(&mut self, path: &str) -> bool {
        self.paths.remove(path)
    }

    /// Flip one file's membership; unknown paths are ignored
    ///
    /// Returns `true` if the selection changed.
    pub fn toggle_path(&mut self, index: &Index, path: &str) -> bool {
        if self.paths.remove(path) {
            return true;
        }
        self.select_path(index, path)
    }

    /// Select every file matching `level`; returns the number newly selected
    pub fn select_at_level(&mut self, index: &Index, level: &TagRef) -> usize {
        matching(index, level)
            .filter(|file| self.paths.insert(file.path.clone()))
            .count()
    }

    /// Deselect every file matching `level`; returns the number removed
    pub fn deselect_at_level(&mut self, index: &Index, level: &TagRef) -> usize {
        matching(index, level)
            .filter(|file| self.paths.remove(&file.path))
            .count()
    }

    /// True when every file matching `level` is selected
    ///
    /// Vacuously true when nothing matches.
    #[must_use]
    pub fn all_selected_at_level(&self, index: &Index, level: &TagRef) -> bool {
        matching(index, level).all(|file| self.paths.contains(&file.path))
    }

    /// Deselect the level if fully selected, otherwise select it
    pub fn toggle_at_level(&mut self, index: &Index, level: &TagRef) -> LevelToggle {
        if self.all_selected_at_level(index, level) {
            LevelToggle::Deselected(self.deselect_at_level(index, level))
        } else {
            LevelToggle::Selected(self.select_at_level(index, level))
        }
    }

    /// Drop members missing from `index`; returns the number dropped
    pub fn retain_indexed(&mut self, index: &Index) -> usize {
        let before = self.paths.len();
        self.paths.retain(|path| index.contains(path));
        before - self.paths.len()
    }
}

/// Files whose tags contain `level`, in path order
pub fn matching<'a>(index: &'a Index, level: &'a TagRef) -> impl Iterator<Item = &'a FileInfo> + 'a {
    index.files().filter(move |file| file.tags.contains(level))
}
