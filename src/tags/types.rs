//! Tag addresses and per-file tag sets
//!
//! Tags form a strict four-level tree: category → group → module → label.
//! Groups and modules may be omitted in the annotation syntax; an omitted
//! level is stored as [`Level::Direct`] rather than as an empty string, so
//! addresses compare and sort as plain tuples.
//!
//! # Examples
//!
//! ```
//! use taglens::tags::{Level, TagRef, TagSet};
//!
//! let mut set = TagSet::new();
//! set.insert(&TagRef::label("focus", Level::Direct, Level::Direct, "x"));
//!
//! assert!(set.contains(&TagRef::category("focus")));
//! assert!(!set.contains(&TagRef::group("focus", Level::named("ui"))));
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::error::ParseError;

/// Separator used by the `category:group:module:label` spec syntax
pub const SPEC_DELIMITER: char = ':';

/// Placeholder for [`Level::Direct`] in the spec syntax
pub const DIRECT_PLACEHOLDER: &str = "_";

/// Clause name that, holding the `*` label, forces a file into every export
pub const ALWAYS_INCLUDE_NAME: &str = "all";

/// Label that, under an `all` clause, forces a file into every export
pub const ALWAYS_INCLUDE_LABEL: &str = "*";

/// One intermediate level of the tag tree (group or module)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// The level was omitted in the annotation (2- and 3-level forms)
    Direct,
    /// A named group or module
    Named(String),
}

impl Level {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    #[must_use]
    pub const fn is_direct(&self) -> bool {
        matches!(self, Self::Direct)
    }

    /// Name of the level, `None` for the direct sentinel
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Direct => None,
            Self::Named(name) => Some(name),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => f.write_str(DIRECT_PLACEHOLDER),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// Address of a node in the tag tree
///
/// Trailing `None` fields widen the address to "this level and everything
/// beneath it", so a `TagRef` doubles as a level spec for selection and as
/// a deletion target in the editor.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TagRef {
    pub category: String,
    pub group: Option<Level>,
    pub module: Option<Level>,
    pub label: Option<String>,
}

impl TagRef {
    #[must_use]
    pub fn category(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            group: None,
            module: None,
            label: None,
        }
    }

    #[must_use]
    pub fn group(category: impl Into<String>, group: Level) -> Self {
        Self {
            group: Some(group),
            ..Self::category(category)
        }
    }

    #[must_use]
    pub fn module(category: impl Into<String>, group: Level, module: Level) -> Self {
        Self {
            module: Some(module),
            ..Self::group(category, group)
        }
    }

    #[must_use]
    pub fn label(
        category: impl Into<String>,
        group: Level,
        module: Level,
        label: impl Into<String>,
    ) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::module(category, group, module)
        }
    }

    /// Number of populated levels (1 = category .. 4 = label)
    #[must_use]
    pub fn depth(&self) -> usize {
        match (&self.group, &self.module, &self.label) {
            (None, _, _) => 1,
            (Some(_), None, _) => 2,
            (Some(_), Some(_), None) => 3,
            (Some(_), Some(_), Some(_)) => 4,
        }
    }

    /// Address one level up, `None` for a category
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let mut parent = self.clone();
        match self.depth() {
            1 => return None,
            2 => parent.group = None,
            3 => parent.module = None,
            _ => parent.label = None,
        }
        Some(parent)
    }

    /// True when `other` lies strictly beneath this address
    #[must_use]
    pub fn is_ancestor_of(&self, other: &Self) -> bool {
        let depth = self.depth();
        if depth >= other.depth() || self.category != other.category {
            return false;
        }
        (depth < 2 || self.group == other.group) && (depth < 3 || self.module == other.module)
    }

    /// True when this address equals `other` or is one of its ancestors
    #[must_use]
    pub fn covers(&self, other: &Self) -> bool {
        self == other || self.is_ancestor_of(other)
    }

    /// Name of the deepest populated level, with `_` for a direct level
    #[must_use]
    pub fn leaf_name(&self) -> String {
        match (&self.group, &self.module, &self.label) {
            (_, _, Some(label)) => label.clone(),
            (_, Some(module), None) => module.to_string(),
            (Some(group), None, None) => group.to_string(),
            (None, _, _) => self.category.clone(),
        }
    }

    /// Parse a `category[:group[:module[:label]]]` spec
    ///
    /// `_` stands for an omitted (direct) group or module.
    ///
    /// # Examples
    /// ```
    /// use taglens::tags::{Level, TagRef};
    ///
    /// let tag = TagRef::parse_spec("focus:_:_:x").unwrap();
    /// assert_eq!(tag, TagRef::label("focus", Level::Direct, Level::Direct, "x"));
    /// ```
    ///
    /// # Errors
    /// Returns `ParseError::InvalidSpec` for empty segments, more than four
    /// levels, a direct category, or a named module under a direct group.
    pub fn parse_spec(spec: &str) -> Result<Self, ParseError> {
        let parts: Vec<&str> = spec.trim().split(SPEC_DELIMITER).map(str::trim).collect();
        if parts.len() > 4 {
            return Err(ParseError::invalid_spec(spec, "more than four levels"));
        }
        if parts.iter().any(|p| p.is_empty()) {
            return Err(ParseError::invalid_spec(spec, "empty level"));
        }
        if parts[0] == DIRECT_PLACEHOLDER {
            return Err(ParseError::invalid_spec(spec, "category cannot be omitted"));
        }
        if parts.get(3).is_some_and(|l| *l == DIRECT_PLACEHOLDER) {
            return Err(ParseError::invalid_spec(spec, "label cannot be omitted"));
        }

        let level = |raw: &str| {
            if raw == DIRECT_PLACEHOLDER {
                Level::Direct
            } else {
                Level::named(raw)
            }
        };
        let tag = Self {
            category: parts[0].to_string(),
            group: parts.get(1).map(|g| level(*g)),
            module: parts.get(2).map(|m| level(*m)),
            label: parts.get(3).map(|l| (*l).to_string()),
        };

        if tag.group == Some(Level::Direct) && tag.module.as_ref().is_some_and(|m| !m.is_direct()) {
            return Err(ParseError::invalid_spec(
                spec,
                "a named module needs a named group",
            ));
        }
        Ok(tag)
    }
}

impl fmt::Display for TagRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.category)?;
        if let Some(group) = &self.group {
            write!(f, "{SPEC_DELIMITER}{group}")?;
        }
        if let Some(module) = &self.module {
            write!(f, "{SPEC_DELIMITER}{module}")?;
        }
        if let Some(label) = &self.label {
            write!(f, "{SPEC_DELIMITER}{label}")?;
        }
        Ok(())
    }
}

/// Labels under one module
pub type LabelSet = BTreeSet<String>;
/// Modules under one group
pub type ModuleMap = BTreeMap<Level, LabelSet>;
/// Groups under one category
pub type GroupMap = BTreeMap<Level, ModuleMap>;

/// The full tag tree of one file
///
/// Ordered containers keep iteration (and therefore serialization) sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    categories: BTreeMap<String, GroupMap>,
}

impl TagSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Iterate categories in sorted order
    pub fn categories(&self) -> impl Iterator<Item = (&String, &GroupMap)> {
        self.categories.iter()
    }

    /// Check whether the set holds `tag`, treating unset trailing fields as wildcards
    #[must_use]
    pub fn contains(&self, tag: &TagRef) -> bool {
        let Some(groups) = self.categories.get(&tag.category) else {
            return false;
        };
        let Some(group) = &tag.group else {
            return true;
        };
        let Some(modules) = groups.get(group) else {
            return false;
        };
        let Some(module) = &tag.module else {
            return true;
        };
        let Some(labels) = modules.get(module) else {
            return false;
        };
        tag.label.as_ref().is_none_or(|label| labels.contains(label))
    }

    /// Insert `tag`, creating intermediate levels as needed
    ///
    /// A module-level ref creates an empty module entry. Returns `true` if
    /// anything was added.
    pub fn insert(&mut self, tag: &TagRef) -> bool {
        let mut changed = false;
        let groups = self.categories.entry(tag.category.clone()).or_insert_with(|| {
            changed = true;
            GroupMap::new()
        });
        let Some(group) = &tag.group else {
            return changed;
        };
        let modules = groups.entry(group.clone()).or_insert_with(|| {
            changed = true;
            ModuleMap::new()
        });
        let Some(module) = &tag.module else {
            return changed;
        };
        let labels = modules.entry(module.clone()).or_insert_with(|| {
            changed = true;
            LabelSet::new()
        });
        if let Some(label) = &tag.label {
            changed |= labels.insert(label.clone());
        }
        changed
    }

    /// Remove the subtree at `tag`, pruning containers left empty
    ///
    /// Returns `true` if anything was removed.
    pub fn remove(&mut self, tag: &TagRef) -> bool {
        let Some(group) = &tag.group else {
            return self.categories.remove(&tag.category).is_some();
        };
        let Some(groups) = self.categories.get_mut(&tag.category) else {
            return false;
        };
        let removed = match (&tag.module, &tag.label) {
            (None, _) => groups.remove(group).is_some(),
            (Some(module), None) => groups
                .get_mut(group)
                .is_some_and(|modules| modules.remove(module).is_some()),
            (Some(module), Some(label)) => groups
                .get_mut(group)
                .and_then(|modules| modules.get_mut(module))
                .is_some_and(|labels| labels.remove(label)),
        };
        if removed {
            self.prune(tag);
        }
        removed
    }

    fn prune(&mut self, tag: &TagRef) {
        let Some(groups) = self.categories.get_mut(&tag.category) else {
            return;
        };
        if let (Some(group), Some(module), Some(_)) = (&tag.group, &tag.module, &tag.label)
            && let Some(modules) = groups.get_mut(group)
            && modules.get(module).is_some_and(BTreeSet::is_empty)
        {
            modules.remove(module);
        }
        if let (Some(group), Some(_)) = (&tag.group, &tag.module)
            && groups.get(group).is_some_and(BTreeMap::is_empty)
        {
            groups.remove(group);
        }
        if groups.is_empty() {
            self.categories.remove(&tag.category);
        }
    }

    /// Merge every address of `other` into this set
    pub fn merge(&mut self, other: &Self) {
        for tag in other.leaves() {
            self.insert(&tag);
        }
    }

    /// Every leaf address: one per label, plus a label-less ref for each empty module
    #[must_use]
    pub fn leaves(&self) -> Vec<TagRef> {
        let mut leaves = Vec::new();
        for (category, groups) in &self.categories {
            if groups.is_empty() {
                leaves.push(TagRef::category(category.clone()));
            }
            for (group, modules) in groups {
                if modules.is_empty() {
                    leaves.push(TagRef::group(category.clone(), group.clone()));
                }
                for (module, labels) in modules {
                    if labels.is_empty() {
                        leaves.push(TagRef::module(category.clone(), group.clone(), module.clone()));
                    }
                    leaves.extend(labels.iter().map(|label| {
                        TagRef::label(category.clone(), group.clone(), module.clone(), label.clone())
                    }));
                }
            }
        }
        leaves
    }

    /// Every address present in the set, containers included
    #[must_use]
    pub fn nodes(&self) -> BTreeSet<TagRef> {
        let mut nodes = BTreeSet::new();
        for leaf in self.leaves() {
            let mut current = Some(leaf);
            while let Some(tag) = current {
                current = tag.parent();
                nodes.insert(tag);
            }
        }
        nodes
    }

    /// True when an `all` clause carries the `*` label at any level
    #[must_use]
    pub fn is_always_include(&self) -> bool {
        self.leaves().iter().any(|tag| {
            let owner = match (&tag.group, &tag.module) {
                (_, Some(Level::Named(module))) => module.as_str(),
                (Some(Level::Named(group)), _) => group.as_str(),
                _ => tag.category.as_str(),
            };
            owner == ALWAYS_INCLUDE_NAME && tag.label.as_deref() == Some(ALWAYS_INCLUDE_LABEL)
        })
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
