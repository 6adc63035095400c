//! Tag coverage tree over a fixed file set
//!
//! Every distinct tag address found in the files becomes a node. Omitted
//! (direct) groups and modules get no node of their own: their labels hang
//! off the nearest named ancestor, so `#focus(x)` shows as `focus > x`.

use std::collections::HashMap;

use super::pending::{DeletionState, PendingEdit};
use crate::index::{FileInfo, Index};
use crate::tags::{Level, TagRef};

/// Expand/collapse flags keyed by tag address
pub type ExpandState = HashMap<TagRef, bool>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Category,
    Group,
    Module,
    Label,
}

/// How many of the session's files carry a tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coverage {
    None,
    Partial,
    Full,
}

impl Coverage {
    #[must_use]
    pub const fn of(count: usize, total: usize) -> Self {
        if count == 0 {
            Self::None
        } else if count < total {
            Self::Partial
        } else {
            Self::Full
        }
    }

    /// Single-character marker for text rendering
    #[must_use]
    pub const fn marker(self) -> char {
        match self {
            Self::None => ' ',
            Self::Partial => '~',
            Self::Full => '*',
        }
    }
}

/// A node in the tag tree
#[derive(Debug, Clone)]
pub struct TagNode {
    /// Full address; stable across rebuilds
    pub key: TagRef,
    pub kind: NodeKind,
    /// Display name of this level only
    pub name: String,
    /// Files carrying this tag or anything beneath it
    pub count: usize,
    pub coverage: Coverage,
    /// Whether children are shown
    pub expanded: bool,
    pub deletion: DeletionState,
    pub children: Vec<TagNode>,
}

impl TagNode {
    fn collect_visible<'a>(&'a self, depth: usize, output: &mut Vec<VisibleRow<'a>>) {
        output.push(VisibleRow { depth, node: self });
        if self.expanded {
            for child in &self.children {
                child.collect_visible(depth + 1, output);
            }
        }
    }

    fn find_mut(&mut self, key: &TagRef) -> Option<&mut Self> {
        if self.key == *key {
            return Some(self);
        }
        if !self.key.is_ancestor_of(key) {
            return None;
        }
        self.children.iter_mut().find_map(|child| child.find_mut(key))
    }

    fn visit<'a>(&'a self, f: &mut impl FnMut(&'a Self)) {
        f(self);
        for child in &self.children {
            child.visit(f);
        }
    }

    fn visit_mut(&mut self, f: &mut impl FnMut(&mut Self)) {
        f(self);
        for child in &mut self.children {
            child.visit_mut(f);
        }
    }
}

/// One line of the flattened, collapse-aware tree
#[derive(Debug, Clone, Copy)]
pub struct VisibleRow<'a> {
    /// Nesting level, 0 for categories
    pub depth: usize,
    pub node: &'a TagNode,
}

/// Aggregated tag tree for a set of files
#[derive(Debug, Clone, Default)]
pub struct TagTree {
    roots: Vec<TagNode>,
    file_count: usize,
}

impl TagTree {
    /// Build the tree for `files`, keeping expand flags from `previous`
    ///
    /// Paths missing from the index are ignored. Addresses not in
    /// `previous` start expanded.
    #[must_use]
    pub fn build(index: &Index, files: &[String], previous: &ExpandState) -> Self {
        let infos: Vec<&FileInfo> = files.iter().filter_map(|path| index.file(path)).collect();

        let mut addresses = std::collections::BTreeSet::new();
        for info in &infos {
            addresses.extend(info.tags.nodes());
        }

        let mut children: HashMap<Option<TagRef>, Vec<TagRef>> = HashMap::new();
        for address in addresses {
            if is_placeholder(&address) {
                continue;
            }
            children.entry(display_parent(&address)).or_default().push(address);
        }

        let builder = Builder {
            infos: &infos,
            children: &children,
            previous,
        };
        Self {
            roots: builder.nodes(None),
            file_count: infos.len(),
        }
    }

    #[must_use]
    pub fn roots(&self) -> &[TagNode] {
        &self.roots
    }

    /// Number of indexed files the tree aggregates
    #[must_use]
    pub const fn file_count(&self) -> usize {
        self.file_count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    #[must_use]
    pub fn find(&self, key: &TagRef) -> Option<&TagNode> {
        let mut found = None;
        for root in &self.roots {
            root.visit(&mut |node| {
                if node.key == *key {
                    found = Some(node);
                }
            });
        }
        found
    }

    /// Flip a node's expanded flag; returns `false` if there is no such node
    pub fn toggle_expanded(&mut self, key: &TagRef) -> bool {
        match self.roots.iter_mut().find_map(|root| root.find_mut(key)) {
            Some(node) => {
                node.expanded = !node.expanded;
                true
            }
            None => false,
        }
    }

    /// Nodes in display order, skipping children of collapsed nodes
    #[must_use]
    pub fn visible_rows(&self) -> Vec<VisibleRow<'_>> {
        let mut rows = Vec::new();
        for root in &self.roots {
            root.collect_visible(0, &mut rows);
        }
        rows
    }

    /// Expand flags of every node, for carrying into the next rebuild
    #[must_use]
    pub fn expand_state(&self) -> ExpandState {
        let mut state = ExpandState::new();
        for root in &self.roots {
            root.visit(&mut |node| {
                state.insert(node.key.clone(), node.expanded);
            });
        }
        state
    }

    /// Refresh every node's deletion state from `edit`
    pub fn apply_deletions(&mut self, edit: &PendingEdit) {
        for root in &mut self.roots {
            root.visit_mut(&mut |node| node.deletion = edit.deletion_state(&node.key));
        }
    }
}

struct Builder<'a> {
    infos: &'a [&'a FileInfo],
    children: &'a HashMap<Option<TagRef>, Vec<TagRef>>,
    previous: &'a ExpandState,
}

impl Builder<'_> {
    fn nodes(&self, parent: Option<TagRef>) -> Vec<TagNode> {
        let Some(keys) = self.children.get(&parent) else {
            return Vec::new();
        };
        keys.iter().map(|key| self.node(key)).collect()
    }

    fn node(&self, key: &TagRef) -> TagNode {
        let count = self.infos.iter().filter(|f| f.tags.contains(key)).count();
        TagNode {
            key: key.clone(),
            kind: kind_of(key),
            name: key.leaf_name(),
            count,
            coverage: Coverage::of(count, self.infos.len()),
            expanded: self.previous.get(key).copied().unwrap_or(true),
            deletion: DeletionState::Kept,
            children: self.nodes(Some(key.clone())),
        }
    }
}

fn kind_of(key: &TagRef) -> NodeKind {
    match (&key.group, &key.module, &key.label) {
        (None, _, _) => NodeKind::Category,
        (Some(_), None, _) => NodeKind::Group,
        (Some(_), Some(_), None) => NodeKind::Module,
        (Some(_), Some(_), Some(_)) => NodeKind::Label,
    }
}

/// Container address ending in an omitted level
fn is_placeholder(address: &TagRef) -> bool {
    match address.depth() {
        2 => address.group == Some(Level::Direct),
        3 => address.module == Some(Level::Direct),
        _ => false,
    }
}

/// Nearest ancestor that is shown as a node, `None` for categories
fn display_parent(address: &TagRef) -> Option<TagRef> {
    let mut parent = address.parent();
    while let Some(candidate) = &parent {
        if !is_placeholder(candidate) {
            break;
        }
        parent = candidate.parent();
    }
    parent
}
