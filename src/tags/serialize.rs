//! Canonical text encoding of tag sets
//!
//! The encoding is the single source of truth for what lands on disk, so it
//! must be stable: `serialize(parse(serialize(t))) == serialize(t)`.
//!
//! - categories are emitted in sorted order, separated by a single space
//! - a category holding only direct labels uses the compact `cat(a,b)` form
//! - otherwise `cat{...}` lists direct labels as `(a,b)` first, then each
//!   named group (sorted) as `group(labels)` followed by `group[module]` /
//!   `group[module(labels)]` for each named module (sorted)
//! - empty containers are omitted; an empty set has no encoding at all

use super::types::{GroupMap, LabelSet, Level, TagSet};

/// Serialize `set` into an annotation body such as `#dev{feature[shield(render)]}`
///
/// Returns `None` when nothing would be emitted, meaning the annotation line
/// should be dropped entirely.
///
/// # Examples
/// ```
/// use taglens::tags::{parse_annotation, serialize_tag_set};
///
/// let set = parse_annotation("#focus( y , x )").unwrap();
/// assert_eq!(serialize_tag_set(&set).as_deref(), Some("#focus(x,y)"));
/// ```
#[must_use]
pub fn serialize_tag_set(set: &TagSet) -> Option<String> {
    let clauses: Vec<String> = set
        .categories()
        .filter_map(|(name, groups)| serialize_category(name, groups))
        .map(|clause| format!("#{clause}"))
        .collect();

    if clauses.is_empty() {
        None
    } else {
        Some(clauses.join(" "))
    }
}

fn join_labels(labels: &LabelSet) -> String {
    labels.iter().map(String::as_str).collect::<Vec<_>>().join(",")
}

fn direct_labels(groups: &GroupMap) -> Option<&LabelSet> {
    groups
        .get(&Level::Direct)
        .and_then(|modules| modules.get(&Level::Direct))
        .filter(|labels| !labels.is_empty())
}

fn serialize_category(name: &str, groups: &GroupMap) -> Option<String> {
    let only_direct = groups.len() == 1
        && groups
            .get(&Level::Direct)
            .is_some_and(|modules| modules.len() == 1);
    if only_direct && let Some(labels) = direct_labels(groups) {
        return Some(format!("{name}({})", join_labels(labels)));
    }

    let mut clauses = Vec::new();
    if let Some(labels) = direct_labels(groups) {
        clauses.push(format!("({})", join_labels(labels)));
    }

    for (group, modules) in groups {
        let Level::Named(group) = group else {
            continue;
        };
        if let Some(labels) = modules.get(&Level::Direct).filter(|l| !l.is_empty()) {
            clauses.push(format!("{group}({})", join_labels(labels)));
        }
        for (module, labels) in modules {
            let Level::Named(module) = module else {
                continue;
            };
            if labels.is_empty() {
                clauses.push(format!("{group}[{module}]"));
            } else {
                clauses.push(format!("{group}[{module}({})]", join_labels(labels)));
            }
        }
    }

    if clauses.is_empty() {
        None
    } else {
        Some(format!("{name}{{{}}}", clauses.join(",")))
    }
}
