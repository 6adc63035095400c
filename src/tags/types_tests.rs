//! Unit tests for tag addresses and tag sets

use super::*;

fn focus_x() -> TagRef {
    TagRef::label("focus", Level::Direct, Level::Direct, "x")
}

fn shield_render() -> TagRef {
    TagRef::label("dev", Level::named("feature"), Level::named("shield"), "render")
}

#[test]
fn test_ref_depth_and_parent() {
    let tag = shield_render();
    assert_eq!(tag.depth(), 4);

    let module = tag.parent().unwrap();
    assert_eq!(module, TagRef::module("dev", Level::named("feature"), Level::named("shield")));
    let group = module.parent().unwrap();
    assert_eq!(group.depth(), 2);
    let category = group.parent().unwrap();
    assert_eq!(category, TagRef::category("dev"));
    assert!(category.parent().is_none());
}

#[test]
fn test_ancestor_relationships() {
    let tag = shield_render();
    let group = TagRef::group("dev", Level::named("feature"));
    let other_group = TagRef::group("dev", Level::named("infra"));

    assert!(TagRef::category("dev").is_ancestor_of(&tag));
    assert!(group.is_ancestor_of(&tag));
    assert!(!other_group.is_ancestor_of(&tag));
    assert!(!tag.is_ancestor_of(&tag));
    assert!(tag.covers(&tag));
    assert!(!TagRef::category("ops").covers(&tag));
}

#[test]
fn test_ordering_puts_direct_first() {
    let mut refs = vec![
        TagRef::group("dev", Level::named("alpha")),
        TagRef::group("dev", Level::Direct),
        TagRef::category("dev"),
    ];
    refs.sort();
    assert_eq!(refs[0], TagRef::category("dev"));
    assert_eq!(refs[1], TagRef::group("dev", Level::Direct));
}

#[test]
fn test_parse_spec_levels() {
    assert_eq!(TagRef::parse_spec("dev").unwrap(), TagRef::category("dev"));
    assert_eq!(
        TagRef::parse_spec("dev:feature").unwrap(),
        TagRef::group("dev", Level::named("feature"))
    );
    assert_eq!(TagRef::parse_spec("focus:_:_:x").unwrap(), focus_x());
    assert_eq!(
        TagRef::parse_spec(" dev:feature:shield:render ").unwrap(),
        shield_render()
    );
}

#[test]
fn test_parse_spec_rejects_malformed() {
    for bad in ["", "dev::x", "_:a", "a:b:c:d:e", "dev:_:shield", "dev:g:m:_"] {
        assert!(
            matches!(TagRef::parse_spec(bad), Err(ParseError::InvalidSpec { .. })),
            "expected '{bad}' to be rejected"
        );
    }
}

#[test]
fn test_display_round_trips_spec() {
    for spec in ["dev", "dev:feature", "focus:_:_:x", "dev:feature:shield:render"] {
        assert_eq!(TagRef::parse_spec(spec).unwrap().to_string(), spec);
    }
}

#[test]
fn test_contains_widens_on_missing_fields() {
    let mut set = TagSet::new();
    set.insert(&shield_render());

    assert!(set.contains(&TagRef::category("dev")));
    assert!(set.contains(&TagRef::group("dev", Level::named("feature"))));
    assert!(set.contains(&TagRef::module("dev", Level::named("feature"), Level::named("shield"))));
    assert!(set.contains(&shield_render()));
    assert!(!set.contains(&TagRef::label(
        "dev",
        Level::named("feature"),
        Level::named("shield"),
        "system"
    )));
    assert!(!set.contains(&TagRef::category("ops")));
}

#[test]
fn test_insert_module_without_label_creates_empty_module() {
    let mut set = TagSet::new();
    let module = TagRef::module("dev", Level::named("feature"), Level::named("shield"));
    assert!(set.insert(&module));
    assert!(!set.insert(&module));
    assert!(set.contains(&module));
    assert_eq!(set.leaves(), vec![module]);
}

#[test]
fn test_remove_label_cascades_through_empty_containers() {
    let mut set = TagSet::new();
    set.insert(&shield_render());
    assert!(set.remove(&shield_render()));
    assert!(set.is_empty());
}

#[test]
fn test_remove_label_keeps_populated_parents() {
    let mut set = TagSet::new();
    set.insert(&shield_render());
    set.insert(&TagRef::label("dev", Level::named("feature"), Level::named("shield"), "system"));
    set.insert(&focus_x());

    assert!(set.remove(&shield_render()));
    assert!(set.contains(&TagRef::module("dev", Level::named("feature"), Level::named("shield"))));
    assert!(set.contains(&focus_x()));
}

#[test]
fn test_remove_group_cascades_category() {
    let mut set = TagSet::new();
    set.insert(&shield_render());
    set.insert(&focus_x());

    assert!(set.remove(&TagRef::group("dev", Level::named("feature"))));
    assert!(!set.contains(&TagRef::category("dev")));
    assert!(set.contains(&focus_x()));
}

#[test]
fn test_remove_missing_is_noop() {
    let mut set = TagSet::new();
    set.insert(&focus_x());
    let before = set.clone();
    assert!(!set.remove(&shield_render()));
    assert!(!set.remove(&TagRef::label("focus", Level::Direct, Level::Direct, "zzz")));
    assert_eq!(set, before);
}

#[test]
fn test_nodes_include_containers() {
    let mut set = TagSet::new();
    set.insert(&shield_render());
    let nodes = set.nodes();
    assert_eq!(nodes.len(), 4);
    assert!(nodes.contains(&TagRef::group("dev", Level::named("feature"))));
}

#[test]
fn test_always_include_at_any_level() {
    let mut category_level = TagSet::new();
    category_level.insert(&TagRef::label("all", Level::Direct, Level::Direct, "*"));
    assert!(category_level.is_always_include());

    let mut group_level = TagSet::new();
    group_level.insert(&TagRef::label("dev", Level::named("all"), Level::Direct, "*"));
    assert!(group_level.is_always_include());

    let mut module_level = TagSet::new();
    module_level.insert(&TagRef::label("dev", Level::named("g"), Level::named("all"), "*"));
    assert!(module_level.is_always_include());

    let mut not_all = TagSet::new();
    not_all.insert(&TagRef::label("all", Level::named("g"), Level::Direct, "x"));
    assert!(!not_all.is_always_include());
}
