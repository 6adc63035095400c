//! Integration tests for taglens
//!
//! These tests build a small Go module in a temporary directory and run the
//! full workflow through the public API: scan, select, expand, export, edit,
//! commit and rescan.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use taglens::commit::commit;
use taglens::config::LensConfig;
use taglens::editor::{DeletionState, DeletionToggle, ExpandState, PendingEdit, TagTree};
use taglens::expand::{AnalysisCache, ExpansionDepth};
use taglens::index::{Index, Indexer, SourceAnalyzer, SourceIndexer};
use taglens::output::{ExpansionSettings, compute_output_files, compute_stats, render_file_list};
use taglens::selection::{Selection, load_selection};
use taglens::tags::{AnnotationFormat, TagRef};

const MAIN: &str = r#"package main
// @tags: #focus(entry)

import (
	"fmt"

	"example.com/app/shield"
	_ "example.com/app/plugins"
)

func main() {
	fmt.Println(shield.Foo())
}
"#;

const SHIELD_FOO: &str = r#"package shield
// @tags: #dev{feature[shield(render,system)]}

import "example.com/app/core"

func Foo() core.Color { return 0 }
"#;

/// Helper to write a file below `root`, creating parent directories
fn write(root: &Path, path: &str, content: &str) {
    let full = root.join(path);
    fs::create_dir_all(full.parent().unwrap()).unwrap();
    fs::write(full, content).unwrap();
}

fn read(root: &Path, path: &str) -> String {
    fs::read_to_string(root.join(path)).unwrap()
}

/// Helper to lay out the sample module
fn setup_module() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write(root, "go.mod", "module example.com/app\n\ngo 1.22\n");
    write(root, "main.go", MAIN);
    write(root, "shield/foo.go", SHIELD_FOO);
    write(
        root,
        "shield/bar.go",
        "package shield\n// @tags: #dev{feature[shield(render)]}\n\nfunc Bar() {}\n",
    );
    write(root, "core/color.go", "package core\n\ntype Color int\n");
    write(root, "plugins/a.go", "package plugins\n\ntype Registry struct{}\n");
    write(root, "plugins/b.go", "package plugins\n\nfunc init() {}\n");
    write(root, "docs/all.go", "package docs\n// @tags: #all(*)\n");
    write(root, ".hidden/skip.go", "package hidden\n// @tags: #focus(entry)\n");
    temp
}

fn format() -> AnnotationFormat {
    LensConfig::default().annotation_format().unwrap()
}

fn scan(root: &Path) -> Index {
    SourceIndexer::new(root, "go", format())
        .unwrap()
        .build_index()
        .unwrap()
}

fn settings(depth: u8) -> ExpansionSettings {
    ExpansionSettings {
        enabled: true,
        depth: ExpansionDepth::new(depth).unwrap(),
    }
}

fn spec(s: &str) -> TagRef {
    TagRef::parse_spec(s).unwrap()
}

#[test]
fn test_scan_builds_index() {
    let temp = setup_module();
    let index = scan(temp.path());

    assert_eq!(index.module_path(), "example.com/app");
    assert_eq!(index.len(), 7);
    assert!(!index.contains(".hidden/skip.go"));
    assert!(index.file("docs/all.go").unwrap().always_include);
    assert!(index.file("plugins/b.go").unwrap().has_init);
    assert_eq!(index.importers_of("shield"), ["main.go"]);
    assert_eq!(
        index.package("shield").unwrap().files,
        vec!["shield/bar.go", "shield/foo.go"]
    );
}

#[test]
fn test_export_follows_symbol_usage_by_depth() {
    let temp = setup_module();
    let index = scan(temp.path());
    let analyzer = SourceAnalyzer::new().unwrap();
    let mut cache = AnalysisCache::new();

    let mut selection = Selection::new();
    assert_eq!(selection.select_at_level(&index, &spec("focus")), 1);

    let one_hop = compute_output_files(&selection, &index, &analyzer, &mut cache, settings(1));
    assert_eq!(
        one_hop,
        vec!["docs/all.go", "main.go", "plugins/b.go", "shield/foo.go"]
    );

    let two_hops = compute_output_files(&selection, &index, &analyzer, &mut cache, settings(2));
    assert_eq!(
        two_hops,
        vec!["core/color.go", "docs/all.go", "main.go", "plugins/b.go", "shield/foo.go"]
    );

    let stats = compute_stats(&selection, &index, &analyzer, &mut cache, settings(2));
    assert_eq!(stats.direct_files, 2);
    assert_eq!(stats.implied_files, 3);
    assert_eq!(stats.total_files(), two_hops.len());

    assert_eq!(
        render_file_list(&one_hop),
        "./docs/all.go\n./main.go\n./plugins/b.go\n./shield/foo.go\n"
    );
}

#[test]
fn test_empty_selection_exports_always_include_only() {
    let temp = setup_module();
    let index = scan(temp.path());
    let analyzer = SourceAnalyzer::new().unwrap();
    let mut cache = AnalysisCache::new();

    let files = compute_output_files(&Selection::new(), &index, &analyzer, &mut cache, settings(5));
    assert_eq!(files, vec!["docs/all.go"]);
}

#[test]
fn test_selection_list_round_trips_through_export() {
    let temp = setup_module();
    let index = scan(temp.path());
    let analyzer = SourceAnalyzer::new().unwrap();
    let mut cache = AnalysisCache::new();

    let mut selection = Selection::new();
    load_selection("# by hand\n./main.go\nshield/**\n./gone.go\n", &index, &mut selection).unwrap();
    assert_eq!(
        selection.iter().collect::<Vec<_>>(),
        vec!["main.go", "shield/bar.go", "shield/foo.go"]
    );

    let disabled = ExpansionSettings {
        enabled: false,
        ..settings(1)
    };
    let exported = compute_output_files(&selection, &index, &analyzer, &mut cache, disabled);

    let mut reloaded = Selection::new();
    load_selection(&render_file_list(&exported), &index, &mut reloaded).unwrap();
    assert_eq!(reloaded.len(), exported.len());
}

#[test]
fn test_edit_session_commits_and_rescans() {
    let temp = setup_module();
    let root = temp.path();
    let index = scan(root);

    let mut selection = Selection::new();
    selection.select_at_level(&index, &spec("dev:feature:shield"));
    let mut edit = PendingEdit::open(&selection);

    assert_eq!(
        edit.toggle_deletion(&index, &spec("dev:feature:shield:render")),
        DeletionToggle::Marked(2)
    );
    assert_eq!(
        edit.toggle_deletion(&index, &spec("dev:feature:shield:system")),
        DeletionToggle::Marked(1)
    );
    assert_eq!(
        edit.deletion_state(&spec("dev:feature:shield")),
        DeletionState::Implied
    );
    edit.queue_additions("#dev{feature[guard(render)]}").unwrap();

    let mut tree = TagTree::build(&index, edit.files(), &ExpandState::new());
    tree.apply_deletions(&edit);
    assert!(tree.find(&spec("dev:feature:shield")).unwrap().deletion.is_deleted());

    let summary = commit(&edit, &index, &format());
    assert!(summary.is_clean());
    assert_eq!(summary.modified, vec!["shield/bar.go", "shield/foo.go"]);
    assert_eq!(
        read(root, "shield/foo.go"),
        SHIELD_FOO.replace(
            "#dev{feature[shield(render,system)]}",
            "#dev{feature[guard(render)]}"
        )
    );

    let rescanned = scan(root);
    let mut selection = selection;
    assert_eq!(selection.retain_indexed(&rescanned), 0);
    assert_eq!(selection.select_at_level(&rescanned, &spec("dev:feature:shield")), 0);
    let mut guard = Selection::new();
    assert_eq!(guard.select_at_level(&rescanned, &spec("dev:feature:guard")), 2);
}

#[test]
fn test_commit_is_idempotent() {
    let temp = setup_module();
    let root = temp.path();
    let index = scan(root);

    let mut selection = Selection::new();
    selection.select_path(&index, "core/color.go");
    let mut edit = PendingEdit::open(&selection);
    edit.queue_additions("#focus(x)").unwrap();

    commit(&edit, &index, &format());
    let first = read(root, "core/color.go");
    assert_eq!(first, "package core\n// @tags: #focus(x)\n\ntype Color int\n");

    let rescanned = scan(root);
    let summary = commit(&edit, &rescanned, &format());
    assert!(summary.modified.is_empty());
    assert_eq!(read(root, "core/color.go"), first);
}
