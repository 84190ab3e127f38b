//! Building collections from org-roam databases

mod common;

use std::collections::BTreeSet;

use common::{example_db, math_db, RoamDbBuilder};
use pretty_assertions::assert_eq;
use roamgraph::{ErrorKind, GraphConfig, GraphState, LoadStatus, OrgLink, RoamGraph};

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_initialize_graph() {
    let (_dir, path) = example_db();
    let graph = RoamGraph::open(&path).unwrap();

    assert_eq!(graph.len(), 3);
    assert_eq!(graph.state(), GraphState::Loaded);
    assert_eq!(graph.load_report().status(), LoadStatus::Complete);
    assert_eq!(graph.db_path(), Some(path.as_path()));
}

#[test]
fn test_fields_are_unquoted() {
    let (_dir, path) = example_db();
    let graph = RoamGraph::open(&path).unwrap();

    assert_eq!(graph.ids(), vec!["1", "2", "3"]);
    assert_eq!(graph.titles(), vec!["Foo", "Bar", "Baz"]);
    assert_eq!(graph.fnames(true), vec!["Foo.org", "Bar.org", "Baz.org"]);
    assert_eq!(graph.fnames(false)[0], "/home/user/org/roam/Foo.org");
}

#[test]
fn test_example_backlinks_and_orphans() {
    let (_dir, path) = example_db();
    let graph = RoamGraph::open(&path).unwrap();

    let backlinks = graph.backlink_index();
    assert_eq!(backlinks["1"], set(&[]));
    assert_eq!(backlinks["2"], set(&["1"]));
    assert_eq!(backlinks["3"], set(&[]));

    let orphans: Vec<&str> = graph.orphans().iter().map(|n| n.id.as_str()).collect();
    assert_eq!(orphans, vec!["3"]);

    let connected = graph.remove_orphans();
    assert_eq!(connected.ids(), vec!["1", "2"]);
    assert!(connected.node("1").unwrap().links_to.contains("2"));
    assert_eq!(graph.len(), 3);
}

#[test]
fn test_ids_unique_titles_may_repeat() {
    let (_dir, path) = math_db();
    let graph = RoamGraph::open(&path).unwrap();

    let ids: BTreeSet<&str> = graph.ids().into_iter().collect();
    assert_eq!(ids.len(), graph.len());

    let titles = graph.titles();
    assert_eq!(titles.iter().filter(|t| **t == "Dup").count(), 2);
    assert_eq!(graph.duplicate_titles().unwrap(), ["Dup".to_string()]);
}

#[test]
fn test_tags_loaded_as_sets() {
    let (_dir, path) = math_db();
    let graph = RoamGraph::open(&path).unwrap();

    assert_eq!(graph.node("a4").unwrap().tags, set(&["draft", "fleeting"]));
    assert!(graph.node("d1").unwrap().tags.is_empty());
    assert_eq!(
        graph.all_tags().into_iter().collect::<Vec<_>>(),
        vec!["algebra", "category-theory", "draft", "fleeting"]
    );
}

#[test]
fn test_links_exclude_dangling_and_non_node_links() {
    let (_dir, path) = math_db();
    let graph = RoamGraph::open(&path).unwrap();

    let monoidal = graph.node("monoidal category").unwrap();
    assert!(monoidal.links(&graph.node("representation of group").unwrap().id));
    assert_eq!(monoidal.links_to, set(&["a2", "a3"]));
    assert!(graph.node("a3").unwrap().links_to.is_empty());

    assert_eq!(
        graph.misc_link_index()["a1"],
        &[OrgLink::new("https", "//ncatlab.org/nlab/show/monoidal+category")][..]
    );
    assert_eq!(graph.misc_link_index()["a2"][0].link_type, "file");
    assert_eq!(graph.size().unwrap(), (6, 4));
}

#[test]
fn test_comma_in_link_target_keeps_collection() {
    let (_dir, path) = RoamDbBuilder::new()
        .node("1", "Foo")
        .node("2", "Bar")
        .tag("1", "a,b")
        .link("1", "2")
        .typed_link("1", "//example.org/search?q=a,b", "https")
        .typed_link("2", "~/papers/Smith, J.pdf", "file")
        .build();

    let graph = RoamGraph::open(&path).unwrap();
    assert_eq!(graph.len(), 2);
    assert_eq!(graph.load_report().status(), LoadStatus::Complete);
    assert_eq!(graph.node("1").unwrap().tags, set(&["a,b"]));
    assert_eq!(graph.node("1").unwrap().links_to, set(&["2"]));
    assert_eq!(
        graph.misc_link_index()["1"],
        &[OrgLink::new("https", "//example.org/search?q=a,b")][..]
    );
    assert_eq!(graph.misc_link_index()["2"][0].content, "~/papers/Smith, J.pdf");

    let strict = RoamGraph::open_with(&GraphConfig::new(&path).strict(true)).unwrap();
    assert_eq!(strict.len(), 2);
}

#[test]
fn test_keep_dangling_links() {
    let (_dir, path) = math_db();
    let config = GraphConfig::new(&path).keep_dangling_links(true);
    let graph = RoamGraph::open_with(&config).unwrap();

    assert!(graph.node("a3").unwrap().links("missing-node"));
    assert!(graph.graph().unwrap().contains("missing-node"));
    assert!(!graph.backlink_index().contains_key("missing-node"));
}

#[test]
fn test_title_links() {
    let (_dir, path) = math_db();
    let graph = RoamGraph::open(&path).unwrap();

    let title_links = graph.title_links().unwrap();
    assert_eq!(title_links["monoidal category"], set(&["a2", "a3"]));
    assert_eq!(title_links["Dup"], set(&["d1"]));
}

#[test]
fn test_empty_database_is_complete() {
    let (_dir, path) = RoamDbBuilder::new().build();
    let graph = RoamGraph::open(&path).unwrap();

    assert!(graph.is_empty());
    assert_eq!(graph.load_report().status(), LoadStatus::Complete);
}

#[test]
fn test_missing_database_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let graph = RoamGraph::open(dir.path().join("nope.db")).unwrap();

    assert!(graph.is_empty());
    let report = graph.load_report();
    assert_eq!(report.status(), LoadStatus::Failed);
    assert_eq!(report.failures.len(), 6);
    assert!(report.failures.iter().all(|f| f.kind == ErrorKind::Connection));
}

#[test]
fn test_missing_database_strict() {
    let dir = tempfile::tempdir().unwrap();
    let config = GraphConfig::new(dir.path().join("nope.db")).strict(true);

    let err = RoamGraph::open_with(&config).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Connection);
}

#[test]
fn test_wrong_schema_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("other.db");
    rusqlite::Connection::open(&path)
        .unwrap()
        .execute_batch("CREATE TABLE nodes (id, file, title);")
        .unwrap();

    let graph = RoamGraph::open(&path).unwrap();
    assert!(graph.is_empty());
    assert_eq!(graph.load_report().status(), LoadStatus::Failed);
    assert!(graph
        .load_report()
        .failures
        .iter()
        .all(|f| f.kind == ErrorKind::Database));
}

#[test]
fn test_database_left_unmodified() {
    let (_dir, path) = example_db();
    let before = std::fs::read(&path).unwrap();

    let graph = RoamGraph::open(&path).unwrap();
    let _ = graph.remove_orphans();

    assert_eq!(std::fs::read(&path).unwrap(), before);
}
