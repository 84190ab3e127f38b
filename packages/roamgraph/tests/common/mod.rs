//! Common test utilities for roamgraph
//!
//! Builds throwaway org-roam databases with the same schema and quoting
//! org-roam itself writes.

#![allow(dead_code)]

use std::path::PathBuf;

use rusqlite::{params, Connection};
use tempfile::TempDir;

const SCHEMA: &str = r#"
CREATE TABLE files (file UNIQUE PRIMARY KEY, title, hash NOT NULL, atime NOT NULL, mtime NOT NULL);
CREATE TABLE nodes (id NOT NULL PRIMARY KEY, file NOT NULL, level NOT NULL, pos NOT NULL,
                    todo, priority, scheduled text, deadline text, title, properties, olp);
CREATE TABLE aliases (node_id NOT NULL, alias);
CREATE TABLE citations (node_id NOT NULL, cite_key NOT NULL, pos NOT NULL, properties);
CREATE TABLE refs (node_id NOT NULL, ref NOT NULL, type NOT NULL);
CREATE TABLE tags (node_id NOT NULL, tag);
CREATE TABLE links (pos NOT NULL, source NOT NULL, dest NOT NULL, type NOT NULL, properties NOT NULL);
"#;

/// Printed-string form used by org-roam for text columns
pub fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\\\""))
}

#[derive(Default)]
pub struct RoamDbBuilder {
    nodes: Vec<(String, String, String)>,
    tags: Vec<(String, String)>,
    links: Vec<(String, String, String)>,
}

impl RoamDbBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(mut self, id: &str, title: &str) -> Self {
        let file = format!("/home/user/org/roam/{}.org", title.replace(' ', "_"));
        self.nodes.push((id.into(), title.into(), file));
        self
    }

    pub fn tag(mut self, id: &str, tag: &str) -> Self {
        self.tags.push((id.into(), tag.into()));
        self
    }

    pub fn link(mut self, source: &str, dest: &str) -> Self {
        self.links.push((source.into(), dest.into(), "id".into()));
        self
    }

    pub fn typed_link(mut self, source: &str, dest: &str, link_type: &str) -> Self {
        self.links.push((source.into(), dest.into(), link_type.into()));
        self
    }

    /// Write the database; keep the `TempDir` alive while using the path
    pub fn build(self) -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("org-roam.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        for (id, title, file) in &self.nodes {
            conn.execute(
                "INSERT INTO nodes (id, file, level, pos, title, properties, olp)
                 VALUES (?1, ?2, 0, 1, ?3, '()', 'nil')",
                params![quoted(id), quoted(file), quoted(title)],
            )
            .unwrap();
        }
        for (id, tag) in &self.tags {
            conn.execute(
                "INSERT INTO tags (node_id, tag) VALUES (?1, ?2)",
                params![quoted(id), quoted(tag)],
            )
            .unwrap();
        }
        for (pos, (source, dest, link_type)) in self.links.iter().enumerate() {
            conn.execute(
                "INSERT INTO links (pos, source, dest, type, properties)
                 VALUES (?1, ?2, ?3, ?4, '(:outline nil)')",
                params![pos as i64, quoted(source), quoted(dest), quoted(link_type)],
            )
            .unwrap();
        }

        (dir, path)
    }
}

/// Foo(1) → Bar(2), Baz(3) isolated
pub fn example_db() -> (TempDir, PathBuf) {
    RoamDbBuilder::new()
        .node("1", "Foo")
        .node("2", "Bar")
        .node("3", "Baz")
        .link("1", "2")
        .build()
}

/// Small math collection with a duplicated title and web links
pub fn math_db() -> (TempDir, PathBuf) {
    RoamDbBuilder::new()
        .node("a1", "monoidal category")
        .node("a2", "representation of group")
        .node("a3", "category")
        .node("a4", "draft idea")
        .node("d1", "Dup")
        .node("d2", "Dup")
        .tag("a1", "category-theory")
        .tag("a3", "category-theory")
        .tag("a2", "algebra")
        .tag("a4", "fleeting")
        .tag("a4", "draft")
        .link("a1", "a2")
        .link("a1", "a3")
        .link("a2", "a3")
        .link("a3", "missing-node")
        .link("d2", "d1")
        .typed_link("a1", "//ncatlab.org/nlab/show/monoidal+category", "https")
        .typed_link("a2", "~/papers/reps.pdf", "file")
        .build()
}
