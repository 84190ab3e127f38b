//! Normalized rows read from the backing store
//!
//! Every list is ordered by node ID ascending and every per-field list carries
//! the node ID next to the value, so position `i` can be checked to describe
//! the same node across lists before they are zipped.

use std::collections::BTreeSet;

use super::node::OrgLink;

/// Parallel per-field lists, one entry per node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeRecords {
    pub ids: Vec<String>,
    pub files: Vec<(String, String)>,
    pub titles: Vec<(String, String)>,
    pub tags: Vec<(String, BTreeSet<String>)>,
    pub links: Vec<(String, BTreeSet<String>)>,
    pub misc_links: Vec<(String, Vec<OrgLink>)>,
}

impl NodeRecords {
    /// Number of nodes according to the ID query
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Row counts per list, in (ids, files, titles, tags, links, misc_links) order
    pub fn row_counts(&self) -> [(&'static str, usize); 6] {
        [
            ("ids", self.ids.len()),
            ("files", self.files.len()),
            ("titles", self.titles.len()),
            ("tags", self.tags.len()),
            ("links", self.links.len()),
            ("misc_links", self.misc_links.len()),
        ]
    }
}
