//! Graph assembler
//!
//! Zips the parallel record lists into the node index. Lists are checked
//! before zipping: equal lengths, and the same node ID at every position of
//! every list. Either violation means the store returned inconsistent rows
//! and assembly fails with a structural mismatch.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use tracing::debug;

use crate::domain::{NodeRecords, RoamNode};
use crate::{GraphError, Result};

/// Node index plus the title-keyed link relation
#[derive(Debug, Clone, Default)]
pub struct AssembledGraph {
    pub node_index: BTreeMap<String, RoamNode>,
    pub title_to_links: BTreeMap<String, BTreeSet<String>>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Assembler {
    keep_dangling_links: bool,
}

impl Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep links whose destination is not a loaded node
    pub fn keep_dangling_links(mut self, keep: bool) -> Self {
        self.keep_dangling_links = keep;
        self
    }

    pub fn assemble(&self, records: NodeRecords) -> Result<AssembledGraph> {
        validate(&records)?;

        let NodeRecords {
            ids,
            files,
            titles,
            tags,
            links,
            misc_links,
        } = records;

        let known: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let mut node_index = BTreeMap::new();

        let rows = files
            .into_iter()
            .zip(titles)
            .zip(tags)
            .zip(links)
            .zip(misc_links);

        for (((((id, file), (_, title)), (_, tags)), (_, mut links_to)), (_, misc)) in rows {
            if !self.keep_dangling_links {
                links_to.retain(|dest| {
                    let present = known.contains(dest.as_str());
                    if !present {
                        debug!(source = %id, dest = %dest, "dropping dangling link");
                    }
                    present
                });
            }

            let node = RoamNode {
                id: id.clone(),
                title,
                file,
                tags,
                links_to,
                misc_links: misc,
            };
            node_index.insert(id, node);
        }

        let title_to_links = title_links(node_index.values());
        Ok(AssembledGraph {
            node_index,
            title_to_links,
        })
    }
}

/// Title → union of the link sets of every node carrying that title
pub fn title_links<'a>(
    nodes: impl IntoIterator<Item = &'a RoamNode>,
) -> BTreeMap<String, BTreeSet<String>> {
    let mut out: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for node in nodes {
        out.entry(node.title.clone())
            .or_default()
            .extend(node.links_to.iter().cloned());
    }
    out
}

fn validate(records: &NodeRecords) -> Result<()> {
    let expected = records.ids.len();
    for (name, count) in records.row_counts() {
        if count != expected {
            return Err(GraphError::structural_mismatch(format!(
                "{} has {} rows but ids has {}",
                name, count, expected
            )));
        }
    }

    let mut seen = HashSet::with_capacity(expected);
    for id in &records.ids {
        if !seen.insert(id.as_str()) {
            return Err(GraphError::structural_mismatch(format!(
                "Node ID {} returned more than once",
                id
            )));
        }
    }

    let columns: [(&str, Vec<&str>); 5] = [
        ("files", records.files.iter().map(|(id, _)| id.as_str()).collect()),
        ("titles", records.titles.iter().map(|(id, _)| id.as_str()).collect()),
        ("tags", records.tags.iter().map(|(id, _)| id.as_str()).collect()),
        ("links", records.links.iter().map(|(id, _)| id.as_str()).collect()),
        ("misc_links", records.misc_links.iter().map(|(id, _)| id.as_str()).collect()),
    ];

    for (name, column) in &columns {
        for (position, (expected_id, actual_id)) in records.ids.iter().zip(column).enumerate() {
            if expected_id.as_str() != *actual_id {
                return Err(GraphError::structural_mismatch(format!(
                    "{} row {} belongs to node {} but ids row {} is {}",
                    name, position, actual_id, position, expected_id
                )));
            }
        }
    }

    Ok(())
}
