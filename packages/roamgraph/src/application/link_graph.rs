//! Derived link graph (petgraph)
//!
//! Directed multigraph where:
//! - Nodes are node IDs
//! - Edges are body links (A → B means A references B)
//!
//! Built strictly from a node index. The reverse adjacency (backlinks) is
//! computed in the same pass so both directions always agree.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::domain::RoamNode;

#[derive(Debug, Clone, Default)]
pub struct LinkGraph {
    /// Directed graph: node ID → IDs it references
    graph: DiGraph<String, ()>,

    /// ID → graph node index
    id_to_node: HashMap<String, NodeIndex>,

    /// ID → IDs of nodes referencing it
    backlinks: BTreeMap<String, BTreeSet<String>>,
}

impl LinkGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph and reverse adjacency from a node index
    pub fn build(node_index: &BTreeMap<String, RoamNode>) -> Self {
        let mut graph = DiGraph::with_capacity(node_index.len(), 0);
        let mut id_to_node = HashMap::with_capacity(node_index.len());
        let mut backlinks: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for id in node_index.keys() {
            let idx = graph.add_node(id.clone());
            id_to_node.insert(id.clone(), idx);
            backlinks.insert(id.clone(), BTreeSet::new());
        }

        for (source, node) in node_index {
            let from_idx = id_to_node[source];
            for dest in &node.links_to {
                // Dangling destinations still get a vertex, but no backlink entry
                let to_idx = match id_to_node.get(dest) {
                    Some(&idx) => idx,
                    None => {
                        let idx = graph.add_node(dest.clone());
                        id_to_node.insert(dest.clone(), idx);
                        idx
                    }
                };
                graph.add_edge(from_idx, to_idx, ());

                if let Some(sources) = backlinks.get_mut(dest) {
                    sources.insert(source.clone());
                }
            }
        }

        Self {
            graph,
            id_to_node,
            backlinks,
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.id_to_node.contains_key(id)
    }

    /// IDs referenced by `id`
    pub fn outgoing(&self, id: &str) -> Vec<&str> {
        self.neighbors(id, Direction::Outgoing)
    }

    /// IDs referencing `id`
    pub fn incoming(&self, id: &str) -> Vec<&str> {
        self.neighbors(id, Direction::Incoming)
    }

    fn neighbors(&self, id: &str, direction: Direction) -> Vec<&str> {
        match self.id_to_node.get(id) {
            Some(&idx) => {
                let mut ids: Vec<&str> = self
                    .graph
                    .neighbors_directed(idx, direction)
                    .map(|n| self.graph[n].as_str())
                    .collect();
                ids.sort_unstable();
                ids
            }
            None => Vec::new(),
        }
    }

    /// Precomputed backlinks of a loaded node
    pub fn backlinks(&self, id: &str) -> Option<&BTreeSet<String>> {
        self.backlinks.get(id)
    }

    /// Backlinks of every loaded node
    pub fn backlink_index(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.backlinks
    }

    /// Every edge as `(source, dest)`
    pub fn edges(&self) -> Vec<(&str, &str)> {
        self.graph
            .edge_references()
            .map(|e| {
                (
                    self.graph[e.source()].as_str(),
                    self.graph[e.target()].as_str(),
                )
            })
            .collect()
    }

    /// Underlying petgraph graph
    pub fn inner(&self) -> &DiGraph<String, ()> {
        &self.graph
    }
}
