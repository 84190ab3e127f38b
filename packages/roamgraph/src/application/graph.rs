//! Graph facade
//!
//! [`RoamGraph`] owns the node index (ID → node) and the state derived from
//! it: the petgraph link graph with its reverse adjacency, the title lookup
//! and the list of duplicated titles.
//!
//! # Derived state
//!
//! ```text
//!   Loaded ──node_index_mut()/set_node_index()──▶ Dirty ──refresh()──▶ Refreshed
//!                                                   ▲                     │
//!                                                   └─────────────────────┘
//! ```
//!
//! Accessors backed by derived state return `ErrorKind::StaleGraph` while the
//! collection is `Dirty`. Indices computed straight from the node index
//! (`backlink_index`, `file_index`, orphans, ...) are always current.
//!
//! Filtering operations (`remove_orphans`, `filter_tags`, ...) never touch
//! `self`; they return a new collection.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{debug, info, warn};

use super::assembler::{title_links, AssembledGraph, Assembler};
use super::link_graph::LinkGraph;
use super::loader::{LoadReport, RecordLoader};
use crate::config::GraphConfig;
use crate::domain::{DuplicateTitlesWarning, IdentifierType, NodeSource, OrgLink, RoamNode};
use crate::{GraphError, Result};

/// Freshness of the derived state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphState {
    /// Built by a constructor
    Loaded,
    /// Node index modified since derived state was built
    Dirty,
    /// Derived state rebuilt by `refresh()`
    Refreshed,
}

/// Result of identifier resolution
#[derive(Debug, Clone)]
pub struct Resolved<'a> {
    pub node: &'a RoamNode,
    pub identifier_type: IdentifierType,
    /// Set when the identifier is a title shared by several nodes
    pub warning: Option<DuplicateTitlesWarning>,
}

/// An org-roam collection
#[derive(Debug, Clone)]
pub struct RoamGraph {
    db_path: Option<PathBuf>,
    load_report: LoadReport,
    node_index: BTreeMap<String, RoamNode>,
    state: GraphState,

    // Derived from node_index
    link_graph: LinkGraph,
    ids_by_title: BTreeMap<String, Vec<String>>,
    title_to_links: BTreeMap<String, BTreeSet<String>>,
    duplicate_titles: Vec<String>,
}

impl Default for RoamGraph {
    fn default() -> Self {
        Self::empty()
    }
}

impl RoamGraph {
    // ═══════════════════════════════════════════════════════════════════════
    // Construction
    // ═══════════════════════════════════════════════════════════════════════

    /// Collection with no nodes
    pub fn empty() -> Self {
        Self::from_assembled(AssembledGraph::default(), LoadReport::default())
    }

    /// Load the org-roam database at `db` with default settings
    ///
    /// An unreadable database yields an empty collection; check
    /// [`RoamGraph::load_report`] to tell it apart from an empty database.
    #[cfg(feature = "sqlite")]
    pub fn open(db: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(&GraphConfig::new(db.as_ref()))
    }

    /// Load the database named by `config`
    #[cfg(feature = "sqlite")]
    pub fn open_with(config: &GraphConfig) -> Result<Self> {
        let db_path = config.expanded_db_path();
        let source = crate::infrastructure::SqliteNodeSource::new(&db_path);
        let mut graph = Self::from_source(&source, config)?;
        graph.db_path = Some(db_path);
        Ok(graph)
    }

    /// Load from any backing store
    pub fn from_source<S: NodeSource + ?Sized>(source: &S, config: &GraphConfig) -> Result<Self> {
        let outcome = RecordLoader::new().strict(config.strict).load(source)?;
        let assembled = Assembler::new()
            .keep_dangling_links(config.keep_dangling_links)
            .assemble(outcome.records)?;

        let graph = Self::from_assembled(assembled, outcome.report);
        info!(
            nodes = graph.node_index.len(),
            links = graph.link_graph.edge_count(),
            "collection assembled"
        );
        Ok(graph)
    }

    /// Build a collection from nodes already in memory
    ///
    /// IDs are expected to be unique; a repeated ID keeps the last node.
    pub fn from_nodes(nodes: impl IntoIterator<Item = RoamNode>) -> Self {
        let node_index: BTreeMap<String, RoamNode> =
            nodes.into_iter().map(|n| (n.id.clone(), n)).collect();
        let title_to_links = title_links(node_index.values());
        Self::from_assembled(
            AssembledGraph {
                node_index,
                title_to_links,
            },
            LoadReport::default(),
        )
    }

    fn from_assembled(assembled: AssembledGraph, load_report: LoadReport) -> Self {
        let mut graph = Self {
            db_path: None,
            load_report,
            node_index: assembled.node_index,
            state: GraphState::Loaded,
            link_graph: LinkGraph::new(),
            ids_by_title: BTreeMap::new(),
            title_to_links: assembled.title_to_links,
            duplicate_titles: Vec::new(),
        };
        graph.derive();
        graph
    }

    /// Same provenance as `self`, different nodes
    fn derived_from(&self, node_index: BTreeMap<String, RoamNode>) -> Self {
        let title_to_links = title_links(node_index.values());
        let mut graph = Self::from_assembled(
            AssembledGraph {
                node_index,
                title_to_links,
            },
            self.load_report.clone(),
        );
        graph.db_path = self.db_path.clone();
        graph
    }

    fn derive(&mut self) {
        self.link_graph = LinkGraph::build(&self.node_index);

        self.ids_by_title.clear();
        for (id, node) in &self.node_index {
            self.ids_by_title
                .entry(node.title.clone())
                .or_default()
                .push(id.clone());
        }

        self.duplicate_titles = self
            .ids_by_title
            .iter()
            .filter(|(_, ids)| ids.len() > 1)
            .map(|(title, _)| title.clone())
            .collect();

        if !self.duplicate_titles.is_empty() {
            warn!(
                count = self.duplicate_titles.len(),
                "Collection contains duplicate titles. Matching nodes by title will be non-exhaustive."
            );
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Derived-state lifecycle
    // ═══════════════════════════════════════════════════════════════════════

    pub fn state(&self) -> GraphState {
        self.state
    }

    pub fn is_stale(&self) -> bool {
        self.state == GraphState::Dirty
    }

    fn ensure_fresh(&self, operation: &str) -> Result<()> {
        if self.is_stale() {
            return Err(GraphError::stale_graph(operation));
        }
        Ok(())
    }

    /// Mutable node index; marks the collection dirty until [`RoamGraph::refresh`]
    pub fn node_index_mut(&mut self) -> &mut BTreeMap<String, RoamNode> {
        self.state = GraphState::Dirty;
        &mut self.node_index
    }

    /// Replace the node index wholesale; marks the collection dirty
    pub fn set_node_index(&mut self, node_index: BTreeMap<String, RoamNode>) {
        self.state = GraphState::Dirty;
        self.node_index = node_index;
    }

    /// Rebuild every derived structure from the current node index
    pub fn refresh(&mut self) {
        self.title_to_links = title_links(self.node_index.values());
        self.derive();
        self.state = GraphState::Refreshed;
        debug!(nodes = self.node_index.len(), "derived state refreshed");
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Provenance
    // ═══════════════════════════════════════════════════════════════════════

    /// Expanded database path, `None` for in-memory collections
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    pub fn load_report(&self) -> &LoadReport {
        &self.load_report
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Identifier resolution
    // ═══════════════════════════════════════════════════════════════════════

    /// Classify an identifier; IDs take precedence over titles
    ///
    /// Reads the node index directly, so the answer stays current while the
    /// collection is `Dirty`. Resolving a title still needs
    /// [`RoamGraph::refresh`] first, see [`RoamGraph::resolve_title`].
    pub fn identifier_type(&self, identifier: &str) -> IdentifierType {
        if self.node_index.contains_key(identifier) {
            IdentifierType::Id
        } else if self.node_index.values().any(|n| n.title == identifier) {
            IdentifierType::Title
        } else {
            IdentifierType::Nothing
        }
    }

    /// Resolve an ID or title to a node
    ///
    /// A title shared by several nodes resolves to the one with the smallest
    /// ID and carries a [`DuplicateTitlesWarning`], which is also logged.
    pub fn resolve(&self, identifier: &str) -> Result<Resolved<'_>> {
        if let Some(node) = self.node_index.get(identifier) {
            return Ok(Resolved {
                node,
                identifier_type: IdentifierType::Id,
                warning: None,
            });
        }
        self.resolve_title(identifier)
    }

    /// Resolve a title only
    ///
    /// Uses the derived title lookup and returns `ErrorKind::StaleGraph`
    /// while the collection is `Dirty`.
    pub fn resolve_title(&self, title: &str) -> Result<Resolved<'_>> {
        self.ensure_fresh("title resolution")?;

        let ids = self
            .ids_by_title
            .get(title)
            .ok_or_else(|| GraphError::node_not_found(title))?;
        let chosen = &ids[0];
        let node = self
            .node_index
            .get(chosen)
            .ok_or_else(|| GraphError::node_not_found(title))?;

        let warning = (ids.len() > 1).then(|| DuplicateTitlesWarning {
            title: title.to_string(),
            candidates: ids.clone(),
            chosen: chosen.clone(),
        });
        if let Some(w) = &warning {
            warn!(title = %w.title, chosen = %w.chosen, "{}", w);
        }

        Ok(Resolved {
            node,
            identifier_type: IdentifierType::Title,
            warning,
        })
    }

    /// Node by ID or title
    pub fn node(&self, identifier: &str) -> Result<&RoamNode> {
        Ok(self.resolve(identifier)?.node)
    }

    /// Title of the node with the given ID
    pub fn node_title(&self, id: &str) -> Result<&str> {
        self.node_index
            .get(id)
            .map(|n| n.title.as_str())
            .ok_or_else(|| GraphError::node_not_found(id))
    }

    /// ID of the node with the given title
    pub fn node_id(&self, title: &str) -> Result<&str> {
        Ok(self.resolve_title(title)?.node.id.as_str())
    }

    /// IDs referenced by the node
    pub fn node_links(&self, identifier: &str) -> Result<&BTreeSet<String>> {
        Ok(&self.resolve(identifier)?.node.links_to)
    }

    /// IDs of nodes referencing the node, from the precomputed reverse index
    pub fn node_backlinks(&self, identifier: &str) -> Result<&BTreeSet<String>> {
        self.ensure_fresh("node_backlinks()")?;
        let node = self.resolve(identifier)?.node;
        self.link_graph
            .backlinks(&node.id)
            .ok_or_else(|| GraphError::node_not_found(identifier))
    }

    /// IDs of nodes referencing `node`, by scanning the node index
    pub fn scan_backlinks(&self, node: &RoamNode) -> BTreeSet<String> {
        self.node_index
            .values()
            .filter(|other| other.links(&node.id))
            .map(|other| other.id.clone())
            .collect()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Indices
    // ═══════════════════════════════════════════════════════════════════════

    /// ID → node
    pub fn node_index(&self) -> &BTreeMap<String, RoamNode> {
        &self.node_index
    }

    /// ID → title
    pub fn title_index(&self) -> BTreeMap<&str, &str> {
        self.node_index
            .iter()
            .map(|(id, n)| (id.as_str(), n.title.as_str()))
            .collect()
    }

    /// ID → tags
    pub fn tag_index(&self) -> BTreeMap<&str, &BTreeSet<String>> {
        self.node_index
            .iter()
            .map(|(id, n)| (id.as_str(), &n.tags))
            .collect()
    }

    /// ID → IDs of nodes referencing it
    pub fn backlink_index(&self) -> BTreeMap<String, BTreeSet<String>> {
        let mut index: BTreeMap<String, BTreeSet<String>> = self
            .node_index
            .keys()
            .map(|id| (id.clone(), BTreeSet::new()))
            .collect();
        for (source, node) in &self.node_index {
            for dest in &node.links_to {
                if let Some(sources) = index.get_mut(dest) {
                    sources.insert(source.clone());
                }
            }
        }
        index
    }

    /// ID → file
    pub fn file_index(&self) -> BTreeMap<&str, &str> {
        self.node_index
            .iter()
            .map(|(id, n)| (id.as_str(), n.file.as_str()))
            .collect()
    }

    /// ID → links that are not node references
    pub fn misc_link_index(&self) -> BTreeMap<&str, &[OrgLink]> {
        self.node_index
            .iter()
            .map(|(id, n)| (id.as_str(), n.misc_links.as_slice()))
            .collect()
    }

    /// ID → IDs referenced
    pub fn link_index(&self) -> BTreeMap<&str, &BTreeSet<String>> {
        self.node_index
            .iter()
            .map(|(id, n)| (id.as_str(), &n.links_to))
            .collect()
    }

    /// Title → union of link destinations of the nodes carrying it
    pub fn title_links(&self) -> Result<&BTreeMap<String, BTreeSet<String>>> {
        self.ensure_fresh("title_links()")?;
        Ok(&self.title_to_links)
    }

    /// Derived link graph
    pub fn graph(&self) -> Result<&LinkGraph> {
        self.ensure_fresh("graph()")?;
        Ok(&self.link_graph)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Listings
    // ═══════════════════════════════════════════════════════════════════════

    pub fn len(&self) -> usize {
        self.node_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_index.is_empty()
    }

    /// Nodes in ID order
    pub fn nodes(&self) -> Vec<&RoamNode> {
        self.node_index.values().collect()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.node_index.keys().map(String::as_str).collect()
    }

    pub fn titles(&self) -> Vec<&str> {
        self.node_index.values().map(|n| n.title.as_str()).collect()
    }

    /// File names in ID order; `base` keeps only the final path component
    pub fn fnames(&self, base: bool) -> Vec<String> {
        self.node_index
            .values()
            .map(|n| {
                if base {
                    Path::new(&n.file)
                        .file_name()
                        .map(|f| f.to_string_lossy().into_owned())
                        .unwrap_or_else(|| n.file.clone())
                } else {
                    n.file.clone()
                }
            })
            .collect()
    }

    /// `(title, links_to)` per node in ID order
    pub fn links(&self) -> Vec<(&str, &BTreeSet<String>)> {
        self.node_index
            .values()
            .map(|n| (n.title.as_str(), &n.links_to))
            .collect()
    }

    /// Every tag used in the collection
    pub fn all_tags(&self) -> BTreeSet<&str> {
        self.node_index
            .values()
            .flat_map(|n| n.tags.iter().map(String::as_str))
            .collect()
    }

    /// Titles carried by more than one node
    pub fn duplicate_titles(&self) -> Result<&[String]> {
        self.ensure_fresh("duplicate_titles()")?;
        Ok(&self.duplicate_titles)
    }

    /// `(node count, edge count)`
    pub fn size(&self) -> Result<(usize, usize)> {
        self.ensure_fresh("size()")?;
        Ok((self.node_index.len(), self.link_graph.edge_count()))
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Orphans
    // ═══════════════════════════════════════════════════════════════════════

    /// No other node links to `node` and `node` links to no other node
    ///
    /// Uses the precomputed backlinks when the derived state is fresh and
    /// scans the node index otherwise.
    pub fn is_orphan(&self, node: &RoamNode) -> bool {
        if node.outbound().next().is_some() {
            return false;
        }
        let pointed_to = match self.fresh_backlinks(&node.id) {
            Some(sources) => sources.iter().any(|source| *source != node.id),
            None => self
                .node_index
                .values()
                .any(|other| other.id != node.id && other.links(&node.id)),
        };
        !pointed_to
    }

    fn fresh_backlinks(&self, id: &str) -> Option<&BTreeSet<String>> {
        if self.is_stale() {
            return None;
        }
        self.link_graph.backlinks(id)
    }

    /// Orphan nodes in ID order
    pub fn orphans(&self) -> Vec<&RoamNode> {
        self.node_index
            .values()
            .filter(|n| self.is_orphan(n))
            .collect()
    }

    /// True when the collection has no orphans
    pub fn is_connected(&self) -> bool {
        self.node_index.values().all(|n| !self.is_orphan(n))
    }

    /// New collection without the orphans
    pub fn remove_orphans(&self) -> RoamGraph {
        let kept: BTreeMap<String, RoamNode> = self
            .node_index
            .iter()
            .filter(|(_, n)| !self.is_orphan(n))
            .map(|(id, n)| (id.clone(), n.clone()))
            .collect();
        debug!(
            removed = self.node_index.len() - kept.len(),
            "orphans removed"
        );
        self.derived_from(kept)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Tag filtering
    // ═══════════════════════════════════════════════════════════════════════

    /// New collection filtered by exact tags
    ///
    /// With `exclude` the matching nodes are dropped, otherwise only they are
    /// kept. Links to dropped nodes are removed from the survivors.
    pub fn filter_tags<S: AsRef<str>>(&self, tags: &[S], exclude: bool) -> RoamGraph {
        self.filter_nodes(|n| n.has_tag(tags) != exclude)
    }

    /// New collection filtered by tag patterns; see [`RoamGraph::filter_tags`]
    pub fn filter_regex_tags(&self, patterns: &[Regex], exclude: bool) -> RoamGraph {
        self.filter_nodes(|n| n.has_regex_tag(patterns) != exclude)
    }

    /// Compile `patterns` and filter by them
    pub fn filter_tag_patterns<S: AsRef<str>>(
        &self,
        patterns: &[S],
        exclude: bool,
    ) -> Result<RoamGraph> {
        let compiled = patterns
            .iter()
            .map(|p| Regex::new(p.as_ref()))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(self.filter_regex_tags(&compiled, exclude))
    }

    fn filter_nodes(&self, keep: impl Fn(&RoamNode) -> bool) -> RoamGraph {
        let removed: HashSet<&str> = self
            .node_index
            .values()
            .filter(|n| !keep(*n))
            .map(|n| n.id.as_str())
            .collect();

        let kept: BTreeMap<String, RoamNode> = self
            .node_index
            .iter()
            .filter(|(id, _)| !removed.contains(id.as_str()))
            .map(|(id, n)| {
                let mut node = n.clone();
                node.links_to.retain(|dest| !removed.contains(dest.as_str()));
                (id.clone(), node)
            })
            .collect();

        self.derived_from(kept)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Export
    // ═══════════════════════════════════════════════════════════════════════

    /// Nodes as a JSON array in ID order
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let nodes = self.nodes();
        let json = if pretty {
            serde_json::to_string_pretty(&nodes)?
        } else {
            serde_json::to_string(&nodes)?
        };
        Ok(json)
    }
}
