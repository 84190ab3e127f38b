//! Port trait for the backing store
//!
//! The graph only ever reads from the store. Each query is independent: an
//! implementation must not rely on state shared between calls, and every list
//! it returns must be ordered by node ID ascending.

use std::collections::BTreeSet;
use std::fmt;

use super::node::OrgLink;
use crate::Result;

/// The read queries issued during a load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    Ids,
    Files,
    Titles,
    Tags,
    Links,
    MiscLinks,
}

impl QueryKind {
    pub const ALL: [QueryKind; 6] = [
        QueryKind::Ids,
        QueryKind::Files,
        QueryKind::Titles,
        QueryKind::Tags,
        QueryKind::Links,
        QueryKind::MiscLinks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKind::Ids => "ids",
            QueryKind::Files => "files",
            QueryKind::Titles => "titles",
            QueryKind::Tags => "tags",
            QueryKind::Links => "links",
            QueryKind::MiscLinks => "misc_links",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Read-only access to an org-roam store
///
/// # Implementations
///
/// - `SqliteNodeSource`: org-roam SQLite database file
pub trait NodeSource {
    /// Human-readable location of the store, used in logs
    fn location(&self) -> String;

    /// All node IDs
    fn ids(&self) -> Result<Vec<String>>;

    /// `(id, file)` per node
    fn files(&self) -> Result<Vec<(String, String)>>;

    /// `(id, title)` per node
    fn titles(&self) -> Result<Vec<(String, String)>>;

    /// `(id, tags)` per node; nodes without tags get an empty set
    fn tags(&self) -> Result<Vec<(String, BTreeSet<String>)>>;

    /// `(id, destination ids)` per node, node-to-node links only
    fn links(&self) -> Result<Vec<(String, BTreeSet<String>)>>;

    /// `(id, links)` per node for every link that is not a node reference
    fn misc_links(&self) -> Result<Vec<(String, Vec<OrgLink>)>>;
}
