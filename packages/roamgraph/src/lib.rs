//! roamgraph - org-roam collections as link graphs
//!
//! Reads the nodes, tags and links recorded in an org-roam SQLite database
//! and assembles them into an in-memory node index plus a derived directed
//! link graph.
//!
//! ## Layers
//!
//! - `domain`: `RoamNode`, `OrgLink`, identifier kinds, the `NodeSource` port
//! - `infrastructure`: `SqliteNodeSource` (read-only, one connection per query)
//! - `application`: loader → assembler → `RoamGraph` facade
//!
//! ## Usage
//!
//! ```rust,no_run
//! use roamgraph::RoamGraph;
//!
//! let collection = RoamGraph::open("~/.emacs.d/org-roam.db")?;
//! if !collection.load_report().is_complete() {
//!     eprintln!("database could not be read");
//! }
//!
//! let node = collection.node("monoidal category")?;
//! for id in &node.links_to {
//!     println!("{} -> {}", node.title, collection.node_title(id)?);
//! }
//!
//! let connected = collection.remove_orphans();
//! println!("{} of {} nodes are linked", connected.len(), collection.len());
//! # Ok::<(), roamgraph::GraphError>(())
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod error;

pub mod infrastructure;

pub use error::{ErrorKind, GraphError, Result};

pub use application::{GraphState, LinkGraph, LoadReport, LoadStatus, Resolved, RoamGraph};
pub use config::GraphConfig;
pub use domain::{DuplicateTitlesWarning, IdentifierType, NodeSource, OrgLink, RoamNode};

#[cfg(feature = "sqlite")]
pub use infrastructure::SqliteNodeSource;
