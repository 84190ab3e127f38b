//! Domain layer
//!
//! # Domain Models
//!
//! - `RoamNode`: One org-roam node (ID, title, file, tags, links)
//! - `OrgLink`: Non-node link found in a node body (`https`, `file`, ...)
//! - `IdentifierType`: Classification of a user-supplied identifier
//! - `NodeRecords`: Normalized per-field rows as read from the backing store
//!
//! # Port Trait
//!
//! - `NodeSource`: Read-only access to the backing store

pub mod identifier;
pub mod node;
pub mod ports;
pub mod records;

pub use identifier::{DuplicateTitlesWarning, IdentifierType};
pub use node::{OrgLink, RoamNode};
pub use ports::{NodeSource, QueryKind};
pub use records::NodeRecords;
