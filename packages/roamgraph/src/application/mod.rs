//! Application layer
//!
//! Data flows one way: [`loader`] → [`assembler`] → [`graph`]. Only the
//! [`graph::RoamGraph`] facade is meant for callers; the other modules are
//! public for custom backing stores and tests.

pub mod assembler;
pub mod graph;
pub mod link_graph;
pub mod loader;

pub use assembler::{AssembledGraph, Assembler};
pub use graph::{GraphState, Resolved, RoamGraph};
pub use link_graph::LinkGraph;
pub use loader::{LoadOutcome, LoadReport, LoadStatus, QueryFailure, RecordLoader};
