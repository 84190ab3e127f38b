//! Identifier classification
//!
//! Nodes are identified uniquely by ID and non-uniquely by title. Operations
//! that accept either classify the input first.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of a user-supplied identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierType {
    /// Known node ID
    Id,
    /// Known node title
    Title,
    /// Neither
    Nothing,
}

impl IdentifierType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentifierType::Id => "id",
            IdentifierType::Title => "title",
            IdentifierType::Nothing => "nothing",
        }
    }
}

impl fmt::Display for IdentifierType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Title resolution picked one of several nodes sharing a title
///
/// Soft failure: the resolution still succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateTitlesWarning {
    /// The ambiguous title
    pub title: String,
    /// IDs of every node carrying the title, ascending
    pub candidates: Vec<String>,
    /// ID that was picked
    pub chosen: String,
}

impl fmt::Display for DuplicateTitlesWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Title '{}' is shared by {} nodes; resolved to {}. This may not be the node you want",
            self.title,
            self.candidates.len(),
            self.chosen
        )
    }
}
