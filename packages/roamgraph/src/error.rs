//! Error types for roamgraph

use std::fmt;
use thiserror::Error;

/// Graph error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Query errors against the backing store
    Database,
    /// Backing store could not be opened
    Connection,
    /// Identifier is neither a known ID nor a known title
    NodeNotFound,
    /// Parallel record lists disagree in length or ID order
    StructuralMismatch,
    /// Derived state accessed after the node index was mutated
    StaleGraph,
    /// Invalid tag pattern
    InvalidPattern,
    /// Configuration errors
    Config,
    /// I/O errors
    IO,
    /// Serialization/deserialization errors
    Serialization,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Database => "database",
            ErrorKind::Connection => "connection",
            ErrorKind::NodeNotFound => "node_not_found",
            ErrorKind::StructuralMismatch => "structural_mismatch",
            ErrorKind::StaleGraph => "stale_graph",
            ErrorKind::InvalidPattern => "invalid_pattern",
            ErrorKind::Config => "config",
            ErrorKind::IO => "io",
            ErrorKind::Serialization => "serialization",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Graph error type
#[derive(Debug, Error)]
#[error("[{kind}] {message}")]
pub struct GraphError {
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
    pub kind: ErrorKind,
    pub message: String,
}

impl GraphError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // Convenience constructors
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Connection, message)
    }

    pub fn node_not_found(identifier: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::NodeNotFound,
            format!("No node with identifier: {}", identifier.into()),
        )
    }

    pub fn structural_mismatch(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StructuralMismatch, message)
    }

    pub fn stale_graph(operation: &str) -> Self {
        Self::new(
            ErrorKind::StaleGraph,
            format!(
                "Node index was modified; call refresh() before {}",
                operation
            ),
        )
    }

    pub fn invalid_pattern(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidPattern, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Serialization, message)
    }
}

// SQLite error conversions
#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for GraphError {
    fn from(err: rusqlite::Error) -> Self {
        GraphError::database(format!("SQLite error: {}", err)).with_source(err)
    }
}

impl From<regex::Error> for GraphError {
    fn from(err: regex::Error) -> Self {
        GraphError::invalid_pattern(format!("Regex error: {}", err)).with_source(err)
    }
}

impl From<serde_json::Error> for GraphError {
    fn from(err: serde_json::Error) -> Self {
        GraphError::serialization(format!("JSON error: {}", err)).with_source(err)
    }
}

impl From<serde_yaml::Error> for GraphError {
    fn from(err: serde_yaml::Error) -> Self {
        GraphError::config(format!("YAML error: {}", err)).with_source(err)
    }
}

impl From<std::io::Error> for GraphError {
    fn from(err: std::io::Error) -> Self {
        GraphError::new(ErrorKind::IO, format!("I/O error: {}", err)).with_source(err)
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, GraphError>;
