//! Infrastructure layer - Backing store adapters

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteNodeSource;
