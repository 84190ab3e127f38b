//! SQLite adapter for NodeSource
//!
//! Reads an org-roam database. Every query opens its own read-only
//! connection and drops it before returning, on success and on failure, so no
//! connection outlives a single query.

mod normalize;
mod queries;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags, Row};
use tracing::trace;

use crate::domain::{NodeSource, OrgLink};
use crate::{GraphError, Result};

pub use normalize::{clean, group_by_id};

/// org-roam database reader
#[derive(Debug, Clone)]
pub struct SqliteNodeSource {
    db_path: PathBuf,
}

impl SqliteNodeSource {
    /// Reader for the database at `db_path` (already expanded)
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Run `f` on a fresh read-only connection
    fn with_connection<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(&self.db_path, flags).map_err(|err| {
            GraphError::connection(format!(
                "Cannot open {}: {}",
                self.db_path.display(),
                err
            ))
            .with_source(err)
        })?;
        trace!(db = %self.db_path.display(), "connection opened");

        let result = f(&conn);
        drop(conn);
        trace!(db = %self.db_path.display(), "connection closed");
        result
    }

    fn query_rows<T>(
        &self,
        sql: &str,
        map: impl Fn(&Row<'_>) -> rusqlite::Result<T>,
    ) -> Result<Vec<T>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(sql)?;
            let rows = stmt.query_map([], |row| map(row))?;
            let mut out = Vec::new();
            for row in rows {
                out.push(row?);
            }
            Ok(out)
        })
    }

    fn id_and_text(&self, sql: &str) -> Result<Vec<(String, String)>> {
        self.query_rows(sql, |row| {
            let id: String = row.get(0)?;
            let value: Option<String> = row.get(1)?;
            Ok((clean(&id), value.as_deref().map(clean).unwrap_or_default()))
        })
    }

    /// One set per node from `(id, value)` rows
    fn id_and_set(&self, sql: &str) -> Result<Vec<(String, BTreeSet<String>)>> {
        let rows = self.query_rows(sql, |row| {
            let id: String = row.get(0)?;
            let value: Option<String> = row.get(1)?;
            Ok((clean(&id), non_empty(value.as_deref())))
        })?;
        Ok(group_by_id(rows))
    }
}

/// Cleaned value, `None` when absent or empty
fn non_empty(raw: Option<&str>) -> Option<String> {
    raw.map(clean).filter(|value| !value.is_empty())
}

impl NodeSource for SqliteNodeSource {
    fn location(&self) -> String {
        self.db_path.display().to_string()
    }

    fn ids(&self) -> Result<Vec<String>> {
        self.query_rows(queries::IDS, |row| {
            let id: String = row.get(0)?;
            Ok(clean(&id))
        })
    }

    fn files(&self) -> Result<Vec<(String, String)>> {
        self.id_and_text(queries::FILES)
    }

    fn titles(&self) -> Result<Vec<(String, String)>> {
        self.id_and_text(queries::TITLES)
    }

    fn tags(&self) -> Result<Vec<(String, BTreeSet<String>)>> {
        self.id_and_set(queries::TAGS)
    }

    fn links(&self) -> Result<Vec<(String, BTreeSet<String>)>> {
        self.id_and_set(queries::LINKS)
    }

    fn misc_links(&self) -> Result<Vec<(String, Vec<OrgLink>)>> {
        let rows = self.query_rows(queries::MISC_LINKS, |row| {
            let id: String = row.get(0)?;
            let link_type: Option<String> = row.get(1)?;
            let dest: Option<String> = row.get(2)?;
            let link = non_empty(link_type.as_deref())
                .zip(non_empty(dest.as_deref()))
                .map(|(link_type, content)| OrgLink::new(link_type, content));
            Ok((clean(&id), link))
        })?;
        Ok(group_by_id(rows))
    }
}
