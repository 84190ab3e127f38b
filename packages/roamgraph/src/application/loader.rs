//! Relational loader
//!
//! Issues every read query against a [`NodeSource`] and gathers the rows into
//! [`NodeRecords`]. A failed query does not abort the load unless the loader
//! is strict: the failure is logged, recorded in the [`LoadReport`], and the
//! whole record set is reported as "nothing loaded" so that a broken store is
//! never mistaken for a partially loaded one.

use std::fmt;

use tracing::{info, warn};

use crate::domain::{NodeRecords, NodeSource, QueryKind};
use crate::{ErrorKind, GraphError, Result};

/// One query that failed during a load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryFailure {
    pub query: QueryKind,
    pub kind: ErrorKind,
    pub message: String,
}

impl fmt::Display for QueryFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} query failed: {}", self.query, self.message)
    }
}

/// Whether the store delivered what was asked of it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// Every query succeeded (the collection may still legitimately be empty)
    Complete,
    /// At least one query failed; nothing was loaded
    Failed,
    /// Collection was not read from a store
    NotLoaded,
}

/// Outcome of a load, kept by the graph for callers to inspect
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Store location, `None` for collections built in memory
    pub location: Option<String>,
    pub failures: Vec<QueryFailure>,
}

impl LoadReport {
    pub fn status(&self) -> LoadStatus {
        match (&self.location, self.failures.is_empty()) {
            (None, _) => LoadStatus::NotLoaded,
            (Some(_), true) => LoadStatus::Complete,
            (Some(_), false) => LoadStatus::Failed,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status() == LoadStatus::Complete
    }
}

/// Records plus the report describing how they were obtained
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub records: NodeRecords,
    pub report: LoadReport,
}

/// Runs the read queries of a load
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordLoader {
    strict: bool,
}

impl RecordLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the load on the first failed query instead of recording it
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn load<S: NodeSource + ?Sized>(&self, source: &S) -> Result<LoadOutcome> {
        let mut report = LoadReport {
            location: Some(source.location()),
            failures: Vec::new(),
        };

        let records = NodeRecords {
            ids: self.run(QueryKind::Ids, &mut report, || source.ids())?,
            files: self.run(QueryKind::Files, &mut report, || source.files())?,
            titles: self.run(QueryKind::Titles, &mut report, || source.titles())?,
            tags: self.run(QueryKind::Tags, &mut report, || source.tags())?,
            links: self.run(QueryKind::Links, &mut report, || source.links())?,
            misc_links: self.run(QueryKind::MiscLinks, &mut report, || source.misc_links())?,
        };

        if !report.failures.is_empty() {
            warn!(
                location = %source.location(),
                failed = report.failures.len(),
                "org-roam store could not be read; collection is empty"
            );
            return Ok(LoadOutcome {
                records: NodeRecords::default(),
                report,
            });
        }

        info!(location = %source.location(), nodes = records.len(), "records loaded");
        Ok(LoadOutcome { records, report })
    }

    fn run<T: Default>(
        &self,
        query: QueryKind,
        report: &mut LoadReport,
        f: impl FnOnce() -> Result<T>,
    ) -> Result<T> {
        match f() {
            Ok(rows) => Ok(rows),
            Err(err) if self.strict => Err(GraphError::new(
                err.kind,
                format!("{} query failed: {}", query, err.message),
            )
            .with_source(err)),
            Err(err) => {
                warn!(query = %query, error = %err, "query failed");
                report.failures.push(QueryFailure {
                    query,
                    kind: err.kind,
                    message: err.message,
                });
                Ok(T::default())
            }
        }
    }
}
