//! Configuration (YAML/Env loading)
//!
//! ```yaml
//! db_path: ~/.emacs.d/org-roam.db
//! strict: false
//! keep_dangling_links: false
//! ```
//!
//! Environment overrides: `ROAMGRAPH_DB`, `ROAMGRAPH_STRICT`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{GraphError, Result};

pub const ENV_DB: &str = "ROAMGRAPH_DB";
pub const ENV_STRICT: &str = "ROAMGRAPH_STRICT";

/// Default org-roam database location
pub const DEFAULT_DB_PATH: &str = "~/.emacs.d/org-roam.db";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GraphConfig {
    /// Path to the org-roam database; a leading `~` is expanded
    pub db_path: PathBuf,

    /// Fail the load on the first failed query instead of building an empty collection
    pub strict: bool,

    /// Keep links to IDs that are not in the database
    pub keep_dangling_links: bool,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            strict: false,
            keep_dangling_links: false,
        }
    }
}

impl GraphConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            ..Self::default()
        }
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn keep_dangling_links(mut self, keep: bool) -> Self {
        self.keep_dangling_links = keep;
        self
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Apply `ROAMGRAPH_*` environment variables
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(db) = lookup(ENV_DB) {
            self.db_path = PathBuf::from(db);
        }
        if let Some(raw) = lookup(ENV_STRICT) {
            self.strict = parse_bool(ENV_STRICT, &raw)?;
        }
        Ok(self)
    }

    /// `db_path` with a leading `~` expanded
    pub fn expanded_db_path(&self) -> PathBuf {
        expand_home(&self.db_path)
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(GraphError::config(format!(
            "{} must be a boolean, got '{}'",
            key, other
        ))),
    }
}

/// Expand a leading `~` to the home directory
///
/// Paths without a leading `~`, or when no home directory is known, are
/// returned unchanged.
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}
