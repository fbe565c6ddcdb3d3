//! View types shared by the search layer and view engines
//!
//! This module defines the data exchanged across the view-engine boundary:
//! - Emission: one (key, value) pair produced by a mapping function
//! - ViewRow: one row returned by a view query
//! - Stale: caller-chosen freshness level
//! - ViewQuery: options for a view query
//! - ViewResponse: rows returned by a view query

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Emission
// ============================================================================

/// One (key, value) pair emitted by a mapping function for a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Emission {
    /// Index key
    pub key: String,
    /// Associated value (`Null` when the mapping function emits none)
    pub value: Value,
}

impl Emission {
    /// Create a new emission
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Emission {
            key: key.into(),
            value,
        }
    }
}

// ============================================================================
// ViewRow
// ============================================================================

/// A row of a view: the emitting document's id plus the emission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewRow {
    /// Id of the document that produced the row
    pub id: String,
    /// Index key
    pub key: String,
    /// Emitted value
    pub value: Value,
}

// ============================================================================
// Stale
// ============================================================================

/// Freshness trade-off for a view query
///
/// When no `Stale` level is given the query blocks until the view has
/// caught up with every document change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stale {
    /// Serve whatever the view holds, never trigger an update
    Ok,
    /// Serve whatever the view holds, then refresh it in the background
    UpdateAfter,
}

impl Stale {
    /// Wire name of the level
    pub fn as_str(&self) -> &'static str {
        match self {
            Stale::Ok => "ok",
            Stale::UpdateAfter => "update_after",
        }
    }
}

impl fmt::Display for Stale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ok" => Ok(Stale::Ok),
            "update_after" => Ok(Stale::UpdateAfter),
            other => Err(Error::bad_request(format!(
                "invalid stale value '{}', expected \"ok\" or \"update_after\"",
                other
            ))),
        }
    }
}

// ============================================================================
// ViewQuery
// ============================================================================

/// Options for a single view query
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewQuery {
    /// Name under which the view is persisted
    pub save_as: String,
    /// Restrict rows to these keys (None = all rows)
    pub keys: Option<Vec<String>>,
    /// Freshness level (None = block until up to date)
    pub stale: Option<Stale>,
    /// Maximum rows to return; `Some(0)` only brings the view up to date
    pub limit: Option<usize>,
}

impl ViewQuery {
    /// Create a query against the named view
    pub fn new(save_as: impl Into<String>) -> Self {
        ViewQuery {
            save_as: save_as.into(),
            ..Default::default()
        }
    }

    /// Builder: restrict to a key set
    pub fn with_keys(mut self, keys: Vec<String>) -> Self {
        self.keys = Some(keys);
        self
    }

    /// Builder: set freshness level
    pub fn with_stale(mut self, stale: Option<Stale>) -> Self {
        self.stale = stale;
        self
    }

    /// Builder: set row limit
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

// ============================================================================
// ViewResponse
// ============================================================================

/// Rows returned by a view query
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewResponse {
    /// Matching rows, grouped by requested key then ordered by document id
    pub rows: Vec<ViewRow>,
}

impl ViewResponse {
    /// Response without rows
    pub fn empty() -> Self {
        ViewResponse { rows: vec![] }
    }
}
