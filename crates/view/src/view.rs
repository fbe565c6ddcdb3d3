//! A single persisted view
//!
//! Holds the emissions of every mapped document twice: by document (so a
//! changed document's previous rows can be retracted) and by key (so exact
//! key lookups are cheap). Re-applying the mapping function to a changed
//! document replaces its rows; applying it twice is idempotent.

use crate::store::Change;
use serde_json::Value;
use sift_core::{Emission, MapFunction, ViewRow};
use std::collections::{BTreeMap, HashMap};

/// In-memory persisted view
#[derive(Debug, Default)]
pub struct PersistedView {
    /// Last store sequence folded into the view
    last_seq: u64,
    /// doc id -> emissions, in emission order
    by_doc: HashMap<String, Vec<Emission>>,
    /// key -> doc id -> emitted values
    by_key: BTreeMap<String, BTreeMap<String, Vec<Value>>>,
}

impl PersistedView {
    /// Create an empty view that has seen no changes
    pub fn new() -> Self {
        Self::default()
    }

    /// Last store sequence folded into the view
    pub fn last_seq(&self) -> u64 {
        self.last_seq
    }

    /// Number of documents that produced at least one emission
    pub fn doc_count(&self) -> usize {
        self.by_doc.len()
    }

    /// Fold a batch of changes into the view
    ///
    /// Returns the number of changes applied.
    pub fn apply(&mut self, changes: &[(u64, Change)], map: &dyn MapFunction) -> usize {
        let mut applied = 0;
        for (seq, change) in changes {
            if *seq <= self.last_seq {
                continue;
            }
            self.retract(change.id());
            if let Change::Upserted(doc) = change {
                let emissions = map.map(doc);
                if !emissions.is_empty() {
                    self.insert(doc.id(), emissions);
                }
            }
            self.last_seq = *seq;
            applied += 1;
        }
        applied
    }

    /// Advance the watermark without any change to fold in
    pub fn advance_to(&mut self, seq: u64) {
        self.last_seq = self.last_seq.max(seq);
    }

    fn retract(&mut self, doc_id: &str) {
        let Some(old) = self.by_doc.remove(doc_id) else {
            return;
        };
        for emission in old {
            if let Some(docs) = self.by_key.get_mut(&emission.key) {
                docs.remove(doc_id);
                if docs.is_empty() {
                    self.by_key.remove(&emission.key);
                }
            }
        }
    }

    fn insert(&mut self, doc_id: &str, emissions: Vec<Emission>) {
        for emission in &emissions {
            self.by_key
                .entry(emission.key.clone())
                .or_default()
                .entry(doc_id.to_string())
                .or_default()
                .push(emission.value.clone());
        }
        self.by_doc.insert(doc_id.to_string(), emissions);
    }

    /// Rows for the given keys, grouped in key order then by document id
    ///
    /// A key requested twice yields its rows twice.
    pub fn rows_for_keys(&self, keys: &[String], limit: Option<usize>) -> Vec<ViewRow> {
        let limit = limit.unwrap_or(usize::MAX);
        let mut rows = Vec::new();
        for key in keys {
            let Some(docs) = self.by_key.get(key) else {
                continue;
            };
            for (id, values) in docs {
                for value in values {
                    if rows.len() >= limit {
                        return rows;
                    }
                    rows.push(ViewRow {
                        id: id.clone(),
                        key: key.clone(),
                        value: value.clone(),
                    });
                }
            }
        }
        rows
    }

    /// All rows in key order
    pub fn all_rows(&self, limit: Option<usize>) -> Vec<ViewRow> {
        let limit = limit.unwrap_or(usize::MAX);
        self.by_key
            .iter()
            .flat_map(|(key, docs)| {
                docs.iter().flat_map(move |(id, values)| {
                    values.iter().map(move |value| ViewRow {
                        id: id.clone(),
                        key: key.clone(),
                        value: value.clone(),
                    })
                })
            })
            .take(limit)
            .collect()
    }
}
