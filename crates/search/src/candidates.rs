//! Candidate accumulation and minimum-should-match
//!
//! Stage-1 posting rows are folded into:
//! - document frequencies: number of posting rows per query term
//! - one `Candidate` per document: per field, term → occurrence count
//!
//! Posting values are storage slots; candidates are indexed by the
//! request's declaration order.
//!
//! Candidates keep first-seen order so ranking ties are reproducible.

use serde_json::Value;
use sift_core::ViewRow;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

use crate::mapping::{FieldLayout, IndexKey};

/// Matched query terms of one document, per field
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Candidate {
    fields: Vec<BTreeMap<String, u32>>,
}

impl Candidate {
    /// Empty accumulator for `num_fields` fields
    pub fn new(num_fields: usize) -> Self {
        Candidate {
            fields: vec![BTreeMap::new(); num_fields],
        }
    }

    /// Count one occurrence of `term` in field `field`
    pub fn add(&mut self, field: usize, term: &str) {
        if let Some(terms) = self.fields.get_mut(field) {
            *terms.entry(term.to_string()).or_insert(0) += 1;
        }
    }

    /// Occurrences of `term` in field `field`
    pub fn term_count(&self, field: usize, term: &str) -> Option<u32> {
        self.fields.get(field).and_then(|t| t.get(term)).copied()
    }

    /// Per-field term tables, in field declaration order
    pub fn fields(&self) -> &[BTreeMap<String, u32>] {
        &self.fields
    }

    /// Distinct terms matched in any field
    pub fn matched_terms(&self) -> BTreeSet<&str> {
        self.fields
            .iter()
            .flat_map(|terms| terms.keys().map(String::as_str))
            .collect()
    }
}

/// Candidates in first-seen order, with per-term document frequencies
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    order: Vec<String>,
    by_id: HashMap<String, Candidate>,
    doc_freqs: HashMap<String, usize>,
}

impl CandidateSet {
    /// Fold posting rows into candidates
    ///
    /// Rows whose key is not a term key, or whose field slot is out of
    /// range, are ignored.
    pub fn accumulate(rows: &[ViewRow], layout: &FieldLayout) -> Self {
        let num_fields = layout.len();
        let mut set = CandidateSet::default();
        for row in rows {
            let Some(IndexKey::Term(term)) = IndexKey::decode(&row.key) else {
                debug!(key = %row.key, "Ignoring non-posting row");
                continue;
            };
            let slot = match &row.value {
                Value::Null => Some(0),
                value => value.as_u64().map(|s| s as usize),
            };
            let Some(field) = slot.and_then(|s| layout.declared(s)) else {
                debug!(key = %row.key, value = %row.value, "Ignoring posting with bad field slot");
                continue;
            };

            *set.doc_freqs.entry(term.clone()).or_insert(0) += 1;
            if !set.by_id.contains_key(&row.id) {
                set.order.push(row.id.clone());
            }
            set.by_id
                .entry(row.id.clone())
                .or_insert_with(|| Candidate::new(num_fields))
                .add(field, &term);
        }
        set
    }

    /// All document frequencies
    pub fn doc_freqs(&self) -> &HashMap<String, usize> {
        &self.doc_freqs
    }

    /// Candidate for a document
    pub fn get(&self, id: &str) -> Option<&Candidate> {
        self.by_id.get(id)
    }

    /// Candidate ids in first-seen order
    pub fn ids(&self) -> &[String] {
        &self.order
    }

    /// (id, candidate) pairs in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Candidate)> {
        self.order
            .iter()
            .filter_map(|id| self.by_id.get(id).map(|c| (id.as_str(), c)))
    }

    /// Number of candidates
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True if there are no candidates
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Drop candidates matching too few of the distinct query terms
    ///
    /// Only applies to queries with more than one distinct term. Returns the
    /// number of candidates removed.
    pub fn retain_min_should_match(&mut self, query_terms: &[String], mm: f64) -> usize {
        if query_terms.len() <= 1 {
            return 0;
        }
        let before = self.order.len();
        let by_id = &mut self.by_id;
        self.order.retain(|id| {
            let keep = by_id
                .get(id)
                .map(|c| {
                    let found = c.matched_terms();
                    let matched = query_terms
                        .iter()
                        .filter(|t| found.contains(t.as_str()))
                        .count();
                    meets_min_should_match(matched, query_terms.len(), mm)
                })
                .unwrap_or(false);
            if !keep {
                by_id.remove(id);
            }
            keep
        });
        before - self.order.len()
    }
}

/// Matching ratio floored to two decimals, compared against `mm`
///
/// 1 of 3 terms is 33%: kept for `mm = 0.33`, dropped for `mm = 0.34`.
pub fn meets_min_should_match(matched: usize, total: usize, mm: f64) -> bool {
    if total == 0 {
        return true;
    }
    let percent = (matched * 100 / total) as f64;
    percent / 100.0 >= mm
}
