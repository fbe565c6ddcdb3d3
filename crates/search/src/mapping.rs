//! Index mapping function
//!
//! Reduces a document to the two kinds of view rows the query side needs:
//!
//! - one posting per token occurrence, keyed `a<term>`, valued with the
//!   field slot (null when a single field is indexed)
//! - one norms row per document, keyed `b<doc id>`, valued with the
//!   per-field length norms in slot order
//!
//! Slots follow field names in sorted order, the same order the index
//! identity hashes, so requests declaring one field set in different orders
//! read the same index consistently. `FieldLayout` maps slots back to the
//! declaration order of the request at hand.
//!
//! Repeated tokens produce repeated postings; the query side counts them.

use crate::field::FieldSpec;
use crate::filter::{DocumentFilter, FilterOutcome, SharedErrorReporter};
use crate::tokenizer::Tokenizer;
use serde_json::{json, Value};
use sift_core::{Document, Emission, MapFunction};
use std::fmt;
use std::sync::Arc;

/// Key prefix of posting rows
pub const TOKEN_TAG: char = 'a';
/// Key prefix of per-document norms rows
pub const DOC_INFO_TAG: char = 'b';

/// Typed view key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndexKey {
    /// Posting for a term
    Term(String),
    /// Norms of a document
    DocInfo(String),
}

impl IndexKey {
    /// Encoded view key
    pub fn encode(&self) -> String {
        let (tag, rest) = match self {
            IndexKey::Term(term) => (TOKEN_TAG, term),
            IndexKey::DocInfo(id) => (DOC_INFO_TAG, id),
        };
        let mut key = String::with_capacity(rest.len() + 1);
        key.push(tag);
        key.push_str(rest);
        key
    }

    /// Decode a view key; `None` for keys this module never emits
    pub fn decode(key: &str) -> Option<IndexKey> {
        let mut chars = key.chars();
        let tag = chars.next()?;
        let rest = chars.as_str().to_string();
        match tag {
            TOKEN_TAG => Some(IndexKey::Term(rest)),
            DOC_INFO_TAG => Some(IndexKey::DocInfo(rest)),
            _ => None,
        }
    }
}

/// Length norm of a field with `token_count` tokens
pub fn field_norm(token_count: usize) -> f64 {
    (token_count as f64).sqrt()
}

/// Storage slots of a request's fields
///
/// Slot `s` holds the field whose name sorts `s`-th; `declared(s)` is that
/// field's position in the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLayout {
    declared_by_slot: Vec<usize>,
}

impl FieldLayout {
    /// Layout of `fields`, in declaration order
    pub fn new(fields: &[FieldSpec]) -> Self {
        let mut declared_by_slot: Vec<usize> = (0..fields.len()).collect();
        declared_by_slot.sort_by(|&a, &b| fields[a].name().cmp(fields[b].name()));
        FieldLayout { declared_by_slot }
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.declared_by_slot.len()
    }

    /// True if there are no fields
    pub fn is_empty(&self) -> bool {
        self.declared_by_slot.is_empty()
    }

    /// Declaration index of the field stored in `slot`
    pub fn declared(&self, slot: usize) -> Option<usize> {
        self.declared_by_slot.get(slot).copied()
    }

    /// Declaration indexes in slot order
    pub fn slots(&self) -> &[usize] {
        &self.declared_by_slot
    }

    /// Reorder a stored norms array into declaration order
    ///
    /// `None` if the array does not have one entry per field.
    pub fn to_declared(&self, stored: &[f64]) -> Option<Vec<f64>> {
        if stored.len() != self.len() {
            return None;
        }
        let mut declared = vec![0.0; self.len()];
        for (slot, &norm) in stored.iter().enumerate() {
            declared[self.declared_by_slot[slot]] = norm;
        }
        Some(declared)
    }
}

/// Mapping function handed to the view engine
pub struct SearchMapFunction {
    fields: Vec<FieldSpec>,
    layout: FieldLayout,
    tokenizer: Arc<dyn Tokenizer>,
    filter: Option<Arc<dyn DocumentFilter>>,
    reporter: SharedErrorReporter,
}

impl SearchMapFunction {
    /// Create a mapping function over `fields`
    pub fn new(
        fields: Vec<FieldSpec>,
        tokenizer: Arc<dyn Tokenizer>,
        filter: Option<Arc<dyn DocumentFilter>>,
        reporter: SharedErrorReporter,
    ) -> Self {
        SearchMapFunction {
            layout: FieldLayout::new(&fields),
            fields,
            tokenizer,
            filter,
            reporter,
        }
    }

    /// Indexed fields, in declaration order
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Storage slots of the indexed fields
    pub fn layout(&self) -> &FieldLayout {
        &self.layout
    }

    /// Tokenizer shared with the query side
    pub fn tokenizer(&self) -> &Arc<dyn Tokenizer> {
        &self.tokenizer
    }

    fn is_filtered(&self, doc: &Document) -> bool {
        let Some(filter) = &self.filter else {
            return false;
        };
        let outcome = filter.evaluate(doc);
        if let FilterOutcome::Failed(error) = &outcome {
            self.reporter.filter_failed(doc.id(), error);
        }
        !outcome.keeps()
    }
}

impl MapFunction for SearchMapFunction {
    fn map(&self, doc: &Document) -> Vec<Emission> {
        if self.is_filtered(doc) {
            return vec![];
        }
        let multi_field = self.fields.len() > 1;
        let mut emissions = Vec::new();
        let mut norms = Vec::with_capacity(self.fields.len());

        for (slot, &declared) in self.layout.slots().iter().enumerate() {
            let terms = self.fields[declared]
                .extract(doc)
                .map(|text| self.tokenizer.tokenize(&text))
                .unwrap_or_default();
            let value = if multi_field { json!(slot) } else { Value::Null };
            emissions.extend(
                terms
                    .iter()
                    .map(|term| Emission::new(IndexKey::Term(term.clone()).encode(), value.clone())),
            );
            norms.push(field_norm(terms.len()));
        }

        emissions.push(Emission::new(
            IndexKey::DocInfo(doc.id().to_string()).encode(),
            json!(norms),
        ));
        emissions
    }
}

impl fmt::Debug for SearchMapFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchMapFunction")
            .field("fields", &self.fields)
            .field("tokenizer", &self.tokenizer.name())
            .field("filter", &self.filter.as_ref().map(|f| f.source().to_string()))
            .finish()
    }
}
