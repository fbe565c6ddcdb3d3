//! In-memory document store with a change feed
//!
//! Every write is assigned a monotonically increasing sequence number.
//! The change feed keeps only the latest change per document id, so a
//! view that catches up from sequence `n` sees each changed document once.

use async_trait::async_trait;
use parking_lot::RwLock;
use sift_core::{Document, DocumentStore, Error, Result};
use std::collections::{BTreeMap, HashMap};

/// A change recorded in the feed
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    /// Document was created or replaced
    Upserted(Document),
    /// Document was deleted
    Deleted(String),
}

impl Change {
    /// Id of the changed document
    pub fn id(&self) -> &str {
        match self {
            Change::Upserted(doc) => doc.id(),
            Change::Deleted(id) => id,
        }
    }
}

#[derive(Debug, Default)]
struct StoreState {
    docs: HashMap<String, Document>,
    /// seq -> latest change for a document
    changes: BTreeMap<u64, Change>,
    /// doc id -> seq of its latest change
    latest_seq: HashMap<String, u64>,
    update_seq: u64,
}

impl StoreState {
    fn record(&mut self, change: Change) -> u64 {
        self.update_seq += 1;
        let seq = self.update_seq;
        if let Some(prev) = self.latest_seq.insert(change.id().to_string(), seq) {
            self.changes.remove(&prev);
        }
        self.changes.insert(seq, change);
        seq
    }
}

/// In-memory document store
///
/// # Thread Safety
///
/// Uses a single `parking_lot::RwLock`; reads never block each other.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    state: RwLock<StoreState>,
}

impl MemoryDocumentStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a document, returning its change sequence
    pub fn put(&self, doc: Document) -> u64 {
        let mut state = self.state.write();
        state.docs.insert(doc.id().to_string(), doc.clone());
        state.record(Change::Upserted(doc))
    }

    /// Insert or replace many documents, returning their change sequences
    pub fn bulk_docs(&self, docs: impl IntoIterator<Item = Document>) -> Vec<u64> {
        let mut state = self.state.write();
        docs.into_iter()
            .map(|doc| {
                state.docs.insert(doc.id().to_string(), doc.clone());
                state.record(Change::Upserted(doc))
            })
            .collect()
    }

    /// Delete a document, returning the change sequence
    ///
    /// # Errors
    ///
    /// Returns `DocumentNotFound` if the document does not exist.
    pub fn delete(&self, id: &str) -> Result<u64> {
        let mut state = self.state.write();
        if state.docs.remove(id).is_none() {
            return Err(Error::DocumentNotFound(id.to_string()));
        }
        Ok(state.record(Change::Deleted(id.to_string())))
    }

    /// Latest change sequence
    pub fn update_seq(&self) -> u64 {
        self.state.read().update_seq
    }

    /// Number of live documents
    pub fn len(&self) -> usize {
        self.state.read().docs.len()
    }

    /// True if the store holds no live documents
    pub fn is_empty(&self) -> bool {
        self.state.read().docs.is_empty()
    }

    /// Changes after `since`, in sequence order, with the sequence reached
    pub fn changes_since(&self, since: u64) -> (Vec<(u64, Change)>, u64) {
        let state = self.state.read();
        let changes = state
            .changes
            .range(since + 1..)
            .map(|(seq, change)| (*seq, change.clone()))
            .collect();
        (changes, state.update_seq)
    }

    /// Synchronous fetch used by the view engine and tests
    pub fn get_sync(&self, id: &str) -> Option<Document> {
        self.state.read().docs.get(id).cloned()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, id: &str) -> Result<Document> {
        self.get_sync(id)
            .ok_or_else(|| Error::DocumentNotFound(id.to_string()))
    }
}
