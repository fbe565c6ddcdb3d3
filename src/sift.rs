//! High-level in-memory search database
//!
//! `Sift` bundles a `MemoryDocumentStore`, a `MemoryViewEngine` over it and
//! a `Searcher`, so callers can put documents and search them without
//! wiring the collaborators by hand.

use sift_core::{Document, Result};
use sift_search::{
    SearchConfig, SearchOutcome, SearchRequest, Searcher, SharedErrorReporter, TokenizerRegistry,
    CONFIG_FILE_NAME,
};
use sift_view::{MemoryDocumentStore, MemoryViewEngine};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Documents, their views, and search over them
///
/// # Example
///
/// ```ignore
/// use sift::Sift;
/// use serde_json::json;
///
/// let db = Sift::ephemeral();
/// db.put_json(json!({"_id": "1", "text": "the court ruled"}))?;
/// let outcome = db.search_json(json!({"query": "court", "fields": ["text"]})).await?;
/// ```
#[derive(Clone)]
pub struct Sift {
    store: Arc<MemoryDocumentStore>,
    engine: MemoryViewEngine,
    searcher: Searcher,
}

impl Sift {
    /// Empty database with default configuration
    pub fn ephemeral() -> Self {
        Self::with_config(SearchConfig::default())
    }

    /// Empty database with the given configuration
    pub fn with_config(config: SearchConfig) -> Self {
        let store = Arc::new(MemoryDocumentStore::new());
        let engine = MemoryViewEngine::new(Arc::clone(&store));
        let searcher = Searcher::new(Arc::new(engine.clone()), store.clone()).with_config(config);
        Sift {
            store,
            engine,
            searcher,
        }
    }

    /// Empty database configured from `sift.toml` in `dir`
    ///
    /// Writes a default `sift.toml` first if none exists.
    ///
    /// # Errors
    ///
    /// Returns a config error if the file cannot be written, read or parsed.
    pub fn from_config_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let path = dir.as_ref().join(CONFIG_FILE_NAME);
        SearchConfig::write_default_if_missing(&path)?;
        let config = SearchConfig::from_file(&path)?;
        info!(path = %path.display(), "Loaded search config");
        Ok(Self::with_config(config))
    }

    /// Builder: set the tokenizer registry
    pub fn with_tokenizers(mut self, tokenizers: TokenizerRegistry) -> Self {
        self.searcher = self.searcher.with_tokenizers(tokenizers);
        self
    }

    /// Builder: set the reporter for filter failures
    pub fn with_reporter(mut self, reporter: SharedErrorReporter) -> Self {
        self.searcher = self.searcher.with_reporter(reporter);
        self
    }

    /// Create or replace a document; returns its sequence number
    pub fn put(&self, doc: Document) -> u64 {
        self.store.put(doc)
    }

    /// Create or replace a document given as JSON
    ///
    /// # Errors
    ///
    /// Returns `InvalidDocument` if the value has no string `_id`.
    pub fn put_json(&self, value: serde_json::Value) -> Result<u64> {
        Ok(self.store.put(Document::from_value(value)?))
    }

    /// Create or replace many documents
    pub fn bulk_docs(&self, docs: impl IntoIterator<Item = Document>) -> Vec<u64> {
        self.store.bulk_docs(docs)
    }

    /// Delete a document
    ///
    /// # Errors
    ///
    /// Returns `DocumentNotFound` if there is no such document.
    pub fn delete(&self, id: &str) -> Result<u64> {
        self.store.delete(id)
    }

    /// Run a search, build or destroy request
    pub async fn search(&self, req: &SearchRequest) -> Result<SearchOutcome> {
        self.searcher.search(req).await
    }

    /// Search with an untyped options object
    pub async fn search_json(&self, opts: serde_json::Value) -> Result<SearchOutcome> {
        self.searcher.search_json(opts).await
    }

    /// The document store
    pub fn store(&self) -> &Arc<MemoryDocumentStore> {
        &self.store
    }

    /// The view engine
    pub fn engine(&self) -> &MemoryViewEngine {
        &self.engine
    }

    /// The searcher
    pub fn searcher(&self) -> &Searcher {
        &self.searcher
    }
}
