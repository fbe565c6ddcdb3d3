//! Query orchestration
//!
//! `Searcher` turns a `SearchRequest` into view-engine calls and a ranked
//! page of results:
//!
//! ```text
//! SearchRequest
//!      │
//!      ├── destroy ──► ViewEngine::destroy ─────────────► Destroyed
//!      ├── build ────► ViewEngine::query(limit 0) ──────► Built { ok }
//!      ▼
//! tokenize query (distinct terms)
//!      │
//!      ▼
//! stage 1: postings for a<term> keys ──► CandidateSet (df, tf per field)
//!      │
//!      ▼
//! minimum-should-match
//!      │
//!      ▼
//! stage 2: norms for b<doc id> keys
//!      │
//!      ▼
//! Scorer ──► sort desc ──► skip/limit ──► include_docs / highlighting
//! ```
//!
//! The searcher is stateless between requests; it holds only shared
//! collaborators.

use crate::candidates::CandidateSet;
use crate::config::SearchConfig;
use crate::field::FieldSpec;
use crate::filter::{SharedErrorReporter, TracingErrorReporter};
use crate::highlight::{highlight, Markers};
use crate::identity::IndexIdentity;
use crate::mapping::{FieldLayout, IndexKey, SearchMapFunction};
use crate::options::{SearchMode, SearchRequest};
use crate::scorer::{rank, DismaxScorer, ScoredDoc, Scorer, ScorerContext};
use crate::tokenizer::{distinct_terms, TokenizerRegistry};
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sift_core::{Document, DocumentStore, MapFunction, Result, ViewEngine, ViewQuery, ViewRow};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, info};

// ============================================================================
// Results
// ============================================================================

/// One ranked document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Document id
    pub id: String,
    /// Relevance score
    pub score: f64,
    /// Full document, with `include_docs`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<Document>,
    /// Highlighted text per matched field, with `highlighting`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlighting: Option<BTreeMap<String, String>>,
}

/// A page of ranked results
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Number of matching documents before pagination
    pub total_rows: usize,
    /// The requested page, best first
    pub rows: Vec<SearchHit>,
}

impl SearchResponse {
    /// No matches
    pub fn empty() -> Self {
        SearchResponse::default()
    }

    /// Ids of the returned rows, in order
    pub fn ids(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.id.as_str()).collect()
    }
}

/// Result of a search call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SearchOutcome {
    /// Ranked results of a query
    Results(SearchResponse),
    /// The index was brought up to date
    Built {
        /// Always true
        ok: bool,
    },
    /// The index was deleted
    Destroyed,
}

impl SearchOutcome {
    /// The results, if this was a query
    pub fn into_response(self) -> Option<SearchResponse> {
        match self {
            SearchOutcome::Results(response) => Some(response),
            _ => None,
        }
    }
}

// ============================================================================
// Searcher
// ============================================================================

/// Full-text search over persisted views
///
/// # Example
///
/// ```ignore
/// let searcher = Searcher::new(engine, store);
/// let outcome = searcher
///     .search_json(json!({"query": "mario", "fields": ["title", "text"]}))
///     .await?;
/// ```
#[derive(Clone)]
pub struct Searcher {
    engine: Arc<dyn ViewEngine>,
    store: Arc<dyn DocumentStore>,
    tokenizers: TokenizerRegistry,
    scorer: Arc<dyn Scorer>,
    reporter: SharedErrorReporter,
    config: SearchConfig,
}

impl Searcher {
    /// Create a searcher with default tokenizers, scorer and config
    pub fn new(engine: Arc<dyn ViewEngine>, store: Arc<dyn DocumentStore>) -> Self {
        Searcher {
            engine,
            store,
            tokenizers: TokenizerRegistry::default(),
            scorer: Arc::new(DismaxScorer),
            reporter: Arc::new(TracingErrorReporter),
            config: SearchConfig::default(),
        }
    }

    /// Builder: set the tokenizer registry
    pub fn with_tokenizers(mut self, tokenizers: TokenizerRegistry) -> Self {
        self.tokenizers = tokenizers;
        self
    }

    /// Builder: set a custom scorer
    pub fn with_scorer(mut self, scorer: Arc<dyn Scorer>) -> Self {
        self.scorer = scorer;
        self
    }

    /// Builder: set the reporter for filter failures
    pub fn with_reporter(mut self, reporter: SharedErrorReporter) -> Self {
        self.reporter = reporter;
        self
    }

    /// Builder: set configuration defaults
    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Configuration defaults in use
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Name of the persisted index a request reads
    pub fn index_identity(&self, req: &SearchRequest) -> IndexIdentity {
        let language = req
            .language()
            .unwrap_or(&self.config.default_language);
        IndexIdentity::resolve(
            language,
            req.fields().iter().map(FieldSpec::name),
            req.filter().map(|f| f.source()),
        )
    }

    /// Search with an untyped options object
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` for invalid options, or any error of the view
    /// engine or document store.
    pub async fn search_json(&self, opts: Value) -> Result<SearchOutcome> {
        let req = SearchRequest::from_json(&opts)?;
        self.search(&req).await
    }

    /// Run a search, build or destroy request
    ///
    /// # Errors
    ///
    /// Returns any error of the view engine or document store, or a config
    /// error if the default mm is unusable.
    pub async fn search(&self, req: &SearchRequest) -> Result<SearchOutcome> {
        let language = req
            .language()
            .cloned()
            .unwrap_or_else(|| self.config.default_language.clone());
        let tokenizer = self.tokenizers.for_language(&language);
        let identity = self.index_identity(req);
        let map_fn = SearchMapFunction::new(
            req.fields().to_vec(),
            Arc::clone(&tokenizer),
            req.filter().cloned(),
            Arc::clone(&self.reporter),
        );
        let layout = map_fn.layout().clone();
        let map: Arc<dyn MapFunction> = Arc::new(map_fn);

        match req.mode() {
            SearchMode::Destroy => {
                self.engine.destroy(identity.as_str()).await?;
                info!(index = %identity, "Destroyed search index");
                return Ok(SearchOutcome::Destroyed);
            }
            SearchMode::Build => {
                let build = ViewQuery::new(identity.as_str()).with_limit(0);
                self.engine.query(map, &build).await?;
                info!(index = %identity, %language, "Built search index");
                return Ok(SearchOutcome::Built { ok: true });
            }
            SearchMode::Search => {}
        }

        let terms = distinct_terms(tokenizer.tokenize(req.query().unwrap_or_default()));
        if terms.is_empty() {
            debug!(index = %identity, "Query has no terms");
            return Ok(SearchOutcome::Results(SearchResponse::empty()));
        }

        // Stage 1: postings
        let keys = terms
            .iter()
            .map(|t| IndexKey::Term(t.clone()).encode())
            .collect();
        let postings = self
            .engine
            .query(
                Arc::clone(&map),
                &ViewQuery::new(identity.as_str())
                    .with_keys(keys)
                    .with_stale(req.stale()),
            )
            .await?;
        if postings.rows.is_empty() {
            debug!(index = %identity, terms = terms.len(), "No postings");
            return Ok(SearchOutcome::Results(SearchResponse::empty()));
        }

        let mut candidates = CandidateSet::accumulate(&postings.rows, &layout);
        let mm = match req.mm() {
            Some(mm) => mm,
            None => self.config.mm()?,
        };
        let dropped = candidates.retain_min_should_match(&terms, mm);
        debug!(
            postings = postings.rows.len(),
            candidates = candidates.len(),
            dropped,
            mm,
            "Accumulated candidates"
        );
        if candidates.is_empty() {
            return Ok(SearchOutcome::Results(SearchResponse::empty()));
        }

        // Stage 2: field norms
        let keys = candidates
            .ids()
            .iter()
            .map(|id| IndexKey::DocInfo(id.clone()).encode())
            .collect();
        let info = self
            .engine
            .query(
                map,
                &ViewQuery::new(identity.as_str())
                    .with_keys(keys)
                    .with_stale(req.stale()),
            )
            .await?;
        let norms = collect_norms(&info.rows, &layout);

        let ctx = ScorerContext {
            query_terms: &terms,
            doc_freqs: candidates.doc_freqs(),
            fields: req.fields(),
        };
        let ranked = rank(self.scorer.as_ref(), &candidates, &norms, &ctx);
        let total_rows = ranked.len();
        let page = paginate(ranked, req.skip(), req.limit());
        debug!(
            scorer = self.scorer.name(),
            total_rows,
            page = page.len(),
            "Scored candidates"
        );

        let docs = if req.include_docs() || req.highlighting() {
            Some(self.fetch_docs(&page).await?)
        } else {
            None
        };

        let defaults = self.config.markers();
        let markers = Markers::new(
            req.highlighting_pre().unwrap_or(defaults.pre.as_str()),
            req.highlighting_post().unwrap_or(defaults.post.as_str()),
        );

        let mut rows = Vec::with_capacity(page.len());
        let mut docs = docs.map(Vec::into_iter);
        for scored in page {
            let doc = docs.as_mut().and_then(Iterator::next);
            let highlighting = match (&doc, candidates.get(&scored.id)) {
                (Some(doc), Some(candidate)) if req.highlighting() => {
                    Some(highlight(doc, req.fields(), candidate, &markers)?)
                }
                _ => None,
            };
            rows.push(SearchHit {
                id: scored.id,
                score: scored.score,
                doc: doc.filter(|_| req.include_docs()),
                highlighting,
            });
        }

        Ok(SearchOutcome::Results(SearchResponse { total_rows, rows }))
    }

    /// Fetch documents concurrently, preserving order
    async fn fetch_docs(&self, page: &[ScoredDoc]) -> Result<Vec<Document>> {
        try_join_all(page.iter().map(|scored| self.store.get(&scored.id))).await
    }
}

/// Norms per document id in declaration order; malformed rows are skipped
fn collect_norms(rows: &[ViewRow], layout: &FieldLayout) -> HashMap<String, Vec<f64>> {
    rows.iter()
        .filter_map(|row| {
            let stored = match serde_json::from_value::<Vec<f64>>(row.value.clone()) {
                Ok(stored) => stored,
                Err(e) => {
                    debug!(id = %row.id, error = %e, "Ignoring malformed norms row");
                    return None;
                }
            };
            match layout.to_declared(&stored) {
                Some(norms) => Some((row.id.clone(), norms)),
                None => {
                    debug!(id = %row.id, len = stored.len(), "Ignoring norms row of wrong width");
                    None
                }
            }
        })
        .collect()
}

/// Skip then limit; no limit means all remaining rows
fn paginate(ranked: Vec<ScoredDoc>, skip: usize, limit: Option<usize>) -> Vec<ScoredDoc> {
    ranked
        .into_iter()
        .skip(skip)
        .take(limit.unwrap_or(usize::MAX))
        .collect()
}
