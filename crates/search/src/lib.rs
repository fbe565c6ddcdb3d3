//! Full-text search over persisted views
//!
//! This crate provides:
//! - Field extraction over dotted paths, arrays included
//! - Tokenizer trait with a Unicode default and per-language plug-ins
//! - SearchMapFunction turning documents into postings and length norms
//! - IndexIdentity naming the persisted index of a configuration
//! - Scorer trait with a TF-IDF / disjunction-max default
//! - Minimum-should-match, pagination and match highlighting
//! - Searcher orchestrating all of the above over a `ViewEngine`
//!
//! # Usage
//!
//! ```ignore
//! use sift_search::{Searcher, SearchRequest};
//!
//! let searcher = Searcher::new(engine, store);
//! let req = SearchRequest::builder()
//!     .query("mario")
//!     .fields(["title", "text"])
//!     .include_docs(true)
//!     .build()?;
//! let outcome = searcher.search(&req).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod candidates;
pub mod config;
pub mod field;
pub mod filter;
pub mod highlight;
pub mod identity;
pub mod mapping;
pub mod options;
pub mod scorer;
pub mod searcher;
pub mod tokenizer;

// Re-export commonly used types
pub use candidates::{meets_min_should_match, Candidate, CandidateSet};
pub use config::{SearchConfig, CONFIG_FILE_NAME};
pub use field::{parse_fields, FieldSpec};
pub use filter::{
    DocumentFilter, ErrorReporter, FilterError, FilterOutcome, FnFilter, SharedErrorReporter,
    TracingErrorReporter,
};
pub use highlight::{highlight, highlight_text, Markers};
pub use identity::{IndexIdentity, INDEX_PREFIX};
pub use mapping::{field_norm, FieldLayout, IndexKey, SearchMapFunction};
pub use options::{parse_mm, SearchMode, SearchRequest, SearchRequestBuilder};
pub use scorer::{rank, DismaxScorer, ScoredDoc, Scorer, ScorerContext};
pub use searcher::{SearchHit, SearchOutcome, SearchResponse, Searcher};
pub use tokenizer::{Language, StandardTokenizer, Tokenizer, TokenizerRegistry, DEFAULT_LANGUAGE};
