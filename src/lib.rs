//! Sift - ranked full-text search over persisted views
//!
//! Sift indexes chosen document fields into a persisted key/value view and
//! answers free-text queries with TF-IDF / disjunction-max scoring,
//! minimum-should-match, pagination and match highlighting.
//!
//! # Quick Start
//!
//! ```ignore
//! use sift::{Sift, SearchRequest};
//!
//! let db = Sift::ephemeral();
//! db.put_json(serde_json::json!({"_id": "1", "title": "Mario"}))?;
//!
//! let req = SearchRequest::builder().query("mario").fields(["title"]).build()?;
//! let response = db.search(&req).await?.into_response();
//! ```
//!
//! # Architecture
//!
//! - `sift-core`: documents, errors, and the view engine / document store traits
//! - `sift-view`: in-memory document store and incremental view engine
//! - `sift-search`: indexing, scoring and query orchestration

mod sift;

pub use crate::sift::Sift;
pub use sift_core::{
    Document, DocumentStore, Emission, Error, MapFunction, Result, Stale, ViewEngine, ViewQuery,
    ViewResponse, ViewRow,
};
pub use sift_search::*;
pub use sift_view::{Change, MemoryDocumentStore, MemoryViewEngine, PersistedView};
