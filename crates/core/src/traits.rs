//! Core traits for the view engine and document store abstraction
//!
//! This module defines the collaborator traits that let the search layer
//! run on top of any document store that can maintain persisted views:
//! - MapFunction: pure document → emissions mapping handed to a view engine
//! - ViewEngine: builds, maintains, queries and destroys persisted views
//! - DocumentStore: fetch-by-id of full documents

use crate::document::Document;
use crate::error::Result;
use crate::view_types::{Emission, ViewQuery, ViewResponse};
use async_trait::async_trait;
use std::sync::Arc;

/// Mapping function that populates a view
///
/// Implementations MUST be pure and deterministic: the same document must
/// always produce the same emissions, because view engines re-apply the
/// function incrementally as documents change and rely on this to keep the
/// persisted view correct.
pub trait MapFunction: Send + Sync {
    /// Emissions for one document, in emission order
    fn map(&self, doc: &Document) -> Vec<Emission>;
}

/// Persisted view engine
///
/// Thread safety: All methods must be safe to call concurrently from
/// multiple tasks (requires Send + Sync). Consistency between concurrent
/// build, query and destroy calls on the same view is the engine's concern.
#[async_trait]
pub trait ViewEngine: Send + Sync {
    /// Query the view named by `query.save_as`, creating it with `map` if needed
    ///
    /// # Errors
    ///
    /// Returns an error if the view cannot be built, updated or read.
    async fn query(&self, map: Arc<dyn MapFunction>, query: &ViewQuery) -> Result<ViewResponse>;

    /// Tear down the persisted view; a no-op if it does not exist
    ///
    /// # Errors
    ///
    /// Returns an error if the view exists but cannot be removed.
    async fn destroy(&self, save_as: &str) -> Result<()>;
}

/// Document store
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document by id
    ///
    /// # Errors
    ///
    /// Returns `DocumentNotFound` if no such document exists.
    async fn get(&self, id: &str) -> Result<Document>;
}

#[async_trait]
impl<T: ViewEngine + ?Sized> ViewEngine for Arc<T> {
    async fn query(&self, map: Arc<dyn MapFunction>, query: &ViewQuery) -> Result<ViewResponse> {
        (**self).query(map, query).await
    }

    async fn destroy(&self, save_as: &str) -> Result<()> {
        (**self).destroy(save_as).await
    }
}

#[async_trait]
impl<T: DocumentStore + ?Sized> DocumentStore for Arc<T> {
    async fn get(&self, id: &str) -> Result<Document> {
        (**self).get(id).await
    }
}
