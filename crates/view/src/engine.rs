//! In-memory view engine
//!
//! Maintains any number of named views over a `MemoryDocumentStore`.
//! A view is created on first query and caught up from the store's change
//! feed whenever a query asks for fresh data.
//!
//! # Staleness
//!
//! - no level: fold pending changes, then read
//! - `ok`: read whatever the view holds (an unbuilt view reads empty)
//! - `update_after`: read, then fold pending changes on the tokio runtime
//!
//! `limit: Some(0)` only brings the view up to date.

use crate::store::MemoryDocumentStore;
use crate::view::PersistedView;
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use sift_core::{MapFunction, Result, Stale, ViewEngine, ViewQuery, ViewResponse};
use std::sync::Arc;
use tracing::{debug, info};

struct EngineInner {
    store: Arc<MemoryDocumentStore>,
    views: DashMap<String, Arc<RwLock<PersistedView>>>,
}

/// View engine over an in-memory document store
///
/// Cheap to clone; clones share the same views.
#[derive(Clone)]
pub struct MemoryViewEngine {
    inner: Arc<EngineInner>,
}

impl MemoryViewEngine {
    /// Create an engine indexing `store`
    pub fn new(store: Arc<MemoryDocumentStore>) -> Self {
        MemoryViewEngine {
            inner: Arc::new(EngineInner {
                store,
                views: DashMap::new(),
            }),
        }
    }

    /// The document store this engine maps over
    pub fn store(&self) -> &Arc<MemoryDocumentStore> {
        &self.inner.store
    }

    /// Names of all persisted views, sorted
    pub fn list_views(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.views.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// True if a view with this name is persisted
    pub fn has_view(&self, save_as: &str) -> bool {
        self.inner.views.contains_key(save_as)
    }

    fn view(&self, save_as: &str) -> Arc<RwLock<PersistedView>> {
        self.inner
            .views
            .entry(save_as.to_string())
            .or_insert_with(|| {
                info!(view = save_as, "Creating persisted view");
                Arc::new(RwLock::new(PersistedView::new()))
            })
            .clone()
    }

    fn update(store: &MemoryDocumentStore, view: &RwLock<PersistedView>, map: &dyn MapFunction) {
        let mut guard = view.write();
        let (changes, seq) = store.changes_since(guard.last_seq());
        let applied = guard.apply(&changes, map);
        guard.advance_to(seq);
        if applied > 0 {
            debug!(applied, seq, docs = guard.doc_count(), "Updated view");
        }
    }

    fn schedule_update(&self, view: Arc<RwLock<PersistedView>>, map: Arc<dyn MapFunction>) {
        let store = Arc::clone(&self.inner.store);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    Self::update(&store, &view, map.as_ref());
                });
            }
            Err(_) => Self::update(&store, &view, map.as_ref()),
        }
    }
}

#[async_trait]
impl ViewEngine for MemoryViewEngine {
    async fn query(&self, map: Arc<dyn MapFunction>, query: &ViewQuery) -> Result<ViewResponse> {
        let view = self.view(&query.save_as);

        if query.limit == Some(0) {
            if query.stale != Some(Stale::Ok) {
                Self::update(&self.inner.store, &view, map.as_ref());
            }
            return Ok(ViewResponse::empty());
        }

        if query.stale.is_none() {
            Self::update(&self.inner.store, &view, map.as_ref());
        }

        let rows = {
            let guard = view.read();
            match &query.keys {
                Some(keys) => guard.rows_for_keys(keys, query.limit),
                None => guard.all_rows(query.limit),
            }
        };

        if query.stale == Some(Stale::UpdateAfter) {
            self.schedule_update(view, map);
        }

        debug!(view = %query.save_as, rows = rows.len(), "View query");
        Ok(ViewResponse { rows })
    }

    async fn destroy(&self, save_as: &str) -> Result<()> {
        if self.inner.views.remove(save_as).is_some() {
            info!(view = save_as, "Destroyed persisted view");
        }
        Ok(())
    }
}
