//! In-memory collaborators for the Sift search layer
//!
//! This crate provides:
//! - MemoryDocumentStore: document store with a per-document change feed
//! - PersistedView: one view's rows, indexed by document and by key
//! - MemoryViewEngine: named views maintained incrementally from the feed
//!
//! Nothing here is durable; views live as long as the engine.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod engine;
pub mod store;
pub mod view;

pub use engine::MemoryViewEngine;
pub use store::{Change, MemoryDocumentStore};
pub use view::PersistedView;
