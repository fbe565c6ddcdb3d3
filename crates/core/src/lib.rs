//! Core types and traits for Sift
//!
//! This crate defines the foundational types used throughout the system:
//! - Document: JSON document with a string `_id`
//! - Emission, ViewRow, ViewQuery, ViewResponse, Stale: view-engine boundary types
//! - Error: Error type hierarchy
//! - Traits: MapFunction, ViewEngine, DocumentStore

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod error;
pub mod traits;
pub mod view_types;

pub use document::{Document, ID_FIELD};
pub use error::{Error, Result};
pub use traits::{DocumentStore, MapFunction, ViewEngine};
pub use view_types::{Emission, Stale, ViewQuery, ViewResponse, ViewRow};
