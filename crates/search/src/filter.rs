//! Document filters and out-of-band error reporting
//!
//! A filter decides which documents enter an index. It is caller code and
//! may fail; a failure excludes only the document being evaluated and is
//! handed to an `ErrorReporter` instead of aborting the indexing pass.

use sift_core::Document;
use std::fmt;
use std::sync::Arc;

/// Error raised by a document filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterError {
    /// Human-readable cause
    pub message: String,
}

impl FilterError {
    /// Create a filter error
    pub fn new(message: impl Into<String>) -> Self {
        FilterError {
            message: message.into(),
        }
    }
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for FilterError {}

/// Result of evaluating a filter on one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOutcome {
    /// Index the document
    Keep,
    /// Leave the document out
    Skip,
    /// Filter failed; the document is left out and the error reported
    Failed(FilterError),
}

impl FilterOutcome {
    /// True if the document should be indexed
    pub fn keeps(&self) -> bool {
        matches!(self, FilterOutcome::Keep)
    }
}

/// Predicate selecting documents for an index
///
/// `source` identifies the filter for index-identity purposes: two filters
/// with the same source share a persisted index, so the source must change
/// whenever the predicate's behaviour does.
pub trait DocumentFilter: Send + Sync {
    /// Decide whether `doc` is indexed
    fn evaluate(&self, doc: &Document) -> FilterOutcome;

    /// Stable textual identity of the predicate
    fn source(&self) -> &str;
}

/// Filter built from a closure and an explicit source string
///
/// # Example
///
/// ```
/// use sift_core::Document;
/// use sift_search::filter::{DocumentFilter, FnFilter};
///
/// let filter = FnFilter::new("doc._id != '2'", |doc: &Document| Ok(doc.id() != "2"));
/// assert_eq!(filter.source(), "doc._id != '2'");
/// ```
pub struct FnFilter<F> {
    source: String,
    predicate: F,
}

impl<F> FnFilter<F>
where
    F: Fn(&Document) -> Result<bool, FilterError> + Send + Sync,
{
    /// Wrap `predicate`, identified by `source`
    pub fn new(source: impl Into<String>, predicate: F) -> Self {
        FnFilter {
            source: source.into(),
            predicate,
        }
    }
}

impl<F> DocumentFilter for FnFilter<F>
where
    F: Fn(&Document) -> Result<bool, FilterError> + Send + Sync,
{
    fn evaluate(&self, doc: &Document) -> FilterOutcome {
        match (self.predicate)(doc) {
            Ok(true) => FilterOutcome::Keep,
            Ok(false) => FilterOutcome::Skip,
            Err(e) => FilterOutcome::Failed(e),
        }
    }

    fn source(&self) -> &str {
        &self.source
    }
}

impl<F> fmt::Debug for FnFilter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnFilter")
            .field("source", &self.source)
            .finish()
    }
}

// ============================================================================
// Error reporting
// ============================================================================

/// Out-of-band sink for errors that must not fail the current operation
pub trait ErrorReporter: Send + Sync {
    /// A filter failed on document `doc_id`
    fn filter_failed(&self, doc_id: &str, error: &FilterError);
}

/// Reports errors as `tracing` warnings
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingErrorReporter;

impl ErrorReporter for TracingErrorReporter {
    fn filter_failed(&self, doc_id: &str, error: &FilterError) {
        tracing::warn!(doc_id, error = %error, "Document filter failed, excluding document");
    }
}

/// Shared reporter handle
pub type SharedErrorReporter = Arc<dyn ErrorReporter>;
