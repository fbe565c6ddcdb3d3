//! Search request options
//!
//! `SearchRequest` is the typed form of one call to the search entry point.
//! It can be built in Rust with `SearchRequest::builder()` or parsed from an
//! untyped JSON options object with `SearchRequest::from_json`. Both paths
//! share the same validation.
//!
//! # Example
//!
//! ```
//! use sift_search::SearchRequest;
//!
//! let req = SearchRequest::builder()
//!     .query("albino elephant")
//!     .field("title", 1.0)
//!     .field("text", 2.0)
//!     .mm_percent(50.0)
//!     .limit(10)
//!     .build()
//!     .unwrap();
//! assert_eq!(req.fields().len(), 2);
//! assert_eq!(req.mm(), Some(0.5));
//! ```

use crate::field::{parse_fields, validate_fields, FieldSpec};
use crate::filter::DocumentFilter;
use crate::tokenizer::Language;
use serde_json::Value;
use sift_core::{Error, Result, Stale};
use std::fmt;
use std::sync::Arc;

/// What a request asks the searcher to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Score documents against a query
    Search,
    /// Bring the persisted index up to date, return no rows
    Build,
    /// Delete the persisted index
    Destroy,
}

/// Parse a minimum-should-match value into a fraction
///
/// Strings are read as a leading number (`"75%"` → 0.75); numbers are
/// percentages (`50` → 0.5).
///
/// # Errors
///
/// Returns `BadRequest` if no finite number can be read.
pub fn parse_mm(value: &Value) -> Result<f64> {
    let percent = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => leading_float(s),
        _ => None,
    };
    match percent {
        Some(p) if p.is_finite() => Ok(p / 100.0),
        _ => Err(Error::bad_request(format!(
            "mm must be a percentage such as \"75%\", got {}",
            value
        ))),
    }
}

/// Longest numeric prefix of `s`, after leading whitespace
fn leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let end = s
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E')))
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    (1..=end)
        .rev()
        .find_map(|n| s[..n].parse::<f64>().ok())
}

// ============================================================================
// SearchRequest
// ============================================================================

/// Validated options for one search call
#[derive(Clone)]
pub struct SearchRequest {
    query: Option<String>,
    fields: Vec<FieldSpec>,
    mm: Option<f64>,
    highlighting: bool,
    highlighting_pre: Option<String>,
    highlighting_post: Option<String>,
    include_docs: bool,
    destroy: bool,
    build: bool,
    stale: Option<Stale>,
    limit: Option<usize>,
    skip: usize,
    language: Option<Language>,
    filter: Option<Arc<dyn DocumentFilter>>,
}

impl SearchRequest {
    /// Start building a request
    pub fn builder() -> SearchRequestBuilder {
        SearchRequestBuilder::default()
    }

    /// Parse an untyped options object
    ///
    /// Recognized keys: `query`/`q`, `fields`, `mm`, `highlighting`,
    /// `highlighting_pre`, `highlighting_post`, `include_docs`, `destroy`,
    /// `build`, `stale`, `limit`, `skip`, `language`. Other keys are ignored
    /// and `null` counts as absent.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` if `opts` is not an object or any recognized key
    /// has an invalid value.
    pub fn from_json(opts: &Value) -> Result<SearchRequest> {
        let Value::Object(map) = opts else {
            return Err(Error::bad_request("you must provide search options"));
        };
        let get = |key: &str| map.get(key).filter(|v| !v.is_null());

        let fields = match get("fields") {
            Some(value) => parse_fields(value)?,
            None => return Err(Error::bad_request("you must provide fields to search")),
        };

        let mut builder = SearchRequest::builder();
        builder.fields = fields.into_iter().map(Ok).collect();

        let query = match (get("query"), get("q")) {
            (Some(q), _) | (None, Some(q)) => Some(string_opt("query", q)?),
            (None, None) => None,
        };
        builder.query = query;

        if let Some(mm) = get("mm") {
            builder.mm = Some(parse_mm(mm));
        }
        builder.highlighting = bool_opt(get("highlighting"), "highlighting")?;
        builder.highlighting_pre = get("highlighting_pre")
            .map(|v| string_opt("highlighting_pre", v))
            .transpose()?;
        builder.highlighting_post = get("highlighting_post")
            .map(|v| string_opt("highlighting_post", v))
            .transpose()?;
        builder.include_docs = bool_opt(get("include_docs"), "include_docs")?;
        builder.destroy = bool_opt(get("destroy"), "destroy")?;
        builder.build = bool_opt(get("build"), "build")?;
        builder.stale = get("stale")
            .map(|v| string_opt("stale", v).and_then(|s| s.parse::<Stale>()))
            .transpose()?;
        builder.limit = get("limit").map(|v| usize_opt("limit", v)).transpose()?;
        builder.skip = get("skip").map(|v| usize_opt("skip", v)).transpose()?.unwrap_or(0);
        builder.language = get("language")
            .map(|v| {
                serde_json::from_value::<Language>(v.clone()).map_err(|_| {
                    Error::bad_request(format!(
                        "language must be a string or a list of strings, got {}",
                        v
                    ))
                })
            })
            .transpose()?;

        builder.build()
    }

    /// What this request asks for; destroy wins over build
    pub fn mode(&self) -> SearchMode {
        if self.destroy {
            SearchMode::Destroy
        } else if self.build {
            SearchMode::Build
        } else {
            SearchMode::Search
        }
    }

    /// Query text (absent for build and destroy requests)
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Indexed fields with their boosts, in declaration order
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Minimum-should-match fraction, if set
    pub fn mm(&self) -> Option<f64> {
        self.mm
    }

    /// True if matches should be highlighted
    pub fn highlighting(&self) -> bool {
        self.highlighting
    }

    /// Custom opening highlight marker
    pub fn highlighting_pre(&self) -> Option<&str> {
        self.highlighting_pre.as_deref()
    }

    /// Custom closing highlight marker
    pub fn highlighting_post(&self) -> Option<&str> {
        self.highlighting_post.as_deref()
    }

    /// True if full documents should be attached to rows
    pub fn include_docs(&self) -> bool {
        self.include_docs
    }

    /// Freshness level for index reads
    pub fn stale(&self) -> Option<Stale> {
        self.stale
    }

    /// Maximum rows to return (None = all remaining)
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Rows to skip
    pub fn skip(&self) -> usize {
        self.skip
    }

    /// Language, if set
    pub fn language(&self) -> Option<&Language> {
        self.language.as_ref()
    }

    /// Document filter, if set
    pub fn filter(&self) -> Option<&Arc<dyn DocumentFilter>> {
        self.filter.as_ref()
    }

    /// Attach a document filter
    pub fn with_filter(mut self, filter: Arc<dyn DocumentFilter>) -> Self {
        self.filter = Some(filter);
        self
    }
}

impl fmt::Debug for SearchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchRequest")
            .field("mode", &self.mode())
            .field("query", &self.query)
            .field("fields", &self.fields)
            .field("mm", &self.mm)
            .field("highlighting", &self.highlighting)
            .field("include_docs", &self.include_docs)
            .field("stale", &self.stale)
            .field("limit", &self.limit)
            .field("skip", &self.skip)
            .field("language", &self.language)
            .field("filter", &self.filter.as_ref().map(|f| f.source().to_string()))
            .finish()
    }
}

fn string_opt(key: &str, value: &Value) -> Result<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| Error::bad_request(format!("{} must be a string, got {}", key, value)))
}

fn bool_opt(value: Option<&Value>, key: &str) -> Result<bool> {
    match value {
        None => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(other) => Err(Error::bad_request(format!(
            "{} must be a boolean, got {}",
            key, other
        ))),
    }
}

fn usize_opt(key: &str, value: &Value) -> Result<usize> {
    value
        .as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| {
            Error::bad_request(format!("{} must be a non-negative integer, got {}", key, value))
        })
}

// ============================================================================
// SearchRequestBuilder
// ============================================================================

/// Builder for `SearchRequest`
///
/// Errors (bad boosts, bad mm) are collected and reported by `build()`.
#[derive(Default)]
pub struct SearchRequestBuilder {
    query: Option<String>,
    fields: Vec<Result<FieldSpec>>,
    mm: Option<Result<f64>>,
    highlighting: bool,
    highlighting_pre: Option<String>,
    highlighting_post: Option<String>,
    include_docs: bool,
    destroy: bool,
    build: bool,
    stale: Option<Stale>,
    limit: Option<usize>,
    skip: usize,
    language: Option<Language>,
    filter: Option<Arc<dyn DocumentFilter>>,
}

impl SearchRequestBuilder {
    /// Query text
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Add a field with a boost
    pub fn field(mut self, name: impl Into<String>, boost: f64) -> Self {
        self.fields.push(FieldSpec::new(name, boost));
        self
    }

    /// Add fields with boost 1
    pub fn fields<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields
            .extend(names.into_iter().map(|name| FieldSpec::new(name, 1.0)));
        self
    }

    /// Minimum-should-match as a percentage (`75.0` = 75%)
    pub fn mm_percent(mut self, percent: f64) -> Self {
        self.mm = Some(if percent.is_finite() {
            Ok(percent / 100.0)
        } else {
            Err(Error::bad_request("mm must be a finite percentage"))
        });
        self
    }

    /// Minimum-should-match from its textual form (`"75%"`)
    pub fn mm(mut self, mm: &str) -> Self {
        self.mm = Some(parse_mm(&Value::String(mm.to_string())));
        self
    }

    /// Enable highlighting
    pub fn highlighting(mut self, on: bool) -> Self {
        self.highlighting = on;
        self
    }

    /// Custom highlight markers
    pub fn highlighting_markers(mut self, pre: impl Into<String>, post: impl Into<String>) -> Self {
        self.highlighting_pre = Some(pre.into());
        self.highlighting_post = Some(post.into());
        self
    }

    /// Attach full documents to rows
    pub fn include_docs(mut self, on: bool) -> Self {
        self.include_docs = on;
        self
    }

    /// Delete the persisted index instead of searching
    pub fn destroy(mut self, on: bool) -> Self {
        self.destroy = on;
        self
    }

    /// Only bring the persisted index up to date
    pub fn build_index(mut self, on: bool) -> Self {
        self.build = on;
        self
    }

    /// Freshness level for index reads
    pub fn stale(mut self, stale: Stale) -> Self {
        self.stale = Some(stale);
        self
    }

    /// Maximum rows to return
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Rows to skip
    pub fn skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    /// Index language
    pub fn language(mut self, language: impl Into<Language>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Document filter
    pub fn filter(mut self, filter: Arc<dyn DocumentFilter>) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Validate and build the request
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` for missing or invalid fields, an invalid mm, or
    /// a search without a query.
    pub fn build(self) -> Result<SearchRequest> {
        let fields = validate_fields(self.fields.into_iter().collect::<Result<Vec<_>>>()?)?;
        let mm = self.mm.transpose()?;
        let request = SearchRequest {
            query: self.query,
            fields,
            mm,
            highlighting: self.highlighting,
            highlighting_pre: self.highlighting_pre,
            highlighting_post: self.highlighting_post,
            include_docs: self.include_docs,
            destroy: self.destroy,
            build: self.build,
            stale: self.stale,
            limit: self.limit,
            skip: self.skip,
            language: self.language,
            filter: self.filter,
        };
        if request.mode() == SearchMode::Search && request.query.is_none() {
            return Err(Error::bad_request("you must provide a query"));
        }
        Ok(request)
    }
}
