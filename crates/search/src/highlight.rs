//! Match highlighting
//!
//! Wraps every occurrence of a matched term in the field's original text
//! with caller-supplied markers. Matching is case-insensitive and extends
//! over any trailing run of ASCII letters, so `court` also marks `courts`
//! and `Courthouse`.

use crate::candidates::Candidate;
use crate::field::FieldSpec;
use regex::{Captures, Regex, RegexBuilder};
use sift_core::{Document, Error, Result};
use std::collections::BTreeMap;

/// Default opening marker
pub const DEFAULT_PRE: &str = "<strong>";
/// Default closing marker
pub const DEFAULT_POST: &str = "</strong>";

/// Opening and closing markers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
    /// Inserted before each match
    pub pre: String,
    /// Inserted after each match
    pub post: String,
}

impl Markers {
    /// Create markers
    pub fn new(pre: impl Into<String>, post: impl Into<String>) -> Self {
        Markers {
            pre: pre.into(),
            post: post.into(),
        }
    }
}

impl Default for Markers {
    fn default() -> Self {
        Markers::new(DEFAULT_PRE, DEFAULT_POST)
    }
}

/// Regex matching any of `terms` plus a trailing ASCII letter run
///
/// Longer terms come first so a term that prefixes another never cuts the
/// longer match short.
fn term_pattern<'a>(terms: impl IntoIterator<Item = &'a str>) -> Result<Option<Regex>> {
    let mut terms: Vec<&str> = terms.into_iter().filter(|t| !t.is_empty()).collect();
    if terms.is_empty() {
        return Ok(None);
    }
    terms.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    terms.dedup();
    let alternation = terms
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");
    RegexBuilder::new(&format!("((?:{})[a-z]*)", alternation))
        .case_insensitive(true)
        .build()
        .map(Some)
        .map_err(|e| Error::bad_request(format!("cannot highlight query terms: {}", e)))
}

/// Wrap every match of `terms` in `text`
pub fn highlight_text<'a>(
    text: &str,
    terms: impl IntoIterator<Item = &'a str>,
    markers: &Markers,
) -> Result<String> {
    let Some(pattern) = term_pattern(terms)? else {
        return Ok(text.to_string());
    };
    Ok(pattern
        .replace_all(text, |caps: &Captures<'_>| {
            format!("{}{}{}", markers.pre, &caps[1], markers.post)
        })
        .into_owned())
}

/// Highlighted text per field name
///
/// Only fields where the candidate matched at least one query term, and
/// which still have text, appear in the result.
pub fn highlight(
    doc: &Document,
    fields: &[FieldSpec],
    candidate: &Candidate,
    markers: &Markers,
) -> Result<BTreeMap<String, String>> {
    let mut out = BTreeMap::new();
    for (field, terms) in fields.iter().zip(candidate.fields()) {
        if terms.is_empty() {
            continue;
        }
        let Some(text) = field.extract(doc) else {
            continue;
        };
        let marked = highlight_text(&text, terms.keys().map(String::as_str), markers)?;
        out.insert(field.name().to_string(), marked);
    }
    Ok(out)
}
