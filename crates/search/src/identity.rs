//! Persisted index identity
//!
//! The index built for a search is named after what determines its
//! contents: the language (which picks the tokenizer), the set of field
//! names and the filter source. Boosts and field order only matter at query
//! time, so they are left out; the field names are sorted before hashing.

use crate::tokenizer::Language;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;

/// Prefix of every persisted search index name
pub const INDEX_PREFIX: &str = "search-";

#[derive(Serialize)]
struct IndexParams<'a> {
    language: &'a Language,
    fields: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<&'a str>,
}

/// Name of a persisted search index
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndexIdentity(String);

impl IndexIdentity {
    /// Resolve the identity of an index configuration
    ///
    /// Canonical JSON of `{language, sorted fields, filter?}`, SHA-256,
    /// lowercase hex, prefixed with `search-`.
    pub fn resolve<'a>(
        language: &Language,
        field_names: impl IntoIterator<Item = &'a str>,
        filter_source: Option<&str>,
    ) -> Self {
        let mut fields: Vec<&str> = field_names.into_iter().collect();
        fields.sort_unstable();
        let params = IndexParams {
            language,
            fields,
            filter: filter_source,
        };
        // Serializing borrowed strings and a Vec into JSON cannot fail.
        let canonical = serde_json::to_vec(&params).unwrap_or_default();
        let digest = Sha256::digest(&canonical);
        IndexIdentity(format!("{}{}", INDEX_PREFIX, hex::encode(digest)))
    }

    /// The persisted index name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IndexIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for IndexIdentity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
