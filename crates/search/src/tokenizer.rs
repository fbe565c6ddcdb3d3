//! Tokenizer adapter
//!
//! The search layer never assumes a language's rules. It asks a
//! `TokenizerRegistry` for the tokenizer of the requested `Language` and
//! uses that same instance for indexing and for query parsing, so both sides
//! normalize identically.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use unicode_segmentation::UnicodeSegmentation;

/// Default language identifier
pub const DEFAULT_LANGUAGE: &str = "en";

/// Turns text into a sequence of normalized terms
///
/// Implementations must be deterministic: the persisted index relies on the
/// same text always producing the same terms.
pub trait Tokenizer: Send + Sync {
    /// Normalized terms of `text`, in order, duplicates kept
    fn tokenize(&self, text: &str) -> Vec<String>;

    /// Name for debugging and logging
    fn name(&self) -> &str;
}

/// Case-folding tokenizer over Unicode word boundaries
///
/// Pipeline: UAX#29 word boundaries → lowercase. Numerals and internal
/// apostrophes survive (`"shouldn't"`, `"1"`); punctuation does not.
/// No stemming and no stopword removal.
///
/// # Example
///
/// ```
/// use sift_search::tokenizer::{StandardTokenizer, Tokenizer};
///
/// let tokens = StandardTokenizer.tokenize("The Court, ruled!");
/// assert_eq!(tokens, vec!["the", "court", "ruled"]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardTokenizer;

impl Tokenizer for StandardTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.unicode_words().map(|w| w.to_lowercase()).collect()
    }

    fn name(&self) -> &str {
        "standard"
    }
}

/// Distinct terms in first-occurrence order
pub fn distinct_terms(terms: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    terms
        .into_iter()
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

// ============================================================================
// Language
// ============================================================================

/// Language of an index: one identifier or an ordered multi-language list
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Language {
    /// Single language, e.g. `"en"`
    Single(String),
    /// Several languages indexed together, e.g. `["en", "fr"]`
    Multi(Vec<String>),
}

impl Language {
    /// Registry key: the identifier, or identifiers joined with `+`
    pub fn key(&self) -> String {
        match self {
            Language::Single(lang) => lang.clone(),
            Language::Multi(langs) => langs.join("+"),
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::Single(DEFAULT_LANGUAGE.to_string())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl From<&str> for Language {
    fn from(lang: &str) -> Self {
        Language::Single(lang.to_string())
    }
}

// ============================================================================
// TokenizerRegistry
// ============================================================================

/// Language → tokenizer lookup with a fallback
///
/// Language-specific tokenizers (stemmers, segmenters) are plug-ins
/// registered by the embedder. Unregistered languages use the fallback.
#[derive(Clone)]
pub struct TokenizerRegistry {
    fallback: Arc<dyn Tokenizer>,
    by_language: HashMap<String, Arc<dyn Tokenizer>>,
}

impl Default for TokenizerRegistry {
    fn default() -> Self {
        Self::new(Arc::new(StandardTokenizer))
    }
}

impl TokenizerRegistry {
    /// Create a registry with the given fallback tokenizer
    pub fn new(fallback: Arc<dyn Tokenizer>) -> Self {
        TokenizerRegistry {
            fallback,
            by_language: HashMap::new(),
        }
    }

    /// Register a tokenizer for a language (single or multi)
    pub fn register(&mut self, language: &Language, tokenizer: Arc<dyn Tokenizer>) {
        self.by_language.insert(language.key(), tokenizer);
    }

    /// Builder: register a tokenizer
    pub fn with(mut self, language: impl Into<Language>, tokenizer: Arc<dyn Tokenizer>) -> Self {
        self.register(&language.into(), tokenizer);
        self
    }

    /// Tokenizer for `language`
    pub fn for_language(&self, language: &Language) -> Arc<dyn Tokenizer> {
        self.by_language
            .get(&language.key())
            .cloned()
            .unwrap_or_else(|| Arc::clone(&self.fallback))
    }
}

impl fmt::Debug for TokenizerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut languages: Vec<_> = self.by_language.keys().collect();
        languages.sort();
        f.debug_struct("TokenizerRegistry")
            .field("fallback", &self.fallback.name())
            .field("languages", &languages)
            .finish()
    }
}
