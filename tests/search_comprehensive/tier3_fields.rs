//! Tier 3: Fields & Languages
//!
//! Validates field extraction over nested paths, arrays and scalars, and
//! language-specific tokenizers.

use super::test_utils::*;
use serde_json::json;
use sift::{Language, Sift, Tokenizer, TokenizerRegistry};
use std::sync::Arc;

/// Dotted paths reach into nested objects
#[tokio::test]
async fn test_tier3_deep_fields() {
    let db = db_with(vec![
        json!({"_id": "1", "deep": {"structure": {"text": "this is deep"}}}),
        json!({"_id": "2", "deep": {"structure": {"text": "shallow water"}}}),
        json!({"_id": "3", "deep": "not an object"}),
    ]);
    let res = search(&db, json!({"fields": ["deep.structure.text"], "query": "deep"})).await;
    assert_eq!(ids(&res), vec!["1"]);
}

/// Paths fan out over arrays of objects
#[tokio::test]
async fn test_tier3_array_of_objects() {
    let db = db_with(vec![
        json!({"_id": "1", "nested": {"array": [{"aField": "something"}, {"aField": "else"}]}}),
        json!({"_id": "2", "nested": {"array": [{"aField": "something"}, {"other": "else"}]}}),
    ]);
    let res = search(&db, json!({"fields": ["nested.array.aField"], "query": "else"})).await;
    assert_eq!(ids(&res), vec!["1"]);

    let res = search(&db, json!({"fields": ["nested.array.aField"], "query": "something"})).await;
    assert_eq!(res.rows.len(), 2);
}

/// Arrays of strings are joined
#[tokio::test]
async fn test_tier3_string_arrays() {
    let db = db_with(vec![
        json!({"_id": "1", "list": ["much", "text", "goes", "here"]}),
        json!({"_id": "2", "list": ["nothing", "to", "see"]}),
    ]);
    let res = search(&db, json!({"fields": ["list"], "query": "goes"})).await;
    assert_eq!(ids(&res), vec!["1"]);
}

/// Numbers and booleans are indexed as text; `false` and `0` are not
#[tokio::test]
async fn test_tier3_scalar_values() {
    let db = db_with(vec![
        json!({"_id": "1", "num": 1.0, "flag": true}),
        json!({"_id": "2", "num": 0, "flag": false}),
        json!({"_id": "3", "num": 2, "flag": [false]}),
    ]);
    let res = search(&db, json!({"fields": ["num"], "query": "1"})).await;
    assert_eq!(ids(&res), vec!["1"]);

    let res = search(&db, json!({"fields": ["num"], "query": "0"})).await;
    assert!(res.rows.is_empty());

    let res = search(&db, json!({"fields": ["flag"], "query": "true"})).await;
    assert_eq!(ids(&res), vec!["1"]);

    let res = search(&db, json!({"fields": ["flag"], "query": "false"})).await;
    assert_eq!(ids(&res), vec!["3"]);
}

/// A field no document has yields nothing
#[tokio::test]
async fn test_tier3_invalid_field() {
    let db = db_with(mario_docs());
    let res = search(&db, json!({"fields": ["invalid"], "query": "mario"})).await;
    assert!(res.rows.is_empty());
}

/// Documents missing some fields still match on the others
#[tokio::test]
async fn test_tier3_sparse_documents() {
    let db = db_with(vec![
        json!({"_id": "1", "title": "Mario"}),
        json!({"_id": "2", "text": "mario again"}),
        json!({"_id": "3"}),
    ]);
    let res = search(&db, json!({"fields": ["title", "text"], "query": "mario"})).await;
    assert_eq!(ids(&res), vec!["1", "2"]);
}

/// Strips a trailing "s" so plurals match
struct PluralTokenizer;

impl Tokenizer for PluralTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_whitespace()
            .map(|w| {
                let w = w.to_lowercase();
                match w.strip_suffix('s') {
                    Some(stem) if !stem.is_empty() => stem.to_string(),
                    _ => w,
                }
            })
            .collect()
    }

    fn name(&self) -> &str {
        "plural"
    }
}

/// A registered language tokenizer is used for index and query
#[tokio::test]
async fn test_tier3_language_tokenizer() {
    let registry = TokenizerRegistry::default().with("fr", Arc::new(PluralTokenizer));
    let db = Sift::ephemeral().with_tokenizers(registry);
    load(
        &db,
        vec![
            json!({"_id": "1", "text": "les chats"}),
            json!({"_id": "2", "text": "un chat"}),
        ],
    );

    let en = search(&db, json!({"fields": ["text"], "query": "chat"})).await;
    assert_eq!(ids(&en), vec!["2"]);

    let fr = search(&db, json!({"fields": ["text"], "query": "chats", "language": "fr"})).await;
    assert_eq!(fr.rows.len(), 2);

    // one index per language
    assert_eq!(db.engine().list_views().len(), 2);
}

/// Multi-language lists resolve their own index
#[tokio::test]
async fn test_tier3_multi_language() {
    let registry = TokenizerRegistry::default().with(
        Language::Multi(vec!["en".into(), "fr".into()]),
        Arc::new(PluralTokenizer),
    );
    let db = Sift::ephemeral().with_tokenizers(registry);
    load(&db, vec![json!({"_id": "1", "text": "many cats"})]);

    let res = search(
        &db,
        json!({"fields": ["text"], "query": "cat", "language": ["en", "fr"]}),
    )
    .await;
    assert_eq!(ids(&res), vec!["1"]);
}
