//! Tier 5: Result Shaping
//!
//! Validates pagination, include_docs and highlighting.

use super::test_utils::*;
use serde_json::json;
use sift::{SearchConfig, Sift};

// ============================================================================
// Pagination
// ============================================================================

/// total_rows counts every match regardless of skip and limit
#[tokio::test]
async fn test_tier5_pagination() {
    let db = db_with(court_docs());
    let base = json!({"fields": ["text"], "query": "court"});

    let page = |skip: usize, limit: Option<usize>| {
        let mut opts = base.clone();
        opts["skip"] = json!(skip);
        if let Some(l) = limit {
            opts["limit"] = json!(l);
        }
        opts
    };

    let res = search(&db, page(1, Some(1))).await;
    assert_eq!(ids(&res), vec!["3"]);
    assert_eq!(res.total_rows, 3);

    let res = search(&db, page(1, None)).await;
    assert_eq!(ids(&res), vec!["3", "1"]);

    let res = search(&db, page(0, Some(0))).await;
    assert!(res.rows.is_empty());
    assert_eq!(res.total_rows, 3);

    let res = search(&db, page(5, Some(2))).await;
    assert!(res.rows.is_empty());
    assert_eq!(res.total_rows, 3);
}

/// Queries without terms return nothing
#[tokio::test]
async fn test_tier5_empty_queries() {
    let db = db_with(court_docs());
    for q in ["", "   ", "!!! ??"] {
        let res = search(&db, json!({"fields": ["text"], "query": q})).await;
        assert!(res.rows.is_empty(), "query {:?}", q);
        assert_eq!(res.total_rows, 0);
    }
    assert!(db.engine().list_views().is_empty());
}

// ============================================================================
// include_docs
// ============================================================================

/// Full documents are attached in rank order
#[tokio::test]
async fn test_tier5_include_docs() {
    let db = db_with(court_docs());
    let res = search(
        &db,
        json!({"fields": ["text"], "query": "court", "include_docs": true}),
    )
    .await;
    assert_eq!(ids(&res), vec!["2", "3", "1"]);
    for row in &res.rows {
        let doc = row.doc.as_ref().expect("doc attached");
        assert_eq!(doc.id(), row.id);
        assert_eq!(Some(doc), db.store().get_sync(&row.id).as_ref());
        assert!(row.highlighting.is_none());
    }
}

/// Without include_docs no document is attached
#[tokio::test]
async fn test_tier5_no_docs_by_default() {
    let db = db_with(court_docs());
    let res = search(&db, json!({"fields": ["text"], "query": "court"})).await;
    assert!(res.rows.iter().all(|r| r.doc.is_none()));
}

// ============================================================================
// Highlighting
// ============================================================================

/// Matches are wrapped in the matched field only
#[tokio::test]
async fn test_tier5_highlighting() {
    let db = db_with(mario_docs());
    let res = search(
        &db,
        json!({"fields": FIELDS, "query": "yoshi", "highlighting": true}),
    )
    .await;
    assert_eq!(ids(&res), vec!["1", "2"]);

    let first = res.rows[0].highlighting.as_ref().unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first["title"], "<strong>Yoshi</strong>");

    let second = res.rows[1].highlighting.as_ref().unwrap();
    assert_eq!(
        second["text"],
        "A plumber who travels with <strong>Yoshi</strong> and friends across many strange worlds"
    );
    assert!(res.rows.iter().all(|r| r.doc.is_none()));
}

/// Custom markers override the defaults
#[tokio::test]
async fn test_tier5_highlighting_custom_markers() {
    let db = db_with(mario_docs());
    let res = search(
        &db,
        json!({
            "fields": FIELDS,
            "query": "yoshi",
            "highlighting": true,
            "highlighting_pre": "<em>",
            "highlighting_post": "</em>"
        }),
    )
    .await;
    assert_eq!(res.rows[0].highlighting.as_ref().unwrap()["title"], "<em>Yoshi</em>");
}

/// Suffixes after the matched term are included
#[tokio::test]
async fn test_tier5_highlighting_suffix() {
    let db = db_with(vec![json!({"_id": "1", "text": "The court and the Courthouse"})]);
    let res = search(
        &db,
        json!({"fields": ["text"], "query": "court", "highlighting": true}),
    )
    .await;
    assert_eq!(
        res.rows[0].highlighting.as_ref().unwrap()["text"],
        "The <strong>court</strong> and the <strong>Courthouse</strong>"
    );
}

/// Every matched term in every matched field is marked
#[tokio::test]
async fn test_tier5_highlighting_multiple_terms() {
    let db = db_with(mario_docs());
    let res = search(
        &db,
        json!({"fields": FIELDS, "query": "albino elephant", "highlighting": true, "mm": "50%"}),
    )
    .await;
    let hl = res.rows[0].highlighting.as_ref().unwrap();
    assert_eq!(hl["title"], "<strong>Albino</strong> <strong>elephant</strong>");

    let hl = res.rows[1].highlighting.as_ref().unwrap();
    assert_eq!(
        hl["text"],
        "An <strong>albino</strong> tiger was spotted near the <strong>elephant</strong> pond by the keepers"
    );
    assert!(!hl.contains_key("title"), "\"Elephants\" is not a posting for elephant");
}

/// Highlighting and include_docs together
#[tokio::test]
async fn test_tier5_highlighting_with_docs() {
    let db = db_with(mario_docs());
    let res = search(
        &db,
        json!({"fields": FIELDS, "query": "mario", "highlighting": true, "include_docs": true}),
    )
    .await;
    for row in &res.rows {
        assert!(row.doc.is_some());
        assert!(row.highlighting.is_some());
    }
}

/// Config markers apply when a request sets none
#[tokio::test]
async fn test_tier5_config_markers() {
    let config = SearchConfig {
        highlighting_pre: "[".to_string(),
        highlighting_post: "]".to_string(),
        ..SearchConfig::default()
    };
    let db = Sift::with_config(config);
    load(&db, mario_docs());

    let res = search(
        &db,
        json!({"fields": ["title"], "query": "mario", "highlighting": true}),
    )
    .await;
    assert_eq!(res.rows[0].highlighting.as_ref().unwrap()["title"], "[Mario]");
}

/// Rows serialize with only the requested extras
#[tokio::test]
async fn test_tier5_row_serialization() {
    let db = db_with(vec![json!({"_id": "1", "text": "court"})]);
    let res = search(&db, json!({"fields": ["text"], "query": "court", "include_docs": true})).await;
    let value = serde_json::to_value(&res).unwrap();
    assert_eq!(value["total_rows"], json!(1));
    assert_eq!(value["rows"][0]["doc"], json!({"_id": "1", "text": "court"}));
    assert!(value["rows"][0].get("highlighting").is_none());
}
