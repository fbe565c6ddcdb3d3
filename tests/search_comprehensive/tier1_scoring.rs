//! Tier 1: Scoring
//!
//! Validates TF-IDF weighting, dismax combination, boosts and length norms.

use super::test_utils::*;
use serde_json::json;

// ============================================================================
// Basic search
// ============================================================================

/// A term present in one document finds exactly that document
#[tokio::test]
async fn test_tier1_basic_search() {
    let db = db_with(clouded_docs());
    let res = search(&db, json!({"fields": FIELDS, "query": "sketch"})).await;
    assert_eq!(ids(&res), vec!["1"]);
    assert!(res.rows[0].score > 0.0);
    assert_eq!(res.total_rows, 1);
}

/// An unknown term finds nothing
#[tokio::test]
async fn test_tier1_zero_results() {
    let db = db_with(clouded_docs());
    let res = search(&db, json!({"fields": FIELDS, "query": "fizzbuzz"})).await;
    assert!(res.rows.is_empty());
    assert_eq!(res.total_rows, 0);
}

/// Identical term frequency and field length give identical scores
#[tokio::test]
async fn test_tier1_equal_scores() {
    let db = db_with(vec![
        json!({"_id": "1", "text": "some text here"}),
        json!({"_id": "2", "text": "more text there"}),
    ]);
    let res = search(&db, json!({"fields": ["text"], "query": "text"})).await;
    assert_eq!(res.rows.len(), 2);
    assert_eq!(res.rows[0].score, res.rows[1].score);
}

// ============================================================================
// Term frequency and length norms
// ============================================================================

/// Term frequency weighed against field length
#[tokio::test]
async fn test_tier1_court_ordering() {
    let db = db_with(court_docs());
    let res = search(&db, json!({"fields": ["text"], "query": "court"})).await;
    assert_eq!(ids(&res), vec!["2", "3", "1"]);
    assert_sorted_desc(&res);

    // df = 5 postings; doc 2: (2/5)(1/5)/sqrt(5)
    let expected = (2.0 / 5.0) * (1.0 / 5.0) / 5f64.sqrt();
    assert!((res.rows[0].score - expected).abs() < 1e-12);
}

/// A very long field loses to a shorter one with fewer matches
#[tokio::test]
async fn test_tier1_long_field_is_penalized() {
    let db = db_with(vec![
        json!({"_id": "1", "text": "the court ruled"}),
        json!({"_id": "2", "text": "the court and the court"}),
        json!({"_id": "3", "text": "a very long passage mentioning the court and the court again and again"}),
    ]);
    let res = search(&db, json!({"fields": ["text"], "query": "court"})).await;
    assert_eq!(ids(&res), vec!["2", "1", "3"]);
}

/// Shorter matching field wins for equal term frequency
#[tokio::test]
async fn test_tier1_short_fields_weigh_more() {
    let db = db_with(mario_docs());

    let res = search(&db, json!({"fields": FIELDS, "query": "yoshi"})).await;
    assert_eq!(ids(&res), vec!["1", "2"]);
    assert_ne!(res.rows[0].score, res.rows[1].score);

    let res = search(&db, json!({"fields": FIELDS, "query": "mario"})).await;
    assert_eq!(ids(&res), vec!["2", "1"]);
    assert_ne!(res.rows[0].score, res.rows[1].score);
}

/// One field only
#[tokio::test]
async fn test_tier1_single_field() {
    let db = db_with(mario_docs());
    let res = search(&db, json!({"fields": ["text"], "query": "mario"})).await;
    assert_eq!(ids(&res), vec!["1"]);
}

// ============================================================================
// Dismax
// ============================================================================

/// Two-term scores are the max of per-term scores, not the sum
#[tokio::test]
async fn test_tier1_dismax() {
    let db = db_with(mario_docs());
    let res = search(
        &db,
        json!({"fields": FIELDS, "query": "albino elephant", "mm": "50%"}),
    )
    .await;
    assert_eq!(ids(&res), vec!["3", "4"]);
    assert_ne!(res.rows[0].score, res.rows[1].score);

    // doc 3 title "Albino elephant": each term (1/2)(1/2)/sqrt(2)
    let per_term = 0.25 / 2f64.sqrt();
    assert!((res.rows[0].score - per_term).abs() < 1e-12);

    let albino = search(&db, json!({"fields": FIELDS, "query": "albino"})).await;
    let elephant = search(&db, json!({"fields": FIELDS, "query": "elephant"})).await;
    let sum = albino.rows[0].score + elephant.rows[0].score;
    assert!(res.rows[0].score < sum);
}

/// Repeated query terms count once
#[tokio::test]
async fn test_tier1_repeated_query_terms() {
    let db = db_with(court_docs());
    let once = search(&db, json!({"fields": ["text"], "query": "court"})).await;
    let twice = search(&db, json!({"fields": ["text"], "query": "court COURT court"})).await;
    assert_eq!(once, twice);
}

// ============================================================================
// Boosts
// ============================================================================

/// Boosting a field raises its matches until the ranking flips
#[tokio::test]
async fn test_tier1_boost_changes_ranking() {
    let db = db_with(mario_docs());

    let even = search(&db, json!({"fields": {"title": 1, "text": 1}, "query": "mario"})).await;
    assert_eq!(ids(&even), vec!["2", "1"]);

    let doubled = search(&db, json!({"fields": {"title": 1, "text": 2}, "query": "mario"})).await;
    let text_even = even.rows.iter().find(|r| r.id == "1").unwrap().score;
    let text_doubled = doubled.rows.iter().find(|r| r.id == "1").unwrap().score;
    assert!((text_doubled - 2.0 * text_even).abs() < 1e-12);

    let heavy = search(&db, json!({"fields": {"title": 1, "text": 4}, "query": "mario"})).await;
    assert_eq!(ids(&heavy), vec!["1", "2"]);
}

/// Boosts do not change which index is read
#[tokio::test]
async fn test_tier1_boosts_share_an_index() {
    let db = db_with(mario_docs());
    search(&db, json!({"fields": {"title": 1, "text": 1}, "query": "mario"})).await;
    search(&db, json!({"fields": {"title": 3, "text": 0.5}, "query": "mario"})).await;
    assert_eq!(db.engine().list_views().len(), 1);
}
