//! Tier 6: Filters
//!
//! Validates document filters: exclusion, failure reporting and their
//! effect on index identity.

use super::test_utils::*;
use serde_json::json;
use sift::{Document, FilterError, FnFilter, SearchRequest};
use std::sync::Arc;

fn court_request() -> SearchRequest {
    SearchRequest::builder()
        .query("court")
        .fields(["text"])
        .build()
        .unwrap()
}

/// Filtered-out documents never reach the index
#[tokio::test]
async fn test_tier6_filter_excludes() {
    let db = db_with(court_docs());
    let req = court_request().with_filter(Arc::new(FnFilter::new(
        "doc._id != '2'",
        |doc: &Document| Ok(doc.id() != "2"),
    )));
    let res = search_req(&db, &req).await;
    assert_eq!(ids(&res), vec!["3", "1"]);
    assert_eq!(res.total_rows, 2);
}

/// A failing filter excludes only that document and is reported
#[tokio::test]
async fn test_tier6_filter_errors_are_reported() {
    let (db, reporter) = db_with_reporter(court_docs());
    let req = court_request().with_filter(Arc::new(FnFilter::new(
        "fails on 1",
        |doc: &Document| {
            if doc.id() == "1" {
                Err(FilterError::new("oups"))
            } else {
                Ok(true)
            }
        },
    )));
    let res = search_req(&db, &req).await;
    assert_eq!(ids(&res), vec!["2", "3"]);
    assert_eq!(reporter.failures(), vec![("1".to_string(), "oups".to_string())]);
}

/// Filter-dependent document properties
#[tokio::test]
async fn test_tier6_filter_on_content() {
    let db = db_with(vec![
        json!({"_id": "1", "type": "static", "text": "court records"}),
        json!({"_id": "2", "type": "dynamic", "text": "court news"}),
    ]);
    let req = court_request().with_filter(Arc::new(FnFilter::new(
        "doc.type !== 'static'",
        |doc: &Document| Ok(doc.get("type").and_then(|t| t.as_str()) != Some("static")),
    )));
    let res = search_req(&db, &req).await;
    assert_eq!(ids(&res), vec!["2"]);
}

/// Filters are part of the index identity
#[tokio::test]
async fn test_tier6_filter_changes_identity() {
    let db = db_with(court_docs());
    let plain = court_request();
    let filtered = court_request().with_filter(Arc::new(FnFilter::new(
        "doc._id != '2'",
        |doc: &Document| Ok(doc.id() != "2"),
    )));
    let other = court_request().with_filter(Arc::new(FnFilter::new(
        "doc._id != '3'",
        |doc: &Document| Ok(doc.id() != "3"),
    )));

    assert_eq!(search_req(&db, &plain).await.total_rows, 3);
    assert_eq!(search_req(&db, &filtered).await.total_rows, 2);
    assert_eq!(search_req(&db, &other).await.total_rows, 2);
    assert_eq!(db.engine().list_views().len(), 3);

    let searcher = db.searcher();
    assert_ne!(searcher.index_identity(&plain), searcher.index_identity(&filtered));
    assert_ne!(searcher.index_identity(&filtered), searcher.index_identity(&other));
}

/// The default reporter logs failures and keeps searching
#[tokio::test]
async fn test_tier6_default_reporter() {
    let db = db_with(court_docs());
    let req = court_request().with_filter(Arc::new(FnFilter::new(
        "always fails",
        |_: &Document| Err(FilterError::new("broken filter")),
    )));
    let res = search_req(&db, &req).await;
    assert!(res.rows.is_empty());
}
