//! Tier 7: Property-Based
//!
//! Pagination and identity invariants over generated corpora.

use super::test_utils::*;
use proptest::prelude::*;
use serde_json::{json, Value};
use sift::SearchRequest;

const VOCAB: [&str; 8] = [
    "court", "mario", "yoshi", "albino", "elephant", "title", "text", "kingdom",
];

fn corpus() -> impl Strategy<Value = Vec<Value>> {
    proptest::collection::vec(
        (
            proptest::collection::vec(0..VOCAB.len(), 0..6),
            proptest::collection::vec(0..VOCAB.len(), 0..12),
        ),
        1..12,
    )
    .prop_map(|docs| {
        docs.into_iter()
            .enumerate()
            .map(|(i, (title, text))| {
                let words = |idx: Vec<usize>| {
                    idx.into_iter().map(|w| VOCAB[w]).collect::<Vec<_>>().join(" ")
                };
                json!({"_id": format!("doc{:02}", i), "title": words(title), "text": words(text)})
            })
            .collect()
    })
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Pages are slices of the full ranking; total_rows ignores paging
    #[test]
    fn prop_tier7_pagination_is_a_slice(
        docs in corpus(),
        q1 in 0..VOCAB.len(),
        q2 in 0..VOCAB.len(),
        skip in 0usize..8,
        limit in 0usize..8,
    ) {
        let rt = runtime();
        let db = db_with(docs);
        let query = format!("{} {}", VOCAB[q1], VOCAB[q2]);
        let base = json!({"fields": ["title", "text"], "query": query, "mm": "50%"});

        let full = rt.block_on(search(&db, base.clone()));
        let mut paged_opts = base;
        paged_opts["skip"] = json!(skip);
        paged_opts["limit"] = json!(limit);
        let paged = rt.block_on(search(&db, paged_opts));

        prop_assert_eq!(full.total_rows, full.rows.len());
        prop_assert_eq!(paged.total_rows, full.total_rows);
        let expected: Vec<String> = ids(&full).into_iter().skip(skip).take(limit).collect();
        prop_assert_eq!(ids(&paged), expected);
    }

    /// Scores are non-negative and sorted
    #[test]
    fn prop_tier7_scores_sorted(docs in corpus(), q in 0..VOCAB.len()) {
        let rt = runtime();
        let db = db_with(docs);
        let res = rt.block_on(search(&db, json!({"fields": ["title", "text"], "query": VOCAB[q]})));
        for row in &res.rows {
            prop_assert!(row.score >= 0.0 && row.score.is_finite());
        }
        assert_sorted_desc(&res);
    }

    /// Field order never changes the index identity
    #[test]
    fn prop_tier7_identity_ignores_field_order(
        names in proptest::collection::btree_set("[a-z]{1,6}", 1..5),
    ) {
        let db = create_test_db();
        let forward: Vec<String> = names.iter().cloned().collect();
        let backward: Vec<String> = names.iter().rev().cloned().collect();
        let a = SearchRequest::builder().query("x").fields(forward).build().unwrap();
        let b = SearchRequest::builder().query("x").fields(backward).build().unwrap();
        prop_assert_eq!(db.searcher().index_identity(&a), db.searcher().index_identity(&b));
    }
}
