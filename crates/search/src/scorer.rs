//! Scoring for search
//!
//! This module provides:
//! - Scorer trait for pluggable scoring algorithms
//! - ScorerContext for query-level statistics
//! - DismaxScorer default implementation
//! - rank() to score and order a candidate set

use crate::candidates::{Candidate, CandidateSet};
use crate::field::FieldSpec;
use std::cmp::Ordering;
use std::collections::HashMap;

// ============================================================================
// ScorerContext
// ============================================================================

/// Statistics shared by every candidate of one query
#[derive(Debug, Clone, Copy)]
pub struct ScorerContext<'a> {
    /// Distinct query terms, in query order
    pub query_terms: &'a [String],
    /// Posting count per query term
    pub doc_freqs: &'a HashMap<String, usize>,
    /// Indexed fields, in declaration order
    pub fields: &'a [FieldSpec],
}

impl<'a> ScorerContext<'a> {
    /// Posting count for a term (0 if unseen)
    pub fn doc_freq(&self, term: &str) -> usize {
        self.doc_freqs.get(term).copied().unwrap_or(0)
    }
}

// ============================================================================
// Scorer Trait
// ============================================================================

/// Pluggable scoring interface
///
/// Scorers take one candidate and its field norms and return a relevance
/// score. Higher scores indicate more relevant documents.
///
/// # Thread Safety
///
/// Scorers must be Send + Sync to be shared between searches.
pub trait Scorer: Send + Sync {
    /// Score a candidate; `norms` is `None` if the document has no norms row
    fn score(&self, candidate: &Candidate, norms: Option<&[f64]>, ctx: &ScorerContext<'_>) -> f64;

    /// Name for debugging and logging
    fn name(&self) -> &str;
}

// ============================================================================
// DismaxScorer
// ============================================================================

/// TF-IDF with disjunction-max combination
///
/// For each query term t, summed over fields f containing t:
///
/// ```text
/// (tf / df) * (1 / df) * boost(f) / norm(f)
/// ```
///
/// The document score is the maximum of these per-term sums, not their
/// total: one term scoring well in one field beats several weak matches.
/// `df` counts posting rows, `norm` is sqrt of the field's token count. The
/// query norm is constant per query and left out.
#[derive(Debug, Clone, Copy, Default)]
pub struct DismaxScorer;

impl DismaxScorer {
    fn term_score(
        candidate: &Candidate,
        term: &str,
        norms: &[f64],
        ctx: &ScorerContext<'_>,
    ) -> f64 {
        let df = ctx.doc_freq(term);
        if df == 0 {
            return 0.0;
        }
        let df = df as f64;
        candidate
            .fields()
            .iter()
            .enumerate()
            .map(|(idx, terms)| {
                let (Some(tf), Some(field)) = (terms.get(term), ctx.fields.get(idx)) else {
                    return 0.0;
                };
                let norm = norms.get(idx).copied().unwrap_or(0.0);
                if norm <= 0.0 {
                    return 0.0;
                }
                let doc_score = *tf as f64 / df;
                let query_score = 1.0 / df;
                doc_score * query_score * field.boost() / norm
            })
            .sum()
    }
}

impl Scorer for DismaxScorer {
    fn score(&self, candidate: &Candidate, norms: Option<&[f64]>, ctx: &ScorerContext<'_>) -> f64 {
        let norms = norms.unwrap_or(&[]);
        ctx.query_terms
            .iter()
            .map(|term| Self::term_score(candidate, term, norms, ctx))
            .fold(0.0, f64::max)
    }

    fn name(&self) -> &str {
        "dismax-tfidf"
    }
}

// ============================================================================
// Ranking
// ============================================================================

/// A scored document id
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDoc {
    /// Document id
    pub id: String,
    /// Relevance score (non-negative)
    pub score: f64,
}

/// Score every candidate and sort by descending score
///
/// The sort is stable: equal scores keep the candidates' first-seen order.
pub fn rank(
    scorer: &dyn Scorer,
    candidates: &CandidateSet,
    norms: &HashMap<String, Vec<f64>>,
    ctx: &ScorerContext<'_>,
) -> Vec<ScoredDoc> {
    let mut scored: Vec<ScoredDoc> = candidates
        .iter()
        .map(|(id, candidate)| ScoredDoc {
            id: id.to_string(),
            score: scorer.score(candidate, norms.get(id).map(Vec::as_slice), ctx),
        })
        .collect();
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scored
}

// ============================================================================
// Tests
// ============================================================================
