//! Rule-based selection of the final one-to-one assignment
//!
//! A greedy heuristic, not a maximum-weight bipartite matching:
//!
//! 1. drop candidates with `emb_sim` below the threshold (inclusive bound);
//! 2. keep the best candidate per A row, ties going to the earlier input row;
//! 3. walk the per-A winners by descending `emb_sim` and let each B row be
//!    claimed only once.

use crate::features::{FeatureRow, FeatureVector};
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One assigned (A row, B row) pair with the features that won it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchRow {
    pub a_idx: usize,
    pub b_idx: usize,
    #[serde(flatten)]
    pub features: FeatureVector,
}

impl From<&FeatureRow> for MatchRow {
    fn from(row: &FeatureRow) -> Self {
        Self {
            a_idx: row.a_idx,
            b_idx: row.b_idx,
            features: row.features,
        }
    }
}

/// Final mapping: every A row and every B row appears at most once
///
/// Rows are kept in selection order (descending `emb_sim`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Assignment {
    rows: Vec<MatchRow>,
}

impl Assignment {
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[inline]
    pub fn rows(&self) -> &[MatchRow] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MatchRow> {
        self.rows.iter()
    }

    /// The match of an A row, if any
    pub fn get(&self, a_idx: usize) -> Option<&MatchRow> {
        self.rows.iter().find(|r| r.a_idx == a_idx)
    }

    pub fn b_for(&self, a_idx: usize) -> Option<usize> {
        self.get(a_idx).map(|r| r.b_idx)
    }

    pub fn a_for(&self, b_idx: usize) -> Option<usize> {
        self.rows.iter().find(|r| r.b_idx == b_idx).map(|r| r.a_idx)
    }
}

impl<'a> IntoIterator for &'a Assignment {
    type Item = &'a MatchRow;
    type IntoIter = std::slice::Iter<'a, MatchRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[inline]
fn by_emb_sim_desc(a: &FeatureRow, b: &FeatureRow) -> Ordering {
    b.emb_sim().partial_cmp(&a.emb_sim()).unwrap_or(Ordering::Equal)
}

/// Candidates passing the threshold, in input order
pub fn above_threshold(rows: &[FeatureRow], emb_threshold: f32) -> Vec<&FeatureRow> {
    // NaN never passes
    rows.iter().filter(|r| r.emb_sim() >= emb_threshold).collect()
}

/// Reduce scored candidates to a one-to-one [`Assignment`]
///
/// Deterministic for a fixed input order; every tie is resolved by a stable sort.
pub fn select_matches(rows: &[FeatureRow], emb_threshold: f32) -> Assignment {
    let mut survivors = above_threshold(rows, emb_threshold);

    // stable: equal (a_idx, emb_sim) keeps input order
    survivors.sort_by(|x, y| x.a_idx.cmp(&y.a_idx).then_with(|| by_emb_sim_desc(x, y)));

    let mut best_per_a: Vec<&FeatureRow> = Vec::new();
    for row in survivors {
        if best_per_a.last().map_or(true, |last| last.a_idx != row.a_idx) {
            best_per_a.push(row);
        }
    }

    // stable: equal emb_sim keeps ascending a_idx
    best_per_a.sort_by(|x, y| by_emb_sim_desc(x, y));

    let mut claimed: AHashSet<usize> = AHashSet::with_capacity(best_per_a.len());
    let rows = best_per_a
        .into_iter()
        .filter(|row| claimed.insert(row.b_idx))
        .map(MatchRow::from)
        .collect();

    Assignment { rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidates::CandidatePair;

    fn row(a_idx: usize, b_idx: usize, emb_sim: f32) -> FeatureRow {
        FeatureRow::new(
            CandidatePair::new(a_idx, b_idx),
            FeatureVector {
                fuzz_title: 0.0,
                tfidf_sim: 0.0,
                emb_sim,
                price_diff: None,
            },
        )
    }

    fn pairs(assignment: &Assignment) -> Vec<(usize, usize)> {
        assignment.iter().map(|r| (r.a_idx, r.b_idx)).collect()
    }

    #[test]
    fn test_empty_input() {
        let assignment = select_matches(&[], 0.85);
        assert!(assignment.is_empty());
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let rows = vec![row(0, 0, 0.85), row(1, 1, 0.8499)];
        let assignment = select_matches(&rows, 0.85);
        assert_eq!(pairs(&assignment), vec![(0, 0)]);
    }

    #[test]
    fn test_nan_is_dropped() {
        let rows = vec![row(0, 0, f32::NAN), row(1, 1, 0.9)];
        assert_eq!(pairs(&select_matches(&rows, 0.5)), vec![(1, 1)]);
    }

    #[test]
    fn test_best_per_a() {
        let rows = vec![row(0, 0, 0.6), row(0, 1, 0.9), row(0, 2, 0.7)];
        let assignment = select_matches(&rows, 0.5);
        assert_eq!(pairs(&assignment), vec![(0, 1)]);
        assert_eq!(assignment.b_for(0), Some(1));
    }

    #[test]
    fn test_tie_breaks_on_input_order() {
        let rows = vec![row(0, 3, 0.9), row(0, 1, 0.9)];
        assert_eq!(pairs(&select_matches(&rows, 0.5)), vec![(0, 3)]);

        let rows = vec![row(0, 1, 0.9), row(0, 3, 0.9)];
        assert_eq!(pairs(&select_matches(&rows, 0.5)), vec![(0, 1)]);
    }

    #[test]
    fn test_b_conflict_goes_to_higher_score() {
        let rows = vec![row(0, 0, 0.88), row(1, 0, 0.95), row(1, 1, 0.7)];
        let assignment = select_matches(&rows, 0.5);

        // A1 takes B0; A0 loses its only claim and is left unmatched
        assert_eq!(pairs(&assignment), vec![(1, 0)]);
        assert_eq!(assignment.a_for(0), Some(1));
        assert!(assignment.get(0).is_none());
    }

    #[test]
    fn test_b_conflict_tie_goes_to_lower_a() {
        let rows = vec![row(2, 0, 0.9), row(1, 0, 0.9)];
        assert_eq!(pairs(&select_matches(&rows, 0.5)), vec![(1, 0)]);
    }

    #[test]
    fn test_one_to_one_invariant() {
        let mut rows = Vec::new();
        for a in 0..6 {
            for b in 0..4 {
                let sim = 0.5 + ((a * 7 + b * 3) % 10) as f32 / 20.0;
                rows.push(row(a, b, sim));
            }
        }
        let assignment = select_matches(&rows, 0.6);

        let a_set: AHashSet<usize> = assignment.iter().map(|r| r.a_idx).collect();
        let b_set: AHashSet<usize> = assignment.iter().map(|r| r.b_idx).collect();
        assert_eq!(a_set.len(), assignment.len());
        assert_eq!(b_set.len(), assignment.len());
        assert!(assignment.iter().all(|r| r.features.emb_sim >= 0.6));
    }

    #[test]
    fn test_rows_sorted_by_score() {
        let rows = vec![row(0, 0, 0.7), row(1, 1, 0.95), row(2, 2, 0.8)];
        let assignment = select_matches(&rows, 0.5);
        assert_eq!(pairs(&assignment), vec![(1, 1), (2, 2), (0, 0)]);
    }

    #[test]
    fn test_features_carried_through() {
        let mut scored = row(4, 7, 0.91);
        scored.features.price_diff = Some(2.5);
        let assignment = select_matches(&[scored], 0.85);

        let matched = assignment.get(4).unwrap();
        assert_eq!(matched.b_idx, 7);
        assert_eq!(matched.features.price_diff, Some(2.5));
    }
}
