//! Run summary for a matching pass

use crate::features::FeatureRow;
use crate::select::{above_threshold, Assignment};
use serde::Serialize;

/// Counts and score statistics for one run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchSummary {
    /// Rows in table A
    pub a_rows: usize,
    /// Rows in table B
    pub b_rows: usize,
    /// Candidate pairs scored
    pub candidates: usize,
    /// Candidates with `emb_sim` at or above the threshold
    pub above_threshold: usize,
    /// Pairs in the final assignment
    pub matches: usize,
    /// A rows without a parseable price
    pub unknown_prices_a: usize,
    /// B rows without a parseable price
    pub unknown_prices_b: usize,
    /// Mean `emb_sim` over the assignment
    pub mean_emb_sim: f32,
    /// Highest `emb_sim` in the assignment
    pub best_emb_sim: f32,
}

impl MatchSummary {
    /// Build the score statistics from scored candidates and the final assignment
    pub fn compute(feature_rows: &[FeatureRow], emb_threshold: f32, assignment: &Assignment) -> Self {
        let passing = above_threshold(feature_rows, emb_threshold).len();

        let (mean_emb_sim, best_emb_sim) = if assignment.is_empty() {
            (0.0, 0.0)
        } else {
            let scores: Vec<f32> = assignment.iter().map(|r| r.features.emb_sim).collect();
            let mean = scores.iter().sum::<f32>() / scores.len() as f32;
            let best = scores.iter().copied().fold(f32::MIN, f32::max);
            (mean, best)
        };

        Self {
            candidates: feature_rows.len(),
            above_threshold: passing,
            matches: assignment.len(),
            mean_emb_sim,
            best_emb_sim,
            ..Self::default()
        }
    }

    /// Fraction of A rows that found a match
    pub fn match_rate(&self) -> f32 {
        if self.a_rows == 0 {
            0.0
        } else {
            self.matches as f32 / self.a_rows as f32
        }
    }
}
