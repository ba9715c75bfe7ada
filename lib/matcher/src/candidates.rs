//! Candidate pair generation
//!
//! The default policy is the full cross product of A rows and B rows, which is
//! O(|A|·|B|) and only intended for small catalogs. Callers that need scale must
//! block or index rows before handing them to this module.

use catmatch_core::NormalizedRecord;
use serde::{Deserialize, Serialize};

/// An (A row, B row) combination considered for matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CandidatePair {
    pub a_idx: usize,
    pub b_idx: usize,
}

impl CandidatePair {
    #[inline]
    pub fn new(a_idx: usize, b_idx: usize) -> Self {
        Self { a_idx, b_idx }
    }
}

impl From<(usize, usize)> for CandidatePair {
    fn from((a_idx, b_idx): (usize, usize)) -> Self {
        Self { a_idx, b_idx }
    }
}

/// Produce the pairs worth scoring
///
/// With `require_category_overlap`, a pair is kept only when both rows have a
/// non-empty category and their category segments intersect. Rows without a
/// category never pair in that mode. Callers must not rely on the output order.
pub fn generate_candidates(
    table_a: &[NormalizedRecord],
    table_b: &[NormalizedRecord],
    require_category_overlap: bool,
) -> Vec<CandidatePair> {
    if !require_category_overlap {
        let mut candidates = Vec::with_capacity(table_a.len() * table_b.len());
        for a_idx in 0..table_a.len() {
            candidates.extend((0..table_b.len()).map(|b_idx| CandidatePair::new(a_idx, b_idx)));
        }
        return candidates;
    }

    let mut candidates = Vec::new();
    for (a_idx, a) in table_a.iter().enumerate() {
        if a.clean_category.is_empty() {
            continue;
        }
        for (b_idx, b) in table_b.iter().enumerate() {
            if a.clean_category.overlaps(&b.clean_category) {
                candidates.push(CandidatePair::new(a_idx, b_idx));
            }
        }
    }
    candidates
}
