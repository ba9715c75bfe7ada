//! Feature scoring for candidate pairs
//!
//! Every candidate gets a fixed [`FeatureVector`] computed from the two clean
//! titles and the two normalized prices. The clean detail text is available on
//! the records but does not contribute to any feature.

use crate::candidates::CandidatePair;
use crate::distance::{fuzz_similarity, tfidf_similarity};
use crate::embedder::{EmbeddingError, EmbeddingModel};
use crate::error::Result;
use catmatch_core::{Error, NormalizedRecord, Vector};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Similarity signals for one candidate pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Token-sort fuzzy ratio in [0, 1]
    pub fuzz_title: f32,
    /// Pairwise-fit TF-IDF cosine in [0, 1]
    pub tfidf_sim: f32,
    /// Embedding cosine in [-1, 1]
    pub emb_sim: f32,
    /// Absolute price difference; `None` when either price is unknown
    pub price_diff: Option<f64>,
}

/// A candidate pair with its features
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub a_idx: usize,
    pub b_idx: usize,
    #[serde(flatten)]
    pub features: FeatureVector,
}

impl FeatureRow {
    pub fn new(pair: CandidatePair, features: FeatureVector) -> Self {
        Self {
            a_idx: pair.a_idx,
            b_idx: pair.b_idx,
            features,
        }
    }

    #[inline]
    pub fn pair(&self) -> CandidatePair {
        CandidatePair::new(self.a_idx, self.b_idx)
    }

    #[inline]
    pub fn emb_sim(&self) -> f32 {
        self.features.emb_sim
    }
}

/// Scores candidate pairs against one embedding model
pub struct FeatureScorer<'m> {
    model: &'m dyn EmbeddingModel,
    parallel: bool,
}

impl<'m> FeatureScorer<'m> {
    pub fn new(model: &'m dyn EmbeddingModel) -> Self {
        Self {
            model,
            parallel: false,
        }
    }

    /// Score pairs on the rayon pool. Output order still follows input order.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Compute one [`FeatureRow`] per candidate, in candidate order
    ///
    /// Each referenced title is embedded once. Candidates pointing outside
    /// either table are an error.
    pub fn score(
        &self,
        table_a: &[NormalizedRecord],
        table_b: &[NormalizedRecord],
        candidates: &[CandidatePair],
    ) -> Result<Vec<FeatureRow>> {
        for pair in candidates {
            check_index(pair.a_idx, table_a.len())?;
            check_index(pair.b_idx, table_b.len())?;
        }

        let emb_a = self.embed_titles(table_a, candidates.iter().map(|p| p.a_idx))?;
        let emb_b = self.embed_titles(table_b, candidates.iter().map(|p| p.b_idx))?;
        debug!(
            model = self.model.name(),
            candidates = candidates.len(),
            parallel = self.parallel,
            "scoring candidate pairs"
        );

        let score_pair = |pair: &CandidatePair| -> Result<FeatureRow> {
            let a = &table_a[pair.a_idx];
            let b = &table_b[pair.b_idx];
            let va = emb_a[pair.a_idx]
                .as_ref()
                .ok_or(EmbeddingError::MissingIndex(pair.a_idx))?;
            let vb = emb_b[pair.b_idx]
                .as_ref()
                .ok_or(EmbeddingError::MissingIndex(pair.b_idx))?;

            Ok(FeatureRow::new(
                *pair,
                FeatureVector {
                    fuzz_title: fuzz_similarity(&a.clean_title, &b.clean_title),
                    tfidf_sim: tfidf_similarity(&a.clean_title, &b.clean_title),
                    emb_sim: self.model.cosine(va, vb),
                    price_diff: a.price_norm.abs_diff(&b.price_norm),
                },
            ))
        };

        if self.parallel {
            candidates.par_iter().map(score_pair).collect()
        } else {
            candidates.iter().map(score_pair).collect()
        }
    }

    /// Embed the clean titles of the referenced rows, indexed by row
    fn embed_titles(
        &self,
        table: &[NormalizedRecord],
        indices: impl Iterator<Item = usize>,
    ) -> Result<Vec<Option<Vector>>> {
        let mut wanted = vec![false; table.len()];
        for idx in indices {
            wanted[idx] = true;
        }
        let rows: Vec<usize> = (0..table.len()).filter(|&i| wanted[i]).collect();
        let titles: Vec<&str> = rows.iter().map(|&i| table[i].clean_title.as_str()).collect();

        let vectors = if titles.is_empty() {
            Vec::new()
        } else {
            self.model.encode_batch(&titles)?
        };
        if vectors.len() != rows.len() {
            return Err(EmbeddingError::MissingIndex(vectors.len()).into());
        }

        let mut by_row: Vec<Option<Vector>> = vec![None; table.len()];
        for (row, vector) in rows.into_iter().zip(vectors) {
            by_row[row] = Some(vector);
        }
        Ok(by_row)
    }
}

fn check_index(index: usize, len: usize) -> Result<()> {
    if index >= len {
        return Err(Error::RowOutOfRange { index, len }.into());
    }
    Ok(())
}

/// Score candidates with a sequential [`FeatureScorer`]
pub fn compute_features(
    table_a: &[NormalizedRecord],
    table_b: &[NormalizedRecord],
    candidates: &[CandidatePair],
    model: &dyn EmbeddingModel,
) -> Result<Vec<FeatureRow>> {
    FeatureScorer::new(model).score(table_a, table_b, candidates)
}
