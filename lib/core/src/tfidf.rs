// TF-IDF vectorizer with a corpus-local vocabulary
use ahash::AHashMap;
use once_cell::sync::Lazy;
use regex::Regex;

static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("valid token regex"));

/// Sparse term -> weight vector
pub type SparseVector = AHashMap<String, f64>;

#[derive(Debug, Clone, Default)]
pub struct TfIdfModel {
    // term -> smoothed inverse document frequency
    idf: AHashMap<String, f64>,
    total_docs: usize,
}

impl TfIdfModel {
    /// Tokenize text the way the vectorizer sees it:
    /// lowercase, then runs of two or more word characters
    #[inline]
    pub fn tokenize(text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        TOKEN
            .find_iter(&lowered)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Fit the vocabulary and idf weights on `docs` only
    pub fn fit(docs: &[&str]) -> Self {
        let mut term_dfs: AHashMap<String, u32> = AHashMap::new();
        for doc in docs {
            let mut seen: Vec<String> = Self::tokenize(doc);
            seen.sort_unstable();
            seen.dedup();
            for term in seen {
                *term_dfs.entry(term).or_insert(0) += 1;
            }
        }

        // smooth idf: ln((1 + n) / (1 + df)) + 1
        let n = docs.len() as f64;
        let idf = term_dfs
            .into_iter()
            .map(|(term, df)| {
                let weight = ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0;
                (term, weight)
            })
            .collect();

        Self {
            idf,
            total_docs: docs.len(),
        }
    }

    #[inline]
    #[must_use]
    pub fn vocabulary_len(&self) -> usize {
        self.idf.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.idf.is_empty()
    }

    #[inline]
    pub fn total_docs(&self) -> usize {
        self.total_docs
    }

    /// L2-normalized tf-idf weights of `text`. Out-of-vocabulary terms are ignored.
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut weights: SparseVector = AHashMap::new();
        for token in Self::tokenize(text) {
            if let Some(idf) = self.idf.get(&token) {
                *weights.entry(token).or_insert(0.0) += idf;
            }
        }

        let norm = weights.values().map(|w| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for w in weights.values_mut() {
                *w /= norm;
            }
        }
        weights
    }

    /// Cosine similarity of two sparse vectors produced by [`Self::transform`]
    pub fn cosine(a: &SparseVector, b: &SparseVector) -> f64 {
        if a.is_empty() || b.is_empty() {
            return 0.0;
        }
        let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
        let dot: f64 = small
            .iter()
            .filter_map(|(term, w)| large.get(term).map(|other| w * other))
            .sum();
        let norm_a = a.values().map(|w| w * w).sum::<f64>().sqrt();
        let norm_b = b.values().map(|w| w * w).sum::<f64>().sqrt();
        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }
        (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
    }

    /// Fit on exactly these two texts and return their cosine similarity
    ///
    /// An empty vocabulary, or a side without tokens, scores 0.0.
    pub fn pairwise_similarity(a: &str, b: &str) -> f64 {
        let model = Self::fit(&[a, b]);
        if model.is_empty() {
            return 0.0;
        }
        Self::cosine(&model.transform(a), &model.transform(b))
    }
}
