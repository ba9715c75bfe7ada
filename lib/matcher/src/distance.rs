//! Pairwise text similarity functions
//!
//! Lexical and statistical signals computed on two clean titles, plus the
//! feature-hashing used by the built-in embedder.

use catmatch_core::{TfIdfModel, Vector};
use std::collections::HashSet;

/// Token-order-invariant fuzzy similarity in [0, 100]
///
/// Whitespace tokens of each side are sorted and rejoined, then compared with
/// [`indel_ratio`]. Two empty strings score 100.
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    indel_ratio(&sorted_tokens(a), &sorted_tokens(b))
}

/// Normalized Indel similarity in [0, 100]: `200 * LCS / (|a| + |b|)`
///
/// Lengths and the longest common subsequence are counted in chars.
pub fn indel_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    200.0 * lcs_len(&a, &b) as f64 / total as f64
}

fn lcs_len(a: &[char], b: &[char]) -> usize {
    let (outer, inner) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let mut row = vec![0usize; inner.len() + 1];
    for x in outer {
        let mut diag = 0;
        for (j, y) in inner.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if x == y { diag + 1 } else { above.max(row[j]) };
            diag = above;
        }
    }
    row[inner.len()]
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// [`token_sort_ratio`] scaled to [0, 1]
#[inline]
pub fn fuzz_similarity(a: &str, b: &str) -> f32 {
    (token_sort_ratio(a, b) / 100.0) as f32
}

/// Cosine of the two texts' TF-IDF vectors, with the vocabulary fit on this pair only
#[inline]
pub fn tfidf_similarity(a: &str, b: &str) -> f32 {
    TfIdfModel::pairwise_similarity(a, b) as f32
}

/// Generate character trigrams from a string
fn generate_trigrams(s: &str) -> HashSet<String> {
    let padded = format!("  {}  ", s);
    let chars: Vec<char> = padded.chars().collect();

    if chars.len() < 3 {
        return HashSet::new();
    }

    chars.windows(3)
        .map(|w| w.iter().collect::<String>())
        .collect()
}

/// Hash a string to a fixed-size unit vector
///
/// Character trigrams add 1.0 to their hashed slot, whole words add 2.0.
pub fn hash_text_to_vector(text: &str, dim: usize) -> Vector {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut vector = Vector::zeros(dim);
    if dim == 0 {
        return vector;
    }
    let normalized = text.to_lowercase();
    let slots = vector.as_mut_slice();

    for trigram in generate_trigrams(&normalized) {
        let mut hasher = DefaultHasher::new();
        trigram.hash(&mut hasher);
        let pos = (hasher.finish() as usize) % dim;
        slots[pos] += 1.0;
    }

    for word in normalized.split_whitespace() {
        let mut hasher = DefaultHasher::new();
        word.hash(&mut hasher);
        let pos = (hasher.finish() as usize) % dim;
        slots[pos] += 2.0; // Words contribute more
    }

    vector.normalize();
    vector
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_sort_ratio_order_invariant() {
        assert_eq!(token_sort_ratio("red running shoes", "shoes running red"), 100.0);
        assert_eq!(token_sort_ratio("red  shoes", "shoes red"), 100.0);
    }

    #[test]
    fn test_token_sort_ratio_range() {
        assert_eq!(token_sort_ratio("", ""), 100.0);
        assert_eq!(token_sort_ratio("abc", ""), 0.0);

        // 8 shared chars over 9 + 8
        let sim = token_sort_ratio("red shoes", "red shoe");
        assert!((sim - 1600.0 / 17.0).abs() < 1e-9, "got {}", sim);

        let low = token_sort_ratio("red shoes", "blue hat");
        assert!(low < 50.0, "got {}", low);
    }

    #[test]
    fn test_indel_ratio() {
        assert_eq!(indel_ratio("", ""), 100.0);
        assert_eq!(indel_ratio("abc", "xyz"), 0.0);
        // lcs "this is a test" = 14 of 14 + 15
        let sim = indel_ratio("this is a test", "this is a test!");
        assert!((sim - 2800.0 / 29.0).abs() < 1e-9, "got {}", sim);
        // lcs("abcd", "acbd") = 3
        assert!((indel_ratio("abcd", "acbd") - 75.0).abs() < 1e-9);
        assert_eq!(indel_ratio("kitten", "sitting"), indel_ratio("sitting", "kitten"));
    }

    #[test]
    fn test_fuzz_similarity_scaled() {
        assert_eq!(fuzz_similarity("blue hat", "hat blue"), 1.0);
        let sim = fuzz_similarity("apple", "banana");
        assert!((0.0..1.0).contains(&sim));
    }

    #[test]
    fn test_tfidf_similarity() {
        assert!((tfidf_similarity("red shoes", "red shoes") - 1.0).abs() < 1e-6);
        assert_eq!(tfidf_similarity("red shoes", "blue hat"), 0.0);
        let partial = tfidf_similarity("red running shoes", "red shoes");
        assert!(partial > 0.3 && partial < 1.0, "got {}", partial);
    }

    #[test]
    fn test_hash_text_to_vector() {
        let vec1 = hash_text_to_vector("hello world", 64);
        let vec2 = hash_text_to_vector("hello world", 64);
        let vec3 = hash_text_to_vector("goodbye moon", 64);

        assert_eq!(vec1.dim(), 64);
        assert_eq!(vec1, vec2);
        assert_ne!(vec1, vec3);
        assert!((vec1.norm() - 1.0).abs() < 0.01);

        assert!(hash_text_to_vector("hello", 0).is_empty());
    }

    #[test]
    fn test_trigram_generation() {
        let trigrams = generate_trigrams("hello");
        assert!(trigrams.contains("hel"));
        assert!(trigrams.contains("ell"));
        assert!(trigrams.contains("llo"));
    }
}
