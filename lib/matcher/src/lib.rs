//! # catmatch Matcher
//!
//! Matches product records between two catalog tables.
//!
//! ## Pipeline
//!
//! - **Candidates**: every (A row, B row) pair, optionally restricted to pairs
//!   whose categories share a segment
//! - **Features**: fuzzy title ratio, pairwise TF-IDF cosine, embedding cosine,
//!   price difference
//! - **Selection**: embedding threshold, best candidate per A row, then greedy
//!   one-to-one deduplication on B rows
//!
//! ## Example
//!
//! ```rust
//! use catmatch_core::{MatchConfig, Record, Table};
//! use catmatch_matcher::Matcher;
//!
//! let a = Table::new("A", vec![Record::titled("Red Shoes", "$50")]);
//! let b = Table::new("B", vec![
//!     Record::titled("red shoes!!", "50.00"),
//!     Record::titled("Blue Hat", "$10"),
//! ]);
//!
//! let matcher = Matcher::new(MatchConfig::default().with_threshold(0.5)).unwrap();
//! let assignment = matcher.match_tables(&a, &b).unwrap();
//!
//! assert_eq!(assignment.len(), 1);
//! assert_eq!(assignment.b_for(0), Some(0));
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Normalize  │────>│ Candidates  │────>│  Features   │
//! │  (A and B)  │     │  (pairs)    │     │ (+ embedder)│
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!                     ┌─────────────┐     ┌──────┴──────┐
//!                     │ Assignment  │<────│   Select    │
//!                     │ (1-to-1)    │     │ (greedy)    │
//!                     └─────────────┘     └─────────────┘
//! ```

pub mod candidates;
pub mod distance;
pub mod embedder;
pub mod error;
pub mod features;
pub mod pipeline;
pub mod report;
pub mod select;

pub use candidates::{generate_candidates, CandidatePair};
pub use distance::{fuzz_similarity, indel_ratio, tfidf_similarity, token_sort_ratio};
pub use embedder::{load_model, EmbeddingError, EmbeddingModel, TrigramHashEmbedder, DEFAULT_HASH_DIM};
pub use error::{MatchError, Result};
pub use features::{compute_features, FeatureRow, FeatureScorer, FeatureVector};
pub use pipeline::{match_two_tables, MatchOutcome, Matcher};
pub use report::MatchSummary;
pub use select::{select_matches, Assignment, MatchRow};
