//! # catmatch
//!
//! Links product records between two catalog tables (company A and company B).
//!
//! Each row is normalized, paired with candidate rows of the other table, scored
//! on four features (fuzzy title ratio, pairwise TF-IDF cosine, embedding cosine,
//! absolute price difference) and reduced to a one-to-one assignment by a greedy
//! rule: threshold on embedding similarity, best candidate per A row, then one
//! claim per B row.
//!
//! ## Quick Start
//!
//! ### From the command line
//!
//! ```bash
//! cargo install catmatch
//! catmatch --input-file catalogs.json --sheet-a "Company A" --sheet-b "Company B"
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use catmatch::prelude::*;
//!
//! let a = Table::new("A", vec![Record::titled("Red Shoes", "$50")]);
//! let b = Table::new("B", vec![
//!     Record::titled("red shoes!!", "50.00"),
//!     Record::titled("Blue Hat", "$10"),
//! ]);
//!
//! let config = MatchConfig::default().with_threshold(0.5);
//! let outcome = Matcher::new(config).unwrap().run(&a, &b).unwrap();
//!
//! assert_eq!(outcome.assignment.b_for(0), Some(0));
//! assert_eq!(outcome.summary.candidates, 2);
//! ```
//!
//! ## Crate Structure
//!
//! - [`catmatch-core`](https://docs.rs/catmatch-core) - Records, normalization, TF-IDF, vectors, configuration
//! - [`catmatch-matcher`](https://docs.rs/catmatch-matcher) - Candidates, features, embeddings, selection, pipeline
//! - [`catmatch-table`](https://docs.rs/catmatch-table) - Workbook loading and CSV output

// Re-export core types
pub use catmatch_core::{
    CatmatchConfig, ColumnConfig, MatchConfig,
    Cell, Record, Table,
    NormalizedRecord, Price, CategoryPath,
    Error, Result,
};

// Re-export matcher
pub use catmatch_matcher::{
    Matcher, MatchOutcome, MatchSummary, MatchError,
    Assignment, MatchRow,
    CandidatePair, FeatureRow, FeatureVector,
    EmbeddingModel, EmbeddingError, TrigramHashEmbedder, load_model,
    match_two_tables,
};

// Re-export tables
pub use catmatch_table::{Workbook, SheetRef, TableError, write_assignment};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        CatmatchConfig, ColumnConfig, MatchConfig,
        Cell, Record, Table,
        Matcher, MatchOutcome, Assignment,
        EmbeddingModel,
        Workbook, SheetRef, write_assignment,
    };
}
