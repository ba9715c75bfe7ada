//! # catmatch Core
//!
//! Core library for catmatch, a product catalog matcher.
//!
//! This crate provides the data model and the leaf algorithms:
//!
//! - [`Cell`], [`Record`], [`Table`] - Loosely typed catalog rows
//! - [`NormalizedRecord`] - Clean title/detail, [`CategoryPath`] and [`Price`]
//! - [`Vector`] - Dense embedding vector with cosine similarity
//! - [`TfIdfModel`] - TF-IDF vectorizer fit on a local corpus
//! - [`MatchConfig`], [`ColumnConfig`] - Explicit run configuration
//!
//! ## Example
//!
//! ```rust
//! use catmatch_core::{normalize, Price, Record};
//!
//! let record = Record::new("<b>Red Shoes!!</b>", "", "Shoes > Running", "$1,234.56");
//! let normalized = normalize(&record);
//!
//! assert_eq!(normalized.clean_title, "red shoes");
//! assert_eq!(normalized.clean_category.to_string(), "shoes > running");
//! assert_eq!(normalized.price_norm, Price::Known(1234.56));
//! ```

pub mod config;
pub mod error;
pub mod normalize;
pub mod record;
pub mod tfidf;
pub mod vector;

pub use config::{CatmatchConfig, ColumnConfig, MatchConfig, DEFAULT_EMB_SIM_THRESHOLD, DEFAULT_MODEL_NAME};
pub use error::{Error, Result};
pub use normalize::{
    clean_str, clean_text, normalize, normalize_category, normalize_price, normalize_table,
    CategoryPath, NormalizedRecord, Price,
};
pub use record::{Cell, Record, Table};
pub use tfidf::TfIdfModel;
pub use vector::Vector;
