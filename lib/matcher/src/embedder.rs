//! Embedding models
//!
//! The scorer only sees the [`EmbeddingModel`] trait, so any backend can be
//! plugged in. The built-in [`TrigramHashEmbedder`] is deterministic and needs
//! no model files; [`load_model`] resolves configured identifiers to a backend.

use crate::distance::hash_text_to_vector;
use catmatch_core::Vector;
use std::sync::Arc;
use thiserror::Error;

/// Identifier prefix of the built-in hashing embedder
pub const TRIGRAM_HASH_MODEL: &str = "trigram-hash";

/// Default dimension for the hashing embedder
pub const DEFAULT_HASH_DIM: usize = 384;

/// Largest accepted hashing dimension
pub const MAX_HASH_DIM: usize = 8192;

#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error("unknown embedding model '{0}'")]
    UnknownModel(String),

    #[error("invalid embedding dimension {0} (expected 1..=8192)")]
    InvalidDimension(usize),

    #[error("encode failed: {0}")]
    Encode(String),

    #[error("missing embedding for index {0}")]
    MissingIndex(usize),
}

/// Converts text into dense vectors
///
/// Implementations must be safe for concurrent use (Send + Sync).
pub trait EmbeddingModel: Send + Sync {
    /// Identifier the model was loaded from
    fn name(&self) -> &str;

    /// Dimensionality of the output vectors
    fn dimension(&self) -> usize;

    /// Embedding of a single text
    fn encode(&self, text: &str) -> Result<Vector, EmbeddingError>;

    /// Embeddings of several texts, in input order
    fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vector>, EmbeddingError> {
        texts.iter().map(|text| self.encode(text)).collect()
    }

    /// Similarity of two embeddings
    fn cosine(&self, a: &Vector, b: &Vector) -> f32 {
        a.cosine_similarity(b)
    }
}

/// Feature-hashed character trigram and word embedder
#[derive(Debug, Clone)]
pub struct TrigramHashEmbedder {
    name: String,
    dim: usize,
}

impl TrigramHashEmbedder {
    pub fn new(dim: usize) -> Result<Self, EmbeddingError> {
        if dim == 0 || dim > MAX_HASH_DIM {
            return Err(EmbeddingError::InvalidDimension(dim));
        }
        Ok(Self {
            name: format!("{}-{}", TRIGRAM_HASH_MODEL, dim),
            dim,
        })
    }
}

impl Default for TrigramHashEmbedder {
    fn default() -> Self {
        Self {
            name: format!("{}-{}", TRIGRAM_HASH_MODEL, DEFAULT_HASH_DIM),
            dim: DEFAULT_HASH_DIM,
        }
    }
}

impl EmbeddingModel for TrigramHashEmbedder {
    fn name(&self) -> &str {
        &self.name
    }

    fn dimension(&self) -> usize {
        self.dim
    }

    fn encode(&self, text: &str) -> Result<Vector, EmbeddingError> {
        Ok(hash_text_to_vector(text, self.dim))
    }
}

/// Resolve a model identifier to a loaded backend
///
/// Accepts `trigram-hash` and `trigram-hash-<dim>`. Anything else is an
/// [`EmbeddingError::UnknownModel`].
pub fn load_model(name: &str) -> Result<Arc<dyn EmbeddingModel>, EmbeddingError> {
    let name = name.trim();
    if name == TRIGRAM_HASH_MODEL {
        return Ok(Arc::new(TrigramHashEmbedder::default()));
    }

    let dim = name
        .strip_prefix(TRIGRAM_HASH_MODEL)
        .and_then(|rest| rest.strip_prefix('-'))
        .ok_or_else(|| EmbeddingError::UnknownModel(name.to_string()))?
        .parse::<usize>()
        .map_err(|_| EmbeddingError::UnknownModel(name.to_string()))?;

    Ok(Arc::new(TrigramHashEmbedder::new(dim)?))
}
