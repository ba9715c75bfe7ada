use crate::embedder::EmbeddingError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MatchError>;

/// Errors that abort a matching run
#[derive(Error, Debug)]
pub enum MatchError {
    #[error("Embedding model error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Core(#[from] catmatch_core::Error),
}
