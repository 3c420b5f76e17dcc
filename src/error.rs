//! Error taxonomy for the similarity pipeline.
//!
//! Every failure a request can hit maps to one of these variants. Handlers
//! log the full error with context and return a generic message to clients.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A key segment (post URL or comment id) was empty.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Caller input was missing or malformed. No external calls were made.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The embedding provider failed or returned no usable vector.
    #[error("embedding generation failed: {0}")]
    EmbeddingGeneration(#[source] anyhow::Error),

    /// The vector store could not be reached or a read/write failed.
    #[error("vector store unavailable: {0}")]
    StoreUnavailable(#[source] anyhow::Error),

    /// A nearest-neighbor query failed mid-analysis. The whole report is
    /// aborted — no partial statistics are returned.
    #[error("similarity query failed: {0}")]
    SimilarityQuery(#[source] anyhow::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
