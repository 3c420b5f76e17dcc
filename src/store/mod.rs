//! Vector store seam.
//!
//! [`VectorStore`] is the storage capability the pipeline is written
//! against: key-value upsert, attribute-filtered reads, and approximate
//! nearest-neighbor search with relevance scores. The production
//! implementation is [`sqlite::SqliteVectorStore`]; tests substitute
//! synthetic implementations to exercise the analysis logic without a real
//! index.

pub mod sqlite;

use anyhow::Result;
use async_trait::async_trait;

use crate::comments::types::{CommentEmbedding, Neighbor};

/// Storage and nearest-neighbor search over comment embeddings.
///
/// A handle is created once at startup and injected into each component;
/// implementations must be safe for concurrent use.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Insert or replace the record at its key (last-write-wins).
    async fn upsert(&self, record: CommentEmbedding) -> Result<()>;

    /// All records for a post, full payload including embeddings.
    async fn fetch_post_comments(&self, post_url: &str) -> Result<Vec<CommentEmbedding>>;

    /// Document keys of all records for a post — a projection, no embedding
    /// payload is transferred. Empty when the post has no records.
    async fn list_keys_for_post(&self, post_url: &str) -> Result<Vec<String>>;

    /// Top-`k` most similar records to the query vector, with relevance
    /// scores (higher = more similar).
    ///
    /// Precondition relied on by the analyzer: if the query vector is
    /// itself indexed, its own record is returned as a candidate with the
    /// maximal score. Classification counts that self-match.
    async fn nearest_neighbors(&self, embedding: &[f32], k: usize) -> Result<Vec<Neighbor>>;

    /// Fixed embedding width this store was created with.
    fn dimensions(&self) -> usize;
}
