//! Write path — validation, embedding generation, and storage.
//!
//! [`ingest_comment`] is the single entry point. It fails fast on invalid
//! input before any external call, and performs exactly one upsert on
//! success or none on any failure path.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::comments::keys;
use crate::comments::types::CommentEmbedding;
use crate::embedding::EmbeddingProvider;
use crate::error::{Error, Result};
use crate::store::VectorStore;

/// A comment submitted for ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewComment {
    pub id: String,
    pub text: String,
}

/// Result returned from a successful ingestion.
#[derive(Debug, Serialize)]
pub struct IngestOutcome {
    /// The resolved document key the embedding was stored under.
    pub key: String,
}

/// Full write path: validate → embed → dimension check → upsert.
///
/// Repeated calls with the same `(post_url, comment.id)` replace the prior
/// record — last write wins, never a duplicate.
pub async fn ingest_comment(
    store: &dyn VectorStore,
    provider: &dyn EmbeddingProvider,
    post_url: &str,
    comment: &NewComment,
) -> Result<IngestOutcome> {
    if post_url.is_empty() {
        return Err(Error::Validation("blogPostUrl must not be empty".into()));
    }
    if comment.id.is_empty() {
        return Err(Error::Validation("comment.id must not be empty".into()));
    }
    if comment.text.is_empty() {
        return Err(Error::Validation("comment.text must not be empty".into()));
    }

    let key = keys::derive_key(post_url, &comment.id)?;

    let embedding = provider
        .embed(&comment.text)
        .await
        .map_err(Error::EmbeddingGeneration)?;

    if embedding.is_empty() {
        return Err(Error::EmbeddingGeneration(anyhow::anyhow!(
            "provider returned an empty vector"
        )));
    }
    // Dimensionality is fixed per deployment — a mismatched vector would
    // corrupt the index, so it is rejected before any write.
    if embedding.len() != store.dimensions() {
        return Err(Error::EmbeddingGeneration(anyhow::anyhow!(
            "provider returned {} dimensions, index expects {}",
            embedding.len(),
            store.dimensions()
        )));
    }

    let record = CommentEmbedding {
        key: key.clone(),
        post_url: post_url.to_string(),
        comment_id: comment.id.clone(),
        text: comment.text.clone(),
        embedding,
    };

    store.upsert(record).await.map_err(Error::StoreUnavailable)?;

    info!(post_url, comment_id = %comment.id, %key, "stored comment embedding");

    Ok(IngestOutcome { key })
}
