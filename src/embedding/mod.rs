//! Text-to-vector embedding pipeline.
//!
//! Provides the [`EmbeddingProvider`] trait and a remote OpenAI-compatible
//! implementation. The provider is created via [`create_provider`] from
//! configuration; the vector width is fixed per deployment and every other
//! component assumes it.

pub mod openai;

use anyhow::Result;
use async_trait::async_trait;

/// Trait for embedding text into vectors.
///
/// Implementations produce vectors of exactly `dimensions()` length,
/// unit-normalized so that relevance scores behave as cosine similarity.
/// Every call is a remote I/O boundary and may fail or time out.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text string into a vector.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Return the number of dimensions this provider produces.
    fn dimensions(&self) -> usize;
}

/// Create an embedding provider from config.
///
/// Currently only `"openai"` is supported (any OpenAI-compatible
/// `/v1/embeddings` endpoint via `api_base`). Requires `OPENAI_API_KEY`
/// in the environment.
pub fn create_provider(
    config: &crate::config::EmbeddingConfig,
) -> Result<Box<dyn EmbeddingProvider>> {
    match config.provider.as_str() {
        "openai" => {
            let provider = openai::OpenAiEmbeddingProvider::new(config)?;
            Ok(Box::new(provider))
        }
        other => anyhow::bail!("unknown embedding provider: {other}. Supported: openai"),
    }
}
