#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use commentsim::comments::types::{CommentEmbedding, Neighbor};
use commentsim::db;
use commentsim::embedding::EmbeddingProvider;
use commentsim::store::sqlite::SqliteVectorStore;
use commentsim::store::VectorStore;

/// Embedding width used by all test fixtures.
pub const DIM: usize = 8;

/// Fresh sqlite-vec store over an in-memory database.
pub fn memory_store() -> SqliteVectorStore {
    let conn = db::open_memory_database(DIM).unwrap();
    SqliteVectorStore::new(Arc::new(Mutex::new(conn)), DIM)
}

/// Deterministic unit embedding with a spike at position `seed`.
/// Distinct seeds produce orthogonal vectors.
pub fn test_embedding(seed: u8) -> Vec<f32> {
    let mut v = vec![0.0f32; DIM];
    v[seed as usize % DIM] = 1.0;
    v
}

/// Unit embedding with high cosine similarity to `base` (a near-duplicate).
pub fn similar_embedding(base: &[f32]) -> Vec<f32> {
    let mut v = base.to_vec();
    for i in 0..5 {
        v[(i * 37) % DIM] += 0.05;
    }
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in &mut v {
            *x /= norm;
        }
    }
    v
}

/// Embedding provider backed by a fixed text → vector table. Counts calls
/// so tests can assert fail-fast behavior.
pub struct StubProvider {
    vectors: HashMap<String, Vec<f32>>,
    pub calls: AtomicUsize,
}

impl StubProvider {
    pub fn new(vectors: impl IntoIterator<Item = (String, Vec<f32>)>) -> Self {
        Self {
            vectors: vectors.into_iter().collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for StubProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.vectors
            .get(text)
            .cloned()
            .ok_or_else(|| anyhow!("no stub vector for text: {text}"))
    }

    fn dimensions(&self) -> usize {
        DIM
    }
}

/// Provider that always fails, as a remote embedding API outage would.
pub struct FailingProvider;

#[async_trait]
impl EmbeddingProvider for FailingProvider {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(anyhow!("embedding API error (503): upstream unavailable"))
    }

    fn dimensions(&self) -> usize {
        DIM
    }
}

/// Provider returning vectors of the wrong width.
pub struct WrongDimProvider;

#[async_trait]
impl EmbeddingProvider for WrongDimProvider {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Ok(vec![1.0; DIM + 3])
    }

    fn dimensions(&self) -> usize {
        DIM + 3
    }
}

/// Synthetic vector store with canned records and nearest-neighbor results,
/// for exercising the analysis logic without a real index.
pub struct StaticStore {
    pub records: Vec<CommentEmbedding>,
    /// Canned KNN result per record key.
    pub neighbors: HashMap<String, Vec<Neighbor>>,
    /// When set, every nearest-neighbor query fails.
    pub fail_knn: bool,
}

impl StaticStore {
    pub fn new(
        records: Vec<CommentEmbedding>,
        neighbors: HashMap<String, Vec<Neighbor>>,
    ) -> Self {
        Self {
            records,
            neighbors,
            fail_knn: false,
        }
    }
}

#[async_trait]
impl VectorStore for StaticStore {
    async fn upsert(&self, _record: CommentEmbedding) -> Result<()> {
        Err(anyhow!("StaticStore is read-only"))
    }

    async fn fetch_post_comments(&self, post_url: &str) -> Result<Vec<CommentEmbedding>> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.post_url == post_url)
            .cloned()
            .collect())
    }

    async fn list_keys_for_post(&self, post_url: &str) -> Result<Vec<String>> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.post_url == post_url)
            .map(|r| r.key.clone())
            .collect())
    }

    async fn nearest_neighbors(&self, embedding: &[f32], _k: usize) -> Result<Vec<Neighbor>> {
        if self.fail_knn {
            return Err(anyhow!("index query failed"));
        }
        let record = self
            .records
            .iter()
            .find(|r| r.embedding == embedding)
            .ok_or_else(|| anyhow!("query vector not in store"))?;
        Ok(self.neighbors.get(&record.key).cloned().unwrap_or_default())
    }

    fn dimensions(&self) -> usize {
        DIM
    }
}

/// Build a record with the derived key for the given post/id.
pub fn record(post_url: &str, comment_id: &str, text: &str, embedding: Vec<f32>) -> CommentEmbedding {
    CommentEmbedding {
        key: commentsim::comments::keys::derive_key(post_url, comment_id).unwrap(),
        post_url: post_url.to_string(),
        comment_id: comment_id.to_string(),
        text: text.to_string(),
        embedding,
    }
}
