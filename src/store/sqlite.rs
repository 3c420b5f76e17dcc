//! SQLite + sqlite-vec implementation of [`VectorStore`].
//!
//! The `comments` table holds the text payload and attributes; the
//! `comments_vec` vec0 virtual table is the vector index. Upserts touch both
//! inside one transaction. rusqlite work runs on the blocking pool behind an
//! `Arc<Mutex<Connection>>`.

use std::sync::{Arc, Mutex};

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use rusqlite::{params, Connection};

use super::VectorStore;
use crate::comments::types::{CommentEmbedding, Neighbor};

/// Convert an f32 embedding slice to raw bytes for sqlite-vec.
pub fn embedding_to_bytes(embedding: &[f32]) -> &[u8] {
    unsafe {
        std::slice::from_raw_parts(
            embedding.as_ptr() as *const u8,
            embedding.len() * std::mem::size_of::<f32>(),
        )
    }
}

/// Inverse of [`embedding_to_bytes`].
pub fn bytes_to_embedding(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(std::mem::size_of::<f32>())
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

/// Map vec0 L2 distance over unit vectors to cosine similarity.
///
/// For unit vectors, `d² = 2 - 2·cos`, so `cos = 1 - d²/2`. A record
/// matched against its own vector has distance 0 and score 1.0.
pub fn distance_to_score(distance: f64) -> f64 {
    1.0 - (distance * distance) / 2.0
}

pub struct SqliteVectorStore {
    conn: Arc<Mutex<Connection>>,
    dimensions: usize,
}

impl SqliteVectorStore {
    pub fn new(conn: Arc<Mutex<Connection>>, dimensions: usize) -> Self {
        Self { conn, dimensions }
    }

    fn lock(conn: &Arc<Mutex<Connection>>) -> Result<std::sync::MutexGuard<'_, Connection>> {
        conn.lock().map_err(|e| anyhow!("db lock poisoned: {e}"))
    }
}

#[async_trait]
impl VectorStore for SqliteVectorStore {
    async fn upsert(&self, record: CommentEmbedding) -> Result<()> {
        if record.embedding.len() != self.dimensions {
            bail!(
                "embedding dimensionality mismatch: got {}, index expects {}",
                record.embedding.len(),
                self.dimensions
            );
        }

        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut conn = Self::lock(&conn)?;
            let tx = conn.transaction()?;
            let now = chrono::Utc::now().to_rfc3339();

            tx.execute(
                "INSERT INTO comments (key, post_url, comment_id, text, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5) \
                 ON CONFLICT(key) DO UPDATE SET \
                     post_url = excluded.post_url, \
                     comment_id = excluded.comment_id, \
                     text = excluded.text, \
                     updated_at = excluded.updated_at",
                params![record.key, record.post_url, record.comment_id, record.text, now],
            )?;

            // vec0 has no ON CONFLICT — replace the indexed vector explicitly
            tx.execute(
                "DELETE FROM comments_vec WHERE key = ?1",
                params![record.key],
            )?;
            tx.execute(
                "INSERT INTO comments_vec (key, embedding) VALUES (?1, ?2)",
                params![record.key, embedding_to_bytes(&record.embedding)],
            )?;

            tx.commit()?;
            Ok(())
        })
        .await?
    }

    async fn fetch_post_comments(&self, post_url: &str) -> Result<Vec<CommentEmbedding>> {
        let conn = Arc::clone(&self.conn);
        let post_url = post_url.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = Self::lock(&conn)?;
            let mut stmt = conn.prepare(
                "SELECT key, post_url, comment_id, text FROM comments \
                 WHERE post_url = ?1 ORDER BY key",
            )?;

            let mut records = stmt
                .query_map(params![post_url], |row| {
                    Ok(CommentEmbedding {
                        key: row.get(0)?,
                        post_url: row.get(1)?,
                        comment_id: row.get(2)?,
                        text: row.get(3)?,
                        embedding: Vec::new(),
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;

            // vec0 point lookups by primary key, one per record
            let mut vec_stmt =
                conn.prepare("SELECT embedding FROM comments_vec WHERE key = ?1")?;
            for record in &mut records {
                let bytes: Vec<u8> =
                    vec_stmt.query_row(params![record.key], |row| row.get(0))?;
                record.embedding = bytes_to_embedding(&bytes);
            }

            Ok(records)
        })
        .await?
    }

    async fn list_keys_for_post(&self, post_url: &str) -> Result<Vec<String>> {
        let conn = Arc::clone(&self.conn);
        let post_url = post_url.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = Self::lock(&conn)?;
            let mut stmt =
                conn.prepare("SELECT key FROM comments WHERE post_url = ?1 ORDER BY key")?;
            let keys = stmt
                .query_map(params![post_url], |row| row.get(0))?
                .collect::<Result<Vec<String>, _>>()?;
            Ok(keys)
        })
        .await?
    }

    async fn nearest_neighbors(&self, embedding: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        if embedding.len() != self.dimensions {
            bail!(
                "query vector dimensionality mismatch: got {}, index expects {}",
                embedding.len(),
                self.dimensions
            );
        }

        let conn = Arc::clone(&self.conn);
        let embedding = embedding.to_vec();
        tokio::task::spawn_blocking(move || {
            let conn = Self::lock(&conn)?;
            // KNN over the whole index — the self-match comes back at distance 0
            let mut stmt = conn.prepare(&format!(
                "SELECT key, distance FROM comments_vec \
                 WHERE embedding MATCH ?1 ORDER BY distance LIMIT {k}"
            ))?;

            let neighbors = stmt
                .query_map(params![embedding_to_bytes(&embedding)], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
                })?
                .collect::<Result<Vec<_>, _>>()?
                .into_iter()
                .map(|(key, distance)| Neighbor {
                    key,
                    score: distance_to_score(distance),
                })
                .collect();

            Ok(neighbors)
        })
        .await?
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
