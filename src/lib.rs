//! Comment-similarity analysis for blog posts.
//!
//! commentsim turns free-text comments into vector embeddings, persists
//! them keyed by post and comment identity, and computes, per post, the
//! fraction of comments that are near-duplicates of at least one other
//! comment via nearest-neighbor search with a score threshold.
//!
//! # Architecture
//!
//! - **Storage**: SQLite with [sqlite-vec](https://github.com/asg017/sqlite-vec)
//!   as the vector index
//! - **Embeddings**: remote OpenAI-compatible `/v1/embeddings` endpoint
//! - **Transport**: JSON over HTTP (axum)
//!
//! # Modules
//!
//! - [`config`] — Configuration loading from TOML files and environment variables
//! - [`db`] — SQLite database initialization and schema
//! - [`embedding`] — Text-to-vector embedding provider
//! - [`store`] — The [`store::VectorStore`] seam and its sqlite-vec implementation
//! - [`comments`] — Core pipeline: identity keys, ingestion, lookup, analysis
//! - [`server`] — HTTP routing and error mapping

pub mod comments;
pub mod config;
pub mod db;
pub mod embedding;
pub mod error;
pub mod server;
pub mod store;
