//! Core types for the similarity pipeline.
//!
//! [`CommentEmbedding`] is the persisted unit; [`Neighbor`] and
//! [`AnalysisReport`] are ephemeral query/analysis outputs.

use serde::{Deserialize, Serialize};

/// A persisted comment embedding, keyed by the derived document key.
///
/// At most one record exists per `(post_url, comment_id)` pair at any time;
/// re-ingestion with the same key replaces the prior record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentEmbedding {
    /// Deterministic document key (see [`crate::comments::keys::derive_key`]).
    pub key: String,
    /// Opaque grouping key identifying the owning blog post. Never parsed.
    pub post_url: String,
    /// Comment identifier within the post.
    pub comment_id: String,
    /// Original comment text.
    pub text: String,
    /// Fixed-dimensionality embedding vector.
    pub embedding: Vec<f32>,
}

/// One candidate from a nearest-neighbor query.
///
/// `score` is a relevance score, higher = more similar. When the query
/// vector is itself indexed, the record's own key appears with the maximal
/// score.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    pub key: String,
    pub score: f64,
}

/// Aggregate result of a similarity analysis over one post.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    /// Number of stored comments examined.
    pub total_comments: usize,
    /// Comments that matched at least one *other* comment at or above the
    /// threshold.
    pub similar_count: usize,
}

impl AnalysisReport {
    /// Unrounded percentage of comments classified similar.
    pub fn similar_percentage(&self) -> f64 {
        (self.similar_count as f64 / self.total_comments as f64) * 100.0
    }

    /// Unrounded complement; sums with `similar_percentage` to exactly 100.
    pub fn dissimilar_percentage(&self) -> f64 {
        100.0 - self.similar_percentage()
    }
}

/// Outcome of [`crate::comments::analyze::analyze`]. A post with no stored
/// comments yields `NoComments` rather than a zero-denominator report.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    NoComments,
    Report(AnalysisReport),
}

/// Round to two decimal places for reporting.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
