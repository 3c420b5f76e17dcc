//! The similarity-detection algorithm.
//!
//! For every stored comment of a post, run a top-K nearest-neighbor query
//! with the comment's own embedding and classify it as similar when at
//! least one *other* record scores at or above the threshold. Per-comment
//! queries fan out concurrently with bounded parallelism; classification
//! itself is pure and synchronous so it can be tested against synthetic
//! candidate sets.

use futures::stream::{self, StreamExt};
use tracing::{debug, info};

use crate::comments::types::{AnalysisOutcome, AnalysisReport, Neighbor};
use crate::error::{Error, Result};
use crate::store::VectorStore;

/// Classify one comment given its nearest-neighbor candidates.
///
/// The candidate set includes the comment itself (a record is its own
/// nearest neighbor with the maximal score), so "similar" means more than
/// one candidate at or above the threshold.
pub fn is_similar(neighbors: &[Neighbor], threshold: f64) -> bool {
    neighbors.iter().filter(|n| n.score >= threshold).count() > 1
}

/// Analyze all stored comments for a post and aggregate the similarity ratio.
///
/// A failure on any single nearest-neighbor query aborts the whole analysis
/// — an aggregate computed over a silently shrunken denominator would be
/// worse than a clean error the caller can retry.
pub async fn analyze(
    store: &dyn VectorStore,
    post_url: &str,
    threshold: f64,
    top_k: usize,
    max_concurrency: usize,
) -> Result<AnalysisOutcome> {
    if post_url.is_empty() {
        return Err(Error::Validation("blogPostUrl must not be empty".into()));
    }

    let comments = store
        .fetch_post_comments(post_url)
        .await
        .map_err(Error::StoreUnavailable)?;

    if comments.is_empty() {
        info!(post_url, "no comments stored for post");
        return Ok(AnalysisOutcome::NoComments);
    }

    let total_comments = comments.len();

    let mut queries = stream::iter(comments.into_iter().map(|comment| async move {
        let neighbors = store.nearest_neighbors(&comment.embedding, top_k).await?;
        Ok::<_, anyhow::Error>((comment.key, neighbors))
    }))
    .buffer_unordered(max_concurrency.max(1));

    let mut similar_count = 0;
    while let Some(result) = queries.next().await {
        let (key, neighbors) = result.map_err(Error::SimilarityQuery)?;
        let similar = is_similar(&neighbors, threshold);
        debug!(%key, candidates = neighbors.len(), similar, "nearest-neighbor query");
        if similar {
            similar_count += 1;
        }
    }

    let report = AnalysisReport {
        total_comments,
        similar_count,
    };
    info!(
        post_url,
        total_comments,
        similar_count,
        similar_percentage = report.similar_percentage(),
        "similarity analysis complete"
    );

    Ok(AnalysisOutcome::Report(report))
}
