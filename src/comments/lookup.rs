//! Existing-comment lookup — idempotency support for batch ingestion.
//!
//! An external ingestion job calls this before re-submitting comments to
//! skip the ones already embedded.

use tracing::debug;

use crate::error::{Error, Result};
use crate::store::VectorStore;

/// Document keys of every comment already persisted for a post.
///
/// Returns an empty vec (not an error) when the post has no records.
pub async fn list_existing_keys(
    store: &dyn VectorStore,
    post_url: &str,
) -> Result<Vec<String>> {
    if post_url.is_empty() {
        return Err(Error::Validation("blogPostUrl must not be empty".into()));
    }

    let keys = store
        .list_keys_for_post(post_url)
        .await
        .map_err(Error::StoreUnavailable)?;

    debug!(post_url, count = keys.len(), "existing comment lookup");
    Ok(keys)
}
