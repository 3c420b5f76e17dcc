//! Deterministic document keys for comment embeddings.
//!
//! Key format: `comment::<enc(post_url)>::<enc(comment_id)>` where `enc` is
//! percent-encoding. Both segments are encoded, so a `::` inside either
//! input cannot collide with the delimiter and the mapping stays injective.

use crate::error::{Error, Result};

/// Key namespace prefix shared by every comment document.
pub const KEY_PREFIX: &str = "comment";

/// Derive the document key for a `(post_url, comment_id)` pair.
///
/// Deterministic: the same pair always yields the same key. Fails with
/// [`Error::InvalidIdentifier`] if either input is empty.
pub fn derive_key(post_url: &str, comment_id: &str) -> Result<String> {
    if post_url.is_empty() {
        return Err(Error::InvalidIdentifier("post URL is empty".into()));
    }
    if comment_id.is_empty() {
        return Err(Error::InvalidIdentifier("comment id is empty".into()));
    }

    Ok(format!(
        "{KEY_PREFIX}::{}::{}",
        urlencoding::encode(post_url),
        urlencoding::encode(comment_id)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_is_deterministic() {
        let a = derive_key("https://example.com/post", "42").unwrap();
        let b = derive_key("https://example.com/post", "42").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn url_characters_are_encoded() {
        let key = derive_key("https://x/y", "1").unwrap();
        assert_eq!(key, "comment::https%3A%2F%2Fx%2Fy::1");
    }

    #[test]
    fn distinct_inputs_yield_distinct_keys() {
        let a = derive_key("https://x/y", "1").unwrap();
        let b = derive_key("https://x/y", "2").unwrap();
        let c = derive_key("https://x/z", "1").unwrap();
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
    }

    #[test]
    fn delimiter_in_inputs_cannot_collide() {
        // Naive concatenation would make these two pairs produce the same key
        let a = derive_key("post::x", "1").unwrap();
        let b = derive_key("post", "x::1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn empty_inputs_are_rejected() {
        assert!(matches!(
            derive_key("", "1"),
            Err(Error::InvalidIdentifier(_))
        ));
        assert!(matches!(
            derive_key("https://x/y", ""),
            Err(Error::InvalidIdentifier(_))
        ));
    }
}
