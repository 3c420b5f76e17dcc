mod helpers;

use helpers::{memory_store, test_embedding, StubProvider};

use commentsim::comments::ingest::{ingest_comment, NewComment};
use commentsim::comments::keys::derive_key;
use commentsim::comments::lookup::list_existing_keys;
use commentsim::error::Error;

const POST: &str = "https://example.com/posts/announcement";

#[tokio::test]
async fn empty_post_returns_empty_set_not_error() {
    let store = memory_store();
    let keys = list_existing_keys(&store, POST).await.unwrap();
    assert!(keys.is_empty());
}

#[tokio::test]
async fn returns_exactly_the_derived_keys() {
    let store = memory_store();
    let provider = StubProvider::new([
        ("nice".to_string(), test_embedding(0)),
        ("cool".to_string(), test_embedding(1)),
    ]);

    for (id, text) in [("1", "nice"), ("2", "cool")] {
        ingest_comment(
            &store,
            &provider,
            POST,
            &NewComment {
                id: id.to_string(),
                text: text.to_string(),
            },
        )
        .await
        .unwrap();
    }

    let mut keys = list_existing_keys(&store, POST).await.unwrap();
    keys.sort();
    let mut expected = vec![
        derive_key(POST, "1").unwrap(),
        derive_key(POST, "2").unwrap(),
    ];
    expected.sort();
    assert_eq!(keys, expected);
}

#[tokio::test]
async fn other_posts_are_not_included() {
    let store = memory_store();
    let provider = StubProvider::new([("hello".to_string(), test_embedding(0))]);

    ingest_comment(
        &store,
        &provider,
        "https://example.com/posts/other",
        &NewComment {
            id: "1".to_string(),
            text: "hello".to_string(),
        },
    )
    .await
    .unwrap();

    assert!(list_existing_keys(&store, POST).await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_post_url_is_rejected() {
    let store = memory_store();
    let err = list_existing_keys(&store, "").await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}
