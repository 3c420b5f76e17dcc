//! HTTP server — routing, request/response shapes, and error mapping.
//!
//! Wires the database, embedding provider, and vector store into an axum
//! router with the three pipeline endpoints plus a health check. Failures
//! are logged with full context and mapped to generic client messages.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::comments::ingest::NewComment;
use crate::comments::types::{round2, AnalysisOutcome};
use crate::comments::{analyze, ingest, lookup};
use crate::config::Config;
use crate::embedding::{self, EmbeddingProvider};
use crate::error::Error;
use crate::store::sqlite::SqliteVectorStore;
use crate::store::VectorStore;
use crate::db;

/// Shared application state, created once at startup and injected into
/// every handler. No ambient globals.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn VectorStore>,
    pub embedding: Arc<dyn EmbeddingProvider>,
    pub config: Arc<Config>,
}

// ── Request/response bodies (original JSON field casing) ─────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreEmbeddingRequest {
    pub comment: Option<CommentBody>,
    pub blog_post_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommentBody {
    pub id: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub blog_post_url: Option<String>,
    pub threshold: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similar_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dissimilar_percentage: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckExistingRequest {
    pub blog_post_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckExistingResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_comment_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

async fn store_embedding(
    State(state): State<AppState>,
    Json(body): Json<StoreEmbeddingRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    let (comment, post_url) = match (body.comment, body.blog_post_url) {
        (Some(c), Some(url)) => (c, url),
        _ => return missing_fields(),
    };
    let (id, text) = match (comment.id, comment.text) {
        (Some(id), Some(text)) => (id, text),
        _ => return missing_fields(),
    };

    let new_comment = NewComment { id, text };
    match ingest::ingest_comment(
        state.store.as_ref(),
        state.embedding.as_ref(),
        &post_url,
        &new_comment,
    )
    .await
    {
        Ok(outcome) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "message": format!("Stored embedding for comment {}", new_comment.id),
                "documentKey": outcome.key,
            })),
        ),
        Err(Error::Validation(msg)) | Err(Error::InvalidIdentifier(msg)) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": msg })),
        ),
        Err(err) => {
            error!(%post_url, comment_id = %new_comment.id, %err, "failed to store embedding");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Failed to store embedding" })),
            )
        }
    }
}

fn missing_fields() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": "Missing required fields or comment ID" })),
    )
}

async fn analyze_similarity(
    State(state): State<AppState>,
    Json(body): Json<AnalyzeRequest>,
) -> (StatusCode, Json<AnalyzeResponse>) {
    let Some(post_url) = body.blog_post_url else {
        return (
            StatusCode::BAD_REQUEST,
            Json(AnalyzeResponse {
                success: false,
                message: "Missing blogPostUrl".into(),
                similar_percentage: None,
                dissimilar_percentage: None,
            }),
        );
    };
    let threshold = body
        .threshold
        .unwrap_or(state.config.analysis.default_threshold);

    let outcome = analyze::analyze(
        state.store.as_ref(),
        &post_url,
        threshold,
        state.config.analysis.top_k,
        state.config.analysis.max_concurrency,
    )
    .await;

    match outcome {
        Ok(AnalysisOutcome::NoComments) => (
            StatusCode::OK,
            Json(AnalyzeResponse {
                success: true,
                message: "No comments found for this post.".into(),
                similar_percentage: None,
                dissimilar_percentage: None,
            }),
        ),
        Ok(AnalysisOutcome::Report(report)) => (
            StatusCode::OK,
            Json(AnalyzeResponse {
                success: true,
                message: format!(
                    "Out of {} comments, {} are similar.",
                    report.total_comments, report.similar_count
                ),
                similar_percentage: Some(round2(report.similar_percentage())),
                dissimilar_percentage: Some(round2(report.dissimilar_percentage())),
            }),
        ),
        Err(err) => {
            error!(%post_url, threshold, %err, "failed to analyze similarity");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(AnalyzeResponse {
                    success: false,
                    message: "Failed to analyze similarity".into(),
                    similar_percentage: None,
                    dissimilar_percentage: None,
                }),
            )
        }
    }
}

async fn check_existing_comments(
    State(state): State<AppState>,
    Json(body): Json<CheckExistingRequest>,
) -> (StatusCode, Json<CheckExistingResponse>) {
    let Some(post_url) = body.blog_post_url else {
        return (
            StatusCode::BAD_REQUEST,
            Json(CheckExistingResponse {
                success: false,
                existing_comment_ids: None,
                message: Some("Missing blogPostUrl".into()),
            }),
        );
    };

    match lookup::list_existing_keys(state.store.as_ref(), &post_url).await {
        Ok(keys) => (
            StatusCode::OK,
            Json(CheckExistingResponse {
                success: true,
                existing_comment_ids: Some(keys),
                message: None,
            }),
        ),
        Err(err) => {
            error!(%post_url, %err, "failed to check existing comments");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(CheckExistingResponse {
                    success: false,
                    existing_comment_ids: None,
                    message: Some("Failed to check existing comments".into()),
                }),
            )
        }
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

// ── Wiring ───────────────────────────────────────────────────────────────────

/// Build the router for the given state. Separated from [`serve`] so tests
/// can drive the full HTTP surface without binding a socket.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/store-embedding", post(store_embedding))
        .route("/analyze-similarity", post(analyze_similarity))
        .route("/check-existing-comments", post(check_existing_comments))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Shared setup: open DB, create embedding provider and store handle.
pub fn setup_shared_state(config: Config) -> Result<AppState> {
    let dimensions = config.embedding.dimensions;
    let db_path = config.resolved_db_path();
    let conn = db::open_database(&db_path, dimensions)?;
    tracing::info!(db = %db_path.display(), "database ready");

    let store: Arc<dyn VectorStore> =
        Arc::new(SqliteVectorStore::new(Arc::new(Mutex::new(conn)), dimensions));

    let provider = embedding::create_provider(&config.embedding)?;
    let embedding: Arc<dyn EmbeddingProvider> = Arc::from(provider);
    tracing::info!("embedding provider ready");

    Ok(AppState {
        store,
        embedding,
        config: Arc::new(config),
    })
}

/// Start the HTTP server and run until ctrl-c.
pub async fn serve(config: Config) -> Result<()> {
    let host = config.server.host.clone();
    let port = config.server.port;
    let bind_addr = format!("{host}:{port}");

    let state = setup_shared_state(config)?;
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "listening at http://{bind_addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("failed to listen for ctrl-c");
            tracing::info!("shutting down");
        })
        .await?;

    Ok(())
}
