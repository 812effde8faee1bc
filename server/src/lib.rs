use anyhow::Result;
use axum::{extract::{Path, Query, State}, http::StatusCode, routing::get, Json, Router};
use lexis_core::loader::load_documents;
use lexis_core::{DocId, EngineConfig, Indexer, SearchHit, SearchStats, Searcher};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize { 10 }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub num_docs: usize,
    pub num_terms: usize,
    pub finalized: bool,
    pub cache: SearchStats,
}

#[derive(Clone)]
pub struct AppState {
    pub searcher: Arc<Searcher>,
}

/// Loads every document under `input`, builds and finalizes the index, and wires the routes.
pub fn build_app(input: &str, config: &EngineConfig) -> Result<Router> {
    let mut index = Indexer::new(config);
    for doc in load_documents(input)? {
        index.add_document(doc);
    }
    index.finalize();
    let searcher = Searcher::new(Arc::new(index), config.cache_capacity);
    Ok(router(Arc::new(searcher)))
}

pub fn router(searcher: Arc<Searcher>) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .route("/stats", get(stats_handler))
        .with_state(AppState { searcher })
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let hits = state.searcher.search_hits(&params.q);
    let total_hits = hits.len();
    let k = params.k.clamp(1, 100);
    let results: Vec<SearchHit> = hits.into_iter().take(k).collect();
    let elapsed = start.elapsed();
    tracing::debug!(query = %params.q, total_hits, "search");
    Json(SearchResponse { query: params.q, took_s: elapsed.as_secs_f64(), total_hits, results })
}

pub async fn doc_handler(State(state): State<AppState>, Path(doc_id): Path<DocId>) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    match state.searcher.index().document(doc_id) {
        Some(doc) => {
            let body = serde_json::json!({ "doc_id": doc_id, "document": doc.as_ref() });
            Ok(Json(body))
        }
        None => Err((StatusCode::NOT_FOUND, format!("document {doc_id} not found"))),
    }
}

pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let index = state.searcher.index();
    Json(StatsResponse {
        num_docs: index.num_docs(),
        num_terms: index.num_terms(),
        finalized: index.is_finalized(),
        cache: state.searcher.stats(),
    })
}
