//! HTTP API module - routing and shared state

mod tokens;

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::contract::NftMetadata;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub contract: Arc<NftMetadata>,
}

/// Build the API router, mounted under the given path prefix
pub fn router(contract: Arc<NftMetadata>, path_prefix: &str) -> Router {
    let state = AppState { contract };

    let routes = Router::new()
        .route("/health", get(health_check))
        .route("/", get(root))
        .merge(tokens::router())
        .with_state(state);

    let routes = match normalize_prefix(path_prefix) {
        None => routes,
        Some(prefix) => Router::new().nest(&prefix, routes),
    };

    // Metadata is consumed cross-origin by marketplaces.
    routes
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Normalize a path prefix for nesting
///
/// Returns `None` when routes should mount at the root.
fn normalize_prefix(prefix: &str) -> Option<String> {
    let trimmed = prefix.trim_end_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with('/') {
        Some(trimmed.to_string())
    } else {
        Some(format!("/{}", trimmed))
    }
}

/// Root endpoint
async fn root() -> impl IntoResponse {
    Json(RootResponse {
        name: "nftmetad",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct RootResponse {
    name: &'static str,
    version: &'static str,
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.contract.client().chain_id().await {
        Ok(_) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy",
                chain: "ok",
            }),
        ),
        Err(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "unhealthy",
                chain: "error",
            }),
        ),
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    chain: &'static str,
}
