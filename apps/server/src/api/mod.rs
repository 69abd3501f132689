//! API layer - routes, handlers, and middleware

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod routes;

use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde_json::json;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    let max_body_size = state.config.server.max_request_body_size;
    let cors_origins = state.config.server.cors_origins.clone();

    Router::new()
        .route("/health", get(health_check))
        // Favicon handler (returns 204 to keep 404s out of the logs)
        .route("/favicon.ico", get(favicon))
        .merge(routes::listings::listing_routes())
        .fallback(not_found)
        .with_state(state)
        // Applied in reverse order
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(middleware::cors(&cors_origins))
        .layer(middleware::trace())
        .layer(DefaultBodyLimit::max(max_body_size))
}

async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "nodepop"
    }))
}

async fn favicon() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}

async fn not_found() -> crate::Error {
    crate::Error::NotFound("Sorry, this page doesn't exist".to_string())
}
