//! Listing API routes
//!
//! Both `/api` and `/api/` are served; no redirects are used.

use crate::api::handlers::{all_tags, create_listing, search_listings};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn listing_routes() -> Router<AppState> {
    Router::new()
        .route("/api", get(search_listings).post(create_listing))
        .route("/api/", get(search_listings).post(create_listing))
        .route("/api/alltags", get(all_tags))
}
