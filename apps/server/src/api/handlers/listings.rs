//! Listing search and creation handlers
//!
//! - GET  /api  search with query-string parameters
//! - POST /api  create from a JSON or form body

use crate::{
    api::extractors::{ListingBody, ListingQuery},
    state::AppState,
    Result,
};
use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value as JsonValue};

pub async fn search_listings(
    State(state): State<AppState>,
    ListingQuery(bag): ListingQuery,
) -> Result<Json<JsonValue>> {
    let result = state.listings.search(&bag).await?;
    Ok(Json(json!({ "results": result.to_json() })))
}

pub async fn create_listing(
    State(state): State<AppState>,
    ListingBody(bag): ListingBody,
) -> Result<(StatusCode, Json<JsonValue>)> {
    let record = state.listings.create(&bag).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "result": {
                "id": record.id,
                "msg": format!("Listing {} successfully created", record.listing.title()),
            }
        })),
    ))
}
