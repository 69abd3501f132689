use crate::{state::AppState, Result};
use axum::{extract::State, Json};
use serde_json::{json, Value as JsonValue};

/// GET /api/alltags
pub async fn all_tags(State(state): State<AppState>) -> Result<Json<JsonValue>> {
    let counts = state.listings.tag_counts().await?;
    Ok(Json(json!({ "results": counts.to_json() })))
}
