//! Error types for the listings server

use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use nodepop_query::ValidationErrors;
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid parameters: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Unreadable request body: {0}")]
    Body(#[from] BytesRejection),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Validation(errors) => {
                tracing::warn!(
                    fields = ?errors.fields(),
                    "Rejected request with invalid parameters"
                );
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({ "errors": errors })),
                )
                    .into_response()
            }
            Error::Body(rejection) => {
                let status = rejection.status();
                tracing::warn!(status = %status, "Rejected unreadable request body");
                (status, Json(json!({ "error": rejection.body_text() }))).into_response()
            }
            Error::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
            }
            Error::Database(_) | Error::Migration(_) | Error::Internal(_) => {
                tracing::error!("Internal error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}
