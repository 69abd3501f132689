//! Axum extractors that turn requests into parameter bags.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Request},
    http::{header, request::Parts, HeaderMap},
};
use nodepop_query::{ParamBag, ValidationErrors};
use serde_json::Value as JsonValue;
use std::convert::Infallible;

/// Query-string parameters as a read bag. Repeated keys become lists.
#[derive(Debug, Clone)]
pub struct ListingQuery(pub ParamBag);

#[async_trait]
impl<S> FromRequestParts<S> for ListingQuery
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ListingQuery(parse_form_urlencoded(
            parts.uri.query().unwrap_or("").as_bytes(),
        )))
    }
}

/// Request body as a create bag.
///
/// `application/x-www-form-urlencoded` bodies are decoded as form pairs;
/// anything else is read as a JSON object.
#[derive(Debug, Clone)]
pub struct ListingBody(pub ParamBag);

#[async_trait]
impl<S> FromRequest<S> for ListingBody
where
    S: Send + Sync,
{
    type Rejection = crate::Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = is_form_content_type(req.headers());
        let bytes = Bytes::from_request(req, state).await?;

        if is_form {
            return Ok(ListingBody(parse_form_urlencoded(&bytes)));
        }

        let value: JsonValue = serde_json::from_slice(&bytes).map_err(|e| {
            ValidationErrors::single("body", format!("body must be a JSON object: {e}"))
        })?;
        Ok(ListingBody(ParamBag::from_json(value)?))
    }
}

fn is_form_content_type(headers: &HeaderMap) -> bool {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let media_type = content_type.split(';').next().unwrap_or("").trim();
    media_type.eq_ignore_ascii_case("application/x-www-form-urlencoded")
}

/// Percent-decoded form pairs; `+` is a space.
fn parse_form_urlencoded(input: &[u8]) -> ParamBag {
    ParamBag::from_pairs(url::form_urlencoded::parse(input).into_owned())
}
