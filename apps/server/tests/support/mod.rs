pub mod assertions;
pub mod fixtures;

use anyhow::Context as _;
use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, HeaderName, HeaderValue, Method, Request, StatusCode},
    Router,
};
use nodepop::{api::create_router, db::InMemoryListingStore, AppState, Config};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt as _;

pub use assertions::*;
pub use fixtures::*;

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        Self::new_with_config(|_| {})
    }

    pub fn new_with_config(configure: impl FnOnce(&mut Config)) -> Self {
        let mut config = Config::default();
        configure(&mut config);

        let state = AppState::with_store(config, Arc::new(InMemoryListingStore::new()));
        let router = create_router(state.clone());
        Self { router, state }
    }

    pub async fn request(
        &self,
        method: Method,
        path_and_query: &str,
        body: Option<Bytes>,
    ) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        self.request_with_extra_headers(
            method,
            path_and_query,
            body,
            &[("content-type", "application/json")],
        )
        .await
    }

    pub async fn request_with_extra_headers(
        &self,
        method: Method,
        path_and_query: &str,
        body: Option<Bytes>,
        extra_headers: &[(&str, &str)],
    ) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        let mut request = Request::builder()
            .method(method)
            .uri(path_and_query)
            .header(header::HOST, "example.org")
            .header(header::ACCEPT, "application/json")
            .body(match body {
                Some(bytes) => Body::from(bytes),
                None => Body::empty(),
            })
            .context("build request")?;

        for (name, value) in extra_headers {
            request.headers_mut().insert(
                name.parse::<HeaderName>().context("parse header name")?,
                value.parse::<HeaderValue>().context("parse header value")?,
            );
        }

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .context("dispatch request")?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .context("read response body")?;

        Ok((status, headers, body))
    }

    /// GET and decode a JSON response.
    pub async fn get_json(&self, path_and_query: &str) -> anyhow::Result<(StatusCode, Value)> {
        let (status, _headers, body) = self.request(Method::GET, path_and_query, None).await?;
        Ok((status, parse_json(&body)?))
    }

    /// POST a JSON body and decode the JSON response.
    pub async fn post_json(&self, path: &str, payload: &Value) -> anyhow::Result<(StatusCode, Value)> {
        let (status, _headers, body) = self
            .request(Method::POST, path, Some(to_json_body(payload)?))
            .await?;
        Ok((status, parse_json(&body)?))
    }

    /// POST a form-encoded body and decode the JSON response.
    pub async fn post_form(&self, path: &str, form: &str) -> anyhow::Result<(StatusCode, Value)> {
        let (status, _headers, body) = self
            .request_with_extra_headers(
                Method::POST,
                path,
                Some(Bytes::from(form.to_string())),
                &[("content-type", "application/x-www-form-urlencoded")],
            )
            .await?;
        Ok((status, parse_json(&body)?))
    }

    /// Create a listing and return its id.
    pub async fn create_listing(&self, payload: &Value) -> anyhow::Result<String> {
        let (status, body) = self.post_json("/api", payload).await?;
        assert_status(status, StatusCode::CREATED, "create listing");
        body["result"]["id"]
            .as_str()
            .map(str::to_string)
            .context("result.id is a string")
    }
}

pub fn to_json_body(value: &Value) -> anyhow::Result<Bytes> {
    Ok(Bytes::from(serde_json::to_vec(value).context("serialize JSON body")?))
}

pub fn parse_json(body: &[u8]) -> anyhow::Result<Value> {
    serde_json::from_slice(body).context("parse JSON response body")
}
