use anyhow::Context as _;
use axum::http::StatusCode;
use serde_json::Value;

pub fn assert_status(actual: StatusCode, expected: StatusCode, context: &str) {
    assert_eq!(
        actual, expected,
        "{context}: expected status {expected}, got {actual}"
    );
}

/// `results` array of a search response
pub fn get_results(body: &Value) -> anyhow::Result<&Vec<Value>> {
    body.get("results")
        .and_then(|v| v.as_array())
        .context("results is an array")
}

/// Titles of a search response, in response order
pub fn result_titles(body: &Value) -> anyhow::Result<Vec<String>> {
    Ok(get_results(body)?
        .iter()
        .filter_map(|r| r.get("title").and_then(|t| t.as_str()).map(str::to_string))
        .collect())
}

/// Field names reported in a 422 body, in order
pub fn error_fields(body: &Value) -> anyhow::Result<Vec<String>> {
    let errors = body
        .get("errors")
        .and_then(|v| v.as_array())
        .context("errors is an array")?;
    Ok(errors
        .iter()
        .filter_map(|e| e.get("field").and_then(|f| f.as_str()).map(str::to_string))
        .collect())
}
